// 進捗監視の具象実装

use crate::core::ProgressReporter;
use std::path::Path;

/// 進捗を表示する間隔（件数）
const PROGRESS_INTERVAL: usize = 100;

/// コンソール出力による進捗報告実装
///
/// 標準出力は結果表示に使うため、進捗は標準エラーに書く。
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 何も表示しないレポーター
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report_started(&self, total_files: usize) {
        if !self.quiet {
            eprintln!("🚀 {total_files} files found");
        }
    }

    fn report_progress(&self, completed: usize, total: usize) {
        if !self.quiet && total > 0 && (completed % PROGRESS_INTERVAL == 0 || completed == total) {
            let percentage = (completed as f64 / total as f64) * 100.0;
            eprintln!("📊 Progress: {completed}/{total} ({percentage:.1}%)");
        }
    }

    fn report_error(&self, file_path: &Path, error: &str) {
        if !self.quiet {
            eprintln!("❌ Failed to read {}: {error}", file_path.display());
        }
    }

    fn report_completed(&self, matched: u64, total_errors: usize) {
        if !self.quiet {
            eprintln!("✅ {matched} files matched.");
            if total_errors > 0 {
                eprintln!("⚠️  {total_errors} files failed to read");
            }
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NoOpProgressReporter {
    fn report_started(&self, _total_files: usize) {}

    fn report_progress(&self, _completed: usize, _total: usize) {}

    fn report_error(&self, _file_path: &Path, _error: &str) {}

    fn report_completed(&self, _matched: u64, _total_errors: usize) {}
}
