// スキャン処理のトレイト定義
// 設定と進捗報告の抽象化インターフェース

use mockall::automock;
use std::path::Path;
use std::time::Duration;

/// スキャン設定を抽象化するトレイト
///
/// 構築時にエンジンへ注入され、実行中は変更されない。
#[automock]
pub trait ProcessingConfig: Send + Sync {
    /// 最大同時実行タスク数を取得
    fn max_concurrent_tasks(&self) -> usize;

    /// サブディレクトリを再帰的に走査するかどうか
    fn recursive(&self) -> bool;

    /// スキャン全体の期限（None なら無期限）
    fn deadline(&self) -> Option<Duration>;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

// ProcessingConfig for Box<dyn ProcessingConfig>
impl ProcessingConfig for Box<dyn ProcessingConfig> {
    fn max_concurrent_tasks(&self) -> usize {
        self.as_ref().max_concurrent_tasks()
    }

    fn recursive(&self) -> bool {
        self.as_ref().recursive()
    }

    fn deadline(&self) -> Option<Duration> {
        self.as_ref().deadline()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }
}

/// 進捗報告の抽象化トレイト
///
/// ワーカースレッドから並行に呼ばれる。
#[automock]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    fn report_started(&self, total_files: usize);

    /// 進捗更新の報告
    fn report_progress(&self, completed: usize, total: usize);

    /// エントリ単位のエラー報告
    fn report_error(&self, file_path: &Path, error: &str);

    /// 処理完了時の報告
    fn report_completed(&self, matched: u64, total_errors: usize);
}

// ProgressReporter for Box<dyn ProgressReporter>
impl ProgressReporter for Box<dyn ProgressReporter> {
    fn report_started(&self, total_files: usize) {
        self.as_ref().report_started(total_files)
    }

    fn report_progress(&self, completed: usize, total: usize) {
        self.as_ref().report_progress(completed, total)
    }

    fn report_error(&self, file_path: &Path, error: &str) {
        self.as_ref().report_error(file_path, error)
    }

    fn report_completed(&self, matched: u64, total_errors: usize) {
        self.as_ref().report_completed(matched, total_errors)
    }
}
