// ScanEngine - 依存性注入によるディレクトリスキャンエンジン
// 列挙・並列評価・集計を一つの処理にまとめる

use super::dispatcher::{BoundedDispatcher, TaskControl};
use crate::{
    core::{AggregateMode, ProcessingConfig, ProgressReporter, ScanError, ScanResult, ScanSummary},
    filter::Predicate,
    image_loader::ImageLoaderBackend,
    services::{Aggregator, PredicateEvaluator},
    storage::StorageBackend,
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// ディレクトリを並列にスキャンし、述語に一致したエントリを集計するエンジン
///
/// 全ての依存関係はコンストラクタで注入され、ワーカーと共有するためArcで保持する。
pub struct ScanEngine<S, L, C, R> {
    storage: Arc<S>,
    loader: Arc<L>,
    config: Arc<C>,
    reporter: Arc<R>,
}

impl<S, L, C, R> ScanEngine<S, L, C, R>
where
    S: StorageBackend + 'static,
    L: ImageLoaderBackend + 'static,
    C: ProcessingConfig,
    R: ProgressReporter + 'static,
{
    pub fn new(storage: S, loader: L, config: C, reporter: R) -> Self {
        Self {
            storage: Arc::new(storage),
            loader: Arc::new(loader),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
        }
    }

    /// ディレクトリをスキャンする
    ///
    /// 列挙に失敗した場合はタスクを一つも起動せずにエラーを返す。
    pub async fn scan(
        &self,
        root: &Path,
        predicate: Predicate,
        mode: AggregateMode,
    ) -> ScanResult<ScanSummary> {
        self.validate_config()?;

        let files = self.discover_files(root).await?;

        self.scan_files(files, predicate, mode).await
    }

    /// 列挙済みのファイルリストをスキャンする
    pub async fn scan_files(
        &self,
        files: Vec<PathBuf>,
        predicate: Predicate,
        mode: AggregateMode,
    ) -> ScanResult<ScanSummary> {
        self.validate_config()?;

        let started_at = Utc::now();
        let start_time = Instant::now();
        let total = files.len();
        let progress = self.config.enable_progress_reporting();

        info!(
            entries = total,
            capacity = self.config.max_concurrent_tasks(),
            predicate = %predicate,
            mode = ?mode,
            loader = self.loader.strategy_name(),
            "Starting scan"
        );

        if progress {
            self.reporter.report_started(total);
        }

        let aggregator = Arc::new(Aggregator::new(mode));
        let task = EntryTask {
            evaluator: PredicateEvaluator::new(
                Arc::clone(&self.storage),
                Arc::clone(&self.loader),
                predicate,
            ),
            aggregator: Arc::clone(&aggregator),
            reporter: Arc::clone(&self.reporter),
            total,
            progress,
        };

        let dispatcher = BoundedDispatcher::new(self.config.max_concurrent_tasks())?
            .with_deadline(self.config.deadline());
        let report = dispatcher
            .dispatch(files, move |path| task.run(path))
            .await?;

        let result = aggregator
            .finish()
            .ok_or_else(|| ScanError::parallel_execution("集計結果は既に読み出されています"))?;

        let summary = ScanSummary {
            started_at,
            total_entries: total,
            evaluated: aggregator.evaluated(),
            matched: result.matched(),
            soft_failures: aggregator.soft_failures(),
            panicked_tasks: report.panicked,
            partial: report.timed_out,
            stopped_early: report.stopped_early,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            result,
        };

        info!(
            matched = summary.matched,
            evaluated = summary.evaluated,
            soft_failures = summary.soft_failures,
            partial = summary.partial,
            elapsed_ms = summary.elapsed_ms,
            "Scan finished"
        );

        if progress {
            self.reporter
                .report_completed(summary.matched, summary.soft_failures);
        }

        Ok(summary)
    }

    fn validate_config(&self) -> ScanResult<()> {
        if self.config.max_concurrent_tasks() == 0 {
            return Err(ScanError::configuration(
                "並列タスク数は1以上である必要があります",
            ));
        }
        Ok(())
    }

    /// ストレージバックエンドでルート以下のファイルを列挙する
    async fn discover_files(&self, root: &Path) -> ScanResult<Vec<PathBuf>> {
        let storage = Arc::clone(&self.storage);
        let owned_root = root.to_path_buf();
        let recursive = self.config.recursive();

        let listed =
            tokio::task::spawn_blocking(move || storage.list_files(&owned_root, recursive))
                .await?;

        let files = listed.map_err(|e| ScanError::enumeration(root, e))?;
        debug!(root = %root.display(), files = files.len(), recursive, "Enumerated directory");

        Ok(files)
    }

    /// 設定への参照を取得
    pub fn config(&self) -> &C {
        &self.config
    }

}

/// ワーカースレッド上で一つのエントリを処理する
struct EntryTask<S, L, R> {
    evaluator: PredicateEvaluator<S, L>,
    aggregator: Arc<Aggregator>,
    reporter: Arc<R>,
    total: usize,
    progress: bool,
}

impl<S, L, R> EntryTask<S, L, R>
where
    S: StorageBackend,
    L: ImageLoaderBackend,
    R: ProgressReporter,
{
    fn run(&self, path: PathBuf) -> TaskControl {
        // 他のタスクが既に一致を得ていれば評価しない
        if self.aggregator.is_satisfied() {
            return TaskControl::Stop;
        }

        let mut control = TaskControl::Continue;
        match self.evaluator.evaluate(&path) {
            Ok(true) => {
                if self.aggregator.record_match(path) {
                    control = TaskControl::Stop;
                }
            }
            Ok(false) => {}
            Err(error) => {
                self.aggregator.record_soft_failure();
                debug!(
                    path = %error.path().display(),
                    kind = error.kind(),
                    error = %error,
                    "Skipping entry"
                );
                if self.progress {
                    self.reporter
                        .report_error(error.path(), &error.to_string());
                }
            }
        }

        let completed = self.aggregator.record_evaluated();
        if self.progress {
            self.reporter.report_progress(completed, self.total);
        }

        control
    }
}
