// Dispatcher - 同時実行数を制限したタスク起動

use crate::core::{ScanError, ScanResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// タスク完了時にディスパッチャへ返す指示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskControl {
    Continue,
    /// 新しいタスクの起動をやめる（起動済みのタスクは待つ）
    Stop,
}

/// ディスパッチの実行結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub launched: usize,
    pub completed: usize,
    pub panicked: usize,
    /// 期限切れで待たずに切り離したタスク数
    pub abandoned: usize,
    pub timed_out: bool,
    pub stopped_early: bool,
}

impl DispatchReport {
    fn record(&mut self, joined: Result<TaskControl, JoinError>) {
        match joined {
            Ok(control) => {
                self.completed += 1;
                if control == TaskControl::Stop {
                    self.stopped_early = true;
                }
            }
            Err(error) => {
                warn!(error = %error, "Task terminated abnormally");
                self.panicked += 1;
            }
        }
    }
}

/// カウンティングセマフォで同時実行数を制限するディスパッチャ
///
/// 容量分のタスクが実行中の間は新しいタスクの起動を待たせる。
/// 許可はタスク本体に移動され、成功・失敗・パニックのいずれでも解放される。
#[derive(Debug, Clone)]
pub struct BoundedDispatcher {
    capacity: usize,
    deadline: Option<Duration>,
}

impl BoundedDispatcher {
    pub fn new(capacity: usize) -> ScanResult<Self> {
        if capacity == 0 {
            return Err(ScanError::configuration(
                "並列タスク数は1以上である必要があります",
            ));
        }
        if capacity > Semaphore::MAX_PERMITS {
            return Err(ScanError::configuration(format!(
                "並列タスク数が大きすぎます: {capacity}"
            )));
        }

        Ok(Self {
            capacity,
            deadline: None,
        })
    }

    /// 全体の期限を設定する
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// 要素ごとに一つのブロッキングタスクを起動し、全タスクの完了を待つ
    ///
    /// 期限を過ぎると起動をやめ、実行中のタスクは待たずに切り離す。
    pub async fn dispatch<T, F>(&self, items: Vec<T>, work: F) -> ScanResult<DispatchReport>
    where
        T: Send + 'static,
        F: Fn(T) -> TaskControl + Send + Sync + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.capacity));
        let work = Arc::new(work);
        let deadline = self.deadline.map(|limit| Instant::now() + limit);
        let mut tasks = JoinSet::new();
        let mut report = DispatchReport::default();

        debug!(
            items = items.len(),
            capacity = self.capacity,
            "Dispatching tasks"
        );

        for item in items {
            while let Some(joined) = tasks.try_join_next() {
                report.record(joined);
            }
            if report.stopped_early {
                break;
            }

            let permit = match deadline {
                Some(at) => {
                    if Instant::now() >= at {
                        report.timed_out = true;
                        break;
                    }
                    match timeout_at(at, Arc::clone(&semaphore).acquire_owned()).await {
                        Ok(permit) => permit?,
                        Err(_) => {
                            report.timed_out = true;
                            break;
                        }
                    }
                }
                None => Arc::clone(&semaphore).acquire_owned().await?,
            };

            // 許可を待つ間に停止指示が来ている場合がある
            while let Some(joined) = tasks.try_join_next() {
                report.record(joined);
            }
            if report.stopped_early {
                break;
            }

            let work = Arc::clone(&work);
            tasks.spawn_blocking(move || {
                let _permit = permit;
                (*work)(item)
            });
            report.launched += 1;
        }

        // バリア: 起動済みの全タスクを待つ
        loop {
            let joined = match deadline {
                Some(at) => match timeout_at(at, tasks.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        report.timed_out = true;
                        report.abandoned = tasks.len();
                        tasks.detach_all();
                        break;
                    }
                },
                None => tasks.join_next().await,
            };

            match joined {
                Some(joined) => report.record(joined),
                None => break,
            }
        }

        if report.timed_out {
            warn!(
                launched = report.launched,
                completed = report.completed,
                abandoned = report.abandoned,
                "Deadline reached before all tasks finished"
            );
        }

        Ok(report)
    }
}
