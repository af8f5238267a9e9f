// Aggregator - スレッドセーフな結果集計

use crate::core::{AggregateMode, AggregateResult};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// モードごとの集計先
#[derive(Debug)]
enum Sink {
    Count(AtomicU64),
    Collect(Mutex<Vec<PathBuf>>),
    First(Mutex<Option<PathBuf>>),
}

/// 一致結果とソフトエラーの集計
///
/// 追加のみで、一度記録した結果は変更・削除されない。
/// `finish` による最終読み出しは一度だけ有効で、それ以降の書き込みは無視される。
#[derive(Debug)]
pub struct Aggregator {
    sink: Sink,
    evaluated: AtomicUsize,
    soft_failures: AtomicUsize,
    finished: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // 書き込みは追加のみなので、パニックしたタスクが残した状態も有効
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Aggregator {
    pub fn new(mode: AggregateMode) -> Self {
        let sink = match mode {
            AggregateMode::Count => Sink::Count(AtomicU64::new(0)),
            AggregateMode::Collect => Sink::Collect(Mutex::new(Vec::new())),
            AggregateMode::First => Sink::First(Mutex::new(None)),
        };

        Self {
            sink,
            evaluated: AtomicUsize::new(0),
            soft_failures: AtomicUsize::new(0),
            finished: AtomicBool::new(false),
        }
    }

    pub fn mode(&self) -> AggregateMode {
        match self.sink {
            Sink::Count(_) => AggregateMode::Count,
            Sink::Collect(_) => AggregateMode::Collect,
            Sink::First(_) => AggregateMode::First,
        }
    }

    /// 一致したエントリを記録する
    ///
    /// これ以上の探索が不要になった場合（First モードで一致を得た）に true を返す。
    pub fn record_match(&self, path: PathBuf) -> bool {
        match &self.sink {
            Sink::Count(count) => {
                count.fetch_add(1, Ordering::Relaxed);
                false
            }
            Sink::Collect(paths) => {
                let mut paths = lock(paths);
                if !self.finished.load(Ordering::Acquire) {
                    paths.push(path);
                }
                false
            }
            Sink::First(first) => {
                let mut first = lock(first);
                if first.is_none() && !self.finished.load(Ordering::Acquire) {
                    *first = Some(path);
                }
                true
            }
        }
    }

    /// 評価完了を記録し、完了件数を返す
    pub fn record_evaluated(&self) -> usize {
        self.evaluated.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// ソフトエラーを記録し、エラー件数を返す
    pub fn record_soft_failure(&self) -> usize {
        self.soft_failures.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn evaluated(&self) -> usize {
        self.evaluated.load(Ordering::Relaxed)
    }

    pub fn soft_failures(&self) -> usize {
        self.soft_failures.load(Ordering::Relaxed)
    }

    /// First モードで既に一致を得ているかどうか
    pub fn is_satisfied(&self) -> bool {
        match &self.sink {
            Sink::First(first) => lock(first).is_some(),
            _ => false,
        }
    }

    /// 集計結果を読み出す
    ///
    /// 二回目以降の呼び出しは None を返す。
    pub fn finish(&self) -> Option<AggregateResult> {
        match &self.sink {
            Sink::Count(count) => {
                if self.finished.swap(true, Ordering::AcqRel) {
                    return None;
                }
                Some(AggregateResult::Count(count.load(Ordering::Relaxed)))
            }
            Sink::Collect(paths) => {
                let mut paths = lock(paths);
                if self.finished.swap(true, Ordering::AcqRel) {
                    return None;
                }
                Some(AggregateResult::Paths(std::mem::take(&mut *paths)))
            }
            Sink::First(first) => {
                let mut first = lock(first);
                if self.finished.swap(true, Ordering::AcqRel) {
                    return None;
                }
                Some(AggregateResult::First(first.take()))
            }
        }
    }
}
