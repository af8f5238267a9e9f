// 設定管理の具象実装

use crate::core::ProcessingConfig;
use std::time::Duration;

/// 同時に開くファイル数の既定上限
pub const DEFAULT_MAX_CONCURRENT: usize = 1000;

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultProcessingConfig {
    max_concurrent: usize,
    recursive: bool,
    deadline: Option<Duration>,
    enable_progress: bool,
}

impl DefaultProcessingConfig {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent,
            ..Self::default()
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }
}

impl Default for DefaultProcessingConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            recursive: true,
            deadline: None,
            enable_progress: true,
        }
    }
}

impl ProcessingConfig for DefaultProcessingConfig {
    fn max_concurrent_tasks(&self) -> usize {
        self.max_concurrent
    }

    fn recursive(&self) -> bool {
        self.recursive
    }

    fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}
