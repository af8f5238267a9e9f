// サービス層 - 機能別のビジネスロジック
// 各サービスは特定の責任を持ち、疎結合で設計されている

pub mod aggregation;
pub mod config;
pub mod evaluation;
pub mod monitoring;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use aggregation::Aggregator;
pub use config::{DefaultProcessingConfig, DEFAULT_MAX_CONCURRENT};
pub use evaluation::PredicateEvaluator;
pub use monitoring::{ConsoleProgressReporter, NoOpProgressReporter};
