// 設定管理機能
// 実行中は変更されない不変の設定値

pub mod implementations;

// 公開API
pub use implementations::{DefaultProcessingConfig, DEFAULT_MAX_CONCURRENT};
