// コアレイヤー - 基盤となるトレイト、型、エラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod error;
pub mod traits;
pub mod types;

// 公開API
pub use error::{EntryError, ScanError, ScanResult};
pub use traits::{ProcessingConfig, ProgressReporter};
pub use types::{
    AggregateMode, AggregateResult, ColorLayout, EntryMetadata, ImageHeader, ScanSummary,
};
