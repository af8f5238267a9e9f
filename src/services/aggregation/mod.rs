// 集計機能
// 全タスクから並行に書き込まれる唯一の共有状態

pub mod aggregator;

// 公開API
pub use aggregator::Aggregator;
