// 述語評価機能
// 単一エントリのメタデータ取得と述語評価

pub mod evaluator;

// 公開API
pub use evaluator::PredicateEvaluator;
