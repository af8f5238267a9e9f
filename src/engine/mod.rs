// エンジン層 - 並列処理とオーケストレーション
// サービス層を組み合わせて高レベルな処理を提供

pub mod api;
pub mod dispatcher;
pub mod scan_engine;

// 公開API - 主要エンジンクラス
pub use api::{
    count_matches, create_default_scan_engine, create_local_scan_engine,
    create_quiet_scan_engine, list_matches, scan_directory_with_engine, LocalScanEngine,
};
pub use dispatcher::{BoundedDispatcher, DispatchReport, TaskControl};
pub use scan_engine::ScanEngine;
