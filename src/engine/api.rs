// 高レベル公開API
// ScanEngineを簡単に使用できるようにするための便利な関数

use super::ScanEngine;
use crate::{
    core::{AggregateMode, AggregateResult, ProcessingConfig, ProgressReporter, ScanResult, ScanSummary},
    filter::Predicate,
    image_loader::{standard::StandardImageLoader, ImageLoaderBackend},
    services::{ConsoleProgressReporter, DefaultProcessingConfig, NoOpProgressReporter},
    storage::{local::LocalStorageBackend, StorageBackend},
};
use std::path::{Path, PathBuf};

/// ローカルファイルシステム用のエンジン型
pub type LocalScanEngine<R> =
    ScanEngine<LocalStorageBackend, StandardImageLoader, DefaultProcessingConfig, R>;

// ========================================
// DI対応API - ScanEngineベース
// ========================================

/// 設定済みScanEngineでディレクトリをスキャン
pub async fn scan_directory_with_engine<S, L, C, R>(
    root: &Path,
    predicate: Predicate,
    mode: AggregateMode,
    engine: &ScanEngine<S, L, C, R>,
) -> ScanResult<ScanSummary>
where
    S: StorageBackend + 'static,
    L: ImageLoaderBackend + 'static,
    C: ProcessingConfig,
    R: ProgressReporter + 'static,
{
    engine.scan(root, predicate, mode).await
}

/// ScanEngine作成のヘルパー関数
///
/// コンソールに進捗を表示するエンジンを作成
pub fn create_default_scan_engine<S, L>(
    storage: S,
    loader: L,
    config: DefaultProcessingConfig,
) -> ScanEngine<S, L, DefaultProcessingConfig, ConsoleProgressReporter>
where
    S: StorageBackend + 'static,
    L: ImageLoaderBackend + 'static,
{
    ScanEngine::new(storage, loader, config, ConsoleProgressReporter::new())
}

/// ScanEngine作成のヘルパー関数（静音版）
///
/// テストやライブラリ利用向けの静音エンジン作成
pub fn create_quiet_scan_engine<S, L>(
    storage: S,
    loader: L,
    config: DefaultProcessingConfig,
) -> ScanEngine<S, L, DefaultProcessingConfig, NoOpProgressReporter>
where
    S: StorageBackend + 'static,
    L: ImageLoaderBackend + 'static,
{
    ScanEngine::new(storage, loader, config, NoOpProgressReporter::new())
}

/// ローカルディレクトリ用の静音エンジンを作成
pub fn create_local_scan_engine(
    config: DefaultProcessingConfig,
) -> LocalScanEngine<NoOpProgressReporter> {
    create_quiet_scan_engine(LocalStorageBackend::new(), StandardImageLoader::new(), config)
}

// ========================================
// 便利関数 - ローカルファイルシステム
// ========================================

/// フィルタに一致するファイル数を数える
pub async fn count_matches<F: AsRef<str>>(
    root: &Path,
    filters: &[F],
    config: DefaultProcessingConfig,
) -> ScanResult<u64> {
    let predicate = Predicate::parse(filters)?;
    let summary = create_local_scan_engine(config)
        .scan(root, predicate, AggregateMode::Count)
        .await?;

    Ok(summary.matched)
}

/// フィルタに一致するファイルのパスを集める（順序は不定）
pub async fn list_matches<F: AsRef<str>>(
    root: &Path,
    filters: &[F],
    config: DefaultProcessingConfig,
) -> ScanResult<Vec<PathBuf>> {
    let predicate = Predicate::parse(filters)?;
    let summary = create_local_scan_engine(config)
        .scan(root, predicate, AggregateMode::Collect)
        .await?;

    Ok(match summary.result {
        AggregateResult::Paths(paths) => paths,
        AggregateResult::First(first) => first.into_iter().collect(),
        AggregateResult::Count(_) => Vec::new(),
    })
}
