// エラー処理の統合テスト
use crate::fixtures::*;
use image_filter::{
    count_matches,
    engine::ScanEngine,
    image_loader::standard::StandardImageLoader,
    services::{DefaultProcessingConfig, NoOpProgressReporter},
    AggregateMode, AggregateResult, Predicate, ScanError,
};
use std::path::Path;
use tempfile::TempDir;

fn engine(
    storage: InMemoryStorage,
) -> ScanEngine<InMemoryStorage, StandardImageLoader, DefaultProcessingConfig, NoOpProgressReporter>
{
    ScanEngine::new(
        storage,
        StandardImageLoader::new(),
        DefaultProcessingConfig::new(4),
        NoOpProgressReporter::new(),
    )
}

#[tokio::test]
async fn test_missing_root_launches_no_tasks() {
    let storage = InMemoryStorage::new("/data").with_file("a.png", rgb_png(8, 8));
    let stats = storage.stats();

    let result = engine(storage)
        .scan(
            Path::new("/missing"),
            Predicate::parse(&["rgb"]).unwrap(),
            AggregateMode::Count,
        )
        .await;

    let error = result.unwrap_err();
    assert!(matches!(error, ScanError::EnumerationError { .. }));
    assert!(error.is_startup_error());
    assert_eq!(stats.opens(), 0);
    assert_eq!(stats.stats(), 0);
}

#[tokio::test]
async fn test_unreadable_local_roots() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("plain.txt");
    write_file(&file, b"text");

    for root in [temp_dir.path().join("nonexistent"), file] {
        let result = count_matches(&root, &["rgb"], DefaultProcessingConfig::default()).await;
        assert!(
            matches!(result, Err(ScanError::EnumerationError { .. })),
            "{} should fail to enumerate",
            root.display()
        );
    }
}

#[tokio::test]
async fn test_one_corrupt_file_is_a_soft_failure() {
    let mut storage = InMemoryStorage::new("/data");
    for i in 0..9 {
        storage = storage.with_file(format!("ok_{i}.png"), rgb_png(20, 10));
    }
    storage = storage.with_file("broken.png", b"NOT_A_PNG".to_vec());

    let summary = engine(storage)
        .scan(
            Path::new("/data"),
            Predicate::parse(&["width>0"]).unwrap(),
            AggregateMode::Count,
        )
        .await
        .unwrap();

    assert_eq!(summary.result, AggregateResult::Count(9));
    assert_eq!(summary.soft_failures, 1);
    assert_eq!(summary.evaluated, 10);
    assert!(!summary.partial);
}

#[tokio::test]
async fn test_strict_parse_rejects_before_scanning() {
    let result = Predicate::parse(&["filesize>10q"]);

    let error = result.unwrap_err();
    assert!(matches!(error, ScanError::ConstraintSpecError { .. }));
    assert!(error.to_string().contains("filesize>10q"));
}

#[tokio::test]
async fn test_lenient_parse_fails_closed_without_io() {
    let storage = InMemoryStorage::new("/data")
        .with_file("a.png", rgb_png(8, 8))
        .with_file("b.png", rgb_png(8, 8));
    let stats = storage.stats();

    let (predicate, errors) = Predicate::parse_lenient(&["rgb", "bogus>1"]);
    assert_eq!(errors.len(), 1);

    let summary = engine(storage)
        .scan(Path::new("/data"), predicate, AggregateMode::Count)
        .await
        .unwrap();

    assert_eq!(summary.result, AggregateResult::Count(0));
    assert_eq!(summary.soft_failures, 0);
    assert_eq!(stats.opens(), 0);
}

#[tokio::test]
async fn test_zero_capacity_is_a_configuration_error() {
    let storage = InMemoryStorage::new("/data").with_file("a.png", rgb_png(8, 8));
    let engine = ScanEngine::new(
        storage,
        StandardImageLoader::new(),
        DefaultProcessingConfig::new(0),
        NoOpProgressReporter::new(),
    );

    let result = engine
        .scan(Path::new("/data"), Predicate::default(), AggregateMode::Count)
        .await;

    let error = result.unwrap_err();
    assert!(matches!(error, ScanError::ConfigurationError { .. }));
    assert!(!error.is_recoverable());
}
