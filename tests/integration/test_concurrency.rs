// 同時実行数の上限と期限のテスト
use crate::fixtures::*;
use image_filter::{
    engine::ScanEngine,
    image_loader::standard::StandardImageLoader,
    services::{DefaultProcessingConfig, NoOpProgressReporter},
    AggregateMode, AggregateResult, Predicate,
};
use std::time::Duration;

fn image_storage(files: usize, open_delay: Duration) -> InMemoryStorage {
    let bytes = rgb_png(32, 24);
    (0..files)
        .fold(InMemoryStorage::new("/data"), |storage, i| {
            storage.with_file(format!("img_{i:03}.png"), bytes.clone())
        })
        .with_open_delay(open_delay)
}

#[tokio::test]
async fn test_open_handles_never_exceed_capacity() {
    for capacity in [1, 3, 8] {
        let storage = image_storage(40, Duration::from_millis(5));
        let stats = storage.stats();
        let engine = ScanEngine::new(
            storage,
            StandardImageLoader::new(),
            DefaultProcessingConfig::new(capacity),
            NoOpProgressReporter::new(),
        );

        let summary = engine
            .scan(
                std::path::Path::new("/data"),
                Predicate::parse(&["width==32", "height==24"]).unwrap(),
                AggregateMode::Count,
            )
            .await
            .unwrap();

        assert_eq!(summary.result, AggregateResult::Count(40));
        assert_eq!(stats.opens(), 40);
        assert!(
            stats.peak_open_handles() <= capacity,
            "peak {} exceeded capacity {capacity}",
            stats.peak_open_handles()
        );
        assert_eq!(stats.open_handles(), 0);
    }
}

#[tokio::test]
async fn test_full_decode_respects_capacity() {
    let storage = image_storage(24, Duration::from_millis(2));
    let stats = storage.stats();
    let engine = ScanEngine::new(
        storage,
        StandardImageLoader::new(),
        DefaultProcessingConfig::new(4),
        NoOpProgressReporter::new(),
    );

    let summary = engine
        .scan(
            std::path::Path::new("/data"),
            Predicate::parse(&["valid", "rgb"]).unwrap(),
            AggregateMode::Count,
        )
        .await
        .unwrap();

    assert_eq!(summary.result, AggregateResult::Count(24));
    assert!(stats.peak_open_handles() <= 4);
}

#[tokio::test]
async fn test_deadline_returns_partial_result() {
    let storage = image_storage(30, Duration::from_millis(200));
    let engine = ScanEngine::new(
        storage,
        StandardImageLoader::new(),
        DefaultProcessingConfig::new(2).with_deadline(Some(Duration::from_millis(50))),
        NoOpProgressReporter::new(),
    );

    let summary = engine
        .scan(
            std::path::Path::new("/data"),
            Predicate::parse(&["png"]).unwrap(),
            AggregateMode::Count,
        )
        .await
        .unwrap();

    assert!(summary.partial);
    assert!(summary.evaluated < 30);
    assert!(summary.matched < 30);
}

#[tokio::test]
async fn test_no_deadline_is_never_partial() {
    let storage = image_storage(10, Duration::from_millis(1));
    let engine = ScanEngine::new(
        storage,
        StandardImageLoader::new(),
        DefaultProcessingConfig::new(2),
        NoOpProgressReporter::new(),
    );

    let summary = engine
        .scan(
            std::path::Path::new("/data"),
            Predicate::parse(&["png"]).unwrap(),
            AggregateMode::Count,
        )
        .await
        .unwrap();

    assert!(!summary.partial);
    assert_eq!(summary.evaluated, 10);
}
