// フィルタ境界値のテスト（実ファイルシステム）
use crate::fixtures::*;
use image_filter::{count_matches, list_matches, services::DefaultProcessingConfig};
use std::fs::File;
use tempfile::TempDir;

const MIB: u64 = 1024 * 1024;

/// 内容を書かずにサイズだけ設定したファイルを作る
fn sized_file(dir: &TempDir, name: &str, len: u64) {
    let file = File::create(dir.path().join(name)).unwrap();
    file.set_len(len).unwrap();
}

fn config() -> DefaultProcessingConfig {
    DefaultProcessingConfig::new(8).with_progress_reporting(false)
}

#[tokio::test]
async fn test_filesize_boundary_at_ten_mebibytes() {
    let temp_dir = TempDir::new().unwrap();
    sized_file(&temp_dir, "below.bin", 10 * MIB - 1);
    sized_file(&temp_dir, "exact.bin", 10 * MIB);
    sized_file(&temp_dir, "above.bin", 10 * MIB + 1);

    let strictly_larger = count_matches(temp_dir.path(), &["filesize>10m"], config())
        .await
        .unwrap();
    assert_eq!(strictly_larger, 1);

    let at_least = count_matches(temp_dir.path(), &["filesize>=10M"], config())
        .await
        .unwrap();
    assert_eq!(at_least, 2);

    let exact = list_matches(temp_dir.path(), &["filesize==10m"], config())
        .await
        .unwrap();
    assert_eq!(exact, vec![temp_dir.path().join("exact.bin")]);

    let fractional = count_matches(temp_dir.path(), &["filesize>9.5m"], config())
        .await
        .unwrap();
    assert_eq!(fractional, 3);
}

#[tokio::test]
async fn test_short_edge_filter() {
    let temp_dir = TempDir::new().unwrap();
    let portrait = temp_dir.path().join("portrait.png");
    write_file(&portrait, &rgb_png(400, 800));
    write_file(&temp_dir.path().join("larger.png"), &rgb_png(600, 800));

    let matched = list_matches(temp_dir.path(), &["short<512"], config())
        .await
        .unwrap();
    assert_eq!(matched, vec![portrait]);

    let long_edge = count_matches(temp_dir.path(), &["long>=800"], config())
        .await
        .unwrap();
    assert_eq!(long_edge, 2);

    let exact_width = count_matches(temp_dir.path(), &["width==600", "height==800"], config())
        .await
        .unwrap();
    assert_eq!(exact_width, 1);
}

#[tokio::test]
async fn test_negated_filter_excludes_unreadable_entries() {
    let temp_dir = TempDir::new().unwrap();
    write_file(&temp_dir.path().join("small.png"), &gray_png(10, 10));
    write_file(&temp_dir.path().join("notes.txt"), b"not an image");

    // ヘッダを読めないエントリは否定フィルタでも一致しない
    let matched = count_matches(temp_dir.path(), &["!width>100"], config())
        .await
        .unwrap();
    assert_eq!(matched, 1);
}

#[tokio::test]
async fn test_validity_filter() {
    let temp_dir = TempDir::new().unwrap();
    write_file(&temp_dir.path().join("good.png"), &rgb_png(16, 16));
    write_file(&temp_dir.path().join("junk.png"), b"\x89PNG but not really");

    let valid = count_matches(temp_dir.path(), &["valid"], config())
        .await
        .unwrap();
    assert_eq!(valid, 1);

    let invalid = list_matches(temp_dir.path(), &["!valid"], config())
        .await
        .unwrap();
    assert_eq!(invalid, vec![temp_dir.path().join("junk.png")]);
}
