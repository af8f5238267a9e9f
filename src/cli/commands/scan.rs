use crate::cli::args::ScanArgs;
use crate::core::{AggregateMode, AggregateResult, ScanSummary};
use crate::engine::{scan_directory_with_engine, ScanEngine};
use crate::filter::Predicate;
use crate::image_loader::standard::StandardImageLoader;
use crate::services::{ConsoleProgressReporter, DefaultProcessingConfig};
use crate::storage::local::LocalStorageBackend;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::time::Duration;
use tracing::warn;

/// コマンドライン引数から述語を組み立てる
///
/// `--lenient` の場合、解釈できないフィルタは何にも一致しない条件に置き換える。
pub fn build_predicate(args: &ScanArgs) -> Result<Predicate> {
    if args.lenient {
        let (predicate, errors) = Predicate::parse_lenient(&args.filters);
        if !errors.is_empty() {
            warn!(
                rejected = errors.len(),
                "Malformed filters were replaced by a filter that matches nothing"
            );
        }
        return Ok(predicate);
    }

    Predicate::parse(&args.filters).context("Invalid filter")
}

/// コマンドライン引数から処理設定を組み立てる
pub fn build_config(args: &ScanArgs) -> Result<DefaultProcessingConfig> {
    let deadline = args
        .timeout
        .map(|secs| {
            Duration::try_from_secs_f64(secs)
                .with_context(|| format!("Invalid timeout: {secs}"))
        })
        .transpose()?;

    Ok(DefaultProcessingConfig::new(args.threads)
        .with_recursive(!args.flat)
        .with_deadline(deadline)
        .with_progress_reporting(!args.quiet))
}

/// 進捗表示を選ぶ（`--quiet` と `--json` では何も表示しない）
pub fn build_reporter(args: &ScanArgs) -> ConsoleProgressReporter {
    if args.quiet || args.json {
        ConsoleProgressReporter::quiet()
    } else {
        ConsoleProgressReporter::new()
    }
}

/// スキャンを実行してサマリーを返す
pub async fn execute_scan(mode: AggregateMode, args: &ScanArgs) -> Result<ScanSummary> {
    let predicate = build_predicate(args)?;
    let config = build_config(args)?;

    let engine = ScanEngine::new(
        LocalStorageBackend::new(),
        StandardImageLoader::new(),
        config,
        build_reporter(args),
    );

    let summary = scan_directory_with_engine(&args.target_directory, predicate, mode, &engine)
        .await
        .with_context(|| format!("Scan failed: {}", args.target_directory.display()))?;

    Ok(summary)
}

/// 標準出力に書き出す内容を組み立てる
pub fn render_summary(summary: &ScanSummary, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(summary).context("Failed to serialize scan summary");
    }

    let mut out = String::new();
    match &summary.result {
        AggregateResult::Count(count) => writeln!(out, "{count}")?,
        AggregateResult::Paths(paths) => {
            for path in paths {
                writeln!(out, "{}", path.display())?;
            }
        }
        AggregateResult::First(Some(path)) => writeln!(out, "{}", path.display())?,
        AggregateResult::First(None) => {}
    }

    Ok(out)
}
