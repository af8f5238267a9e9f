use anyhow::Result;
use clap::Parser;
use std::io::Write;
use tracing_subscriber::EnvFilter;

use image_filter::cli::{execute_scan, render_summary, Cli};

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("image_filter=debug,warn")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::new("image_filter=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mode = cli.command.mode();
    let args = cli.command.args();

    let summary = execute_scan(mode, args).await?;

    if summary.partial {
        eprintln!(
            "⚠️  タイムアウトのため途中結果です ({}/{} 件評価済み)",
            summary.evaluated, summary.total_entries
        );
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(render_summary(&summary, args.json)?.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let args = cli.command.args();
    setup_logging(args.verbose, args.quiet);

    // 期限切れで切り離したタスクを待たずに終了する
    let code = match run(cli).await {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ エラー: {error:#}");
            1
        }
    };

    std::process::exit(code);
}
