use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use image_filter::count_matches;
use image_filter::services::{DefaultProcessingConfig, DEFAULT_MAX_CONCURRENT};

const FILTER: &str = "short<512";

#[derive(Parser, Debug)]
#[command(name = "count_small")]
#[command(about = "Count images whose short edge is below 512 pixels")]
struct Args {
    /// Target directory to scan
    target_directory: PathBuf,

    /// Maximum number of files evaluated at the same time
    #[arg(short, long, default_value_t = DEFAULT_MAX_CONCURRENT)]
    threads: usize,

    /// Only scan the top level of the target directory
    #[arg(long)]
    flat: bool,
}

async fn run(args: Args) -> Result<u64> {
    let config = DefaultProcessingConfig::new(args.threads)
        .with_recursive(!args.flat)
        .with_progress_reporting(false);

    Ok(count_matches(&args.target_directory, &[FILTER], config).await?)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(matched) => println!("{FILTER} : {matched}"),
        Err(error) => {
            eprintln!("❌ エラー: {error:#}");
            std::process::exit(1);
        }
    }
}
