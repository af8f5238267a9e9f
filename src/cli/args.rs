use crate::core::AggregateMode;
use crate::services::DEFAULT_MAX_CONCURRENT;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "image_filter")]
#[command(about = "Count, list or find images in a directory that match a set of filters")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count the images matching every filter
    Count(ScanArgs),

    /// List the paths of the images matching every filter (unordered)
    List(ScanArgs),

    /// Report the first matching image found and stop
    Any(ScanArgs),
}

impl Commands {
    pub fn mode(&self) -> AggregateMode {
        match self {
            Self::Count(_) => AggregateMode::Count,
            Self::List(_) => AggregateMode::Collect,
            Self::Any(_) => AggregateMode::First,
        }
    }

    pub fn args(&self) -> &ScanArgs {
        match self {
            Self::Count(args) | Self::List(args) | Self::Any(args) => args,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Target directory to scan
    pub target_directory: PathBuf,

    /// Filters, all of which must hold (e.g. `filesize>10m`, `short<512`, `!rgba`, `valid`)
    pub filters: Vec<String>,

    /// Maximum number of files evaluated at the same time
    #[arg(short, long, default_value_t = DEFAULT_MAX_CONCURRENT)]
    pub threads: usize,

    /// Only scan the top level of the target directory
    #[arg(long)]
    pub flat: bool,

    /// Give up after this many seconds and report a partial result
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Treat malformed filters as matching nothing instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Print the full scan summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
