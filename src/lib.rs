// 画像ディレクトリの並列スキャンと述語による集計

pub mod cli;
pub mod core;
pub mod engine;
pub mod filter;
pub mod image_loader;
pub mod services;
pub mod storage;

pub use crate::core::{AggregateMode, AggregateResult, ScanError, ScanResult, ScanSummary};
pub use crate::engine::{count_matches, list_matches, ScanEngine};
pub use crate::filter::Predicate;
