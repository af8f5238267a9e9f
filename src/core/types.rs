// スキャン処理に関連するデータ型定義

use chrono::{DateTime, Utc};
use image::{ColorType, ImageFormat};
use serde::Serialize;
use std::path::PathBuf;

/// 色チャンネル構成（ビット深度は区別しない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorLayout {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl ColorLayout {
    pub fn from_color_type(color: ColorType) -> Self {
        match (color.has_color(), color.has_alpha()) {
            (false, false) => Self::Gray,
            (false, true) => Self::GrayAlpha,
            (true, false) => Self::Rgb,
            (true, true) => Self::Rgba,
        }
    }
}

/// 画像ヘッダから得られる情報
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub format: Option<ImageFormat>,
    pub color: ColorLayout,
}

impl ImageHeader {
    /// 長辺
    pub fn long_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    /// 短辺
    pub fn short_edge(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// エントリごとのメタデータ
///
/// 述語が必要とするフィールドだけが埋まる。評価後に破棄され、キャッシュはしない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryMetadata {
    pub size_bytes: Option<u64>,
    pub header: Option<ImageHeader>,
    pub valid: Option<bool>,
}

/// 集計モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateMode {
    /// 一致件数のみ数える
    Count,
    /// 一致したパスを全て集める（順序なし）
    Collect,
    /// 最初の一致で打ち切る
    First,
}

/// 集計の最終結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateResult {
    Count(u64),
    Paths(Vec<PathBuf>),
    First(Option<PathBuf>),
}

impl AggregateResult {
    /// 結果に含まれる一致件数
    pub fn matched(&self) -> u64 {
        match self {
            Self::Count(count) => *count,
            Self::Paths(paths) => paths.len() as u64,
            Self::First(first) => u64::from(first.is_some()),
        }
    }
}

/// スキャン全体のサマリー
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    pub started_at: DateTime<Utc>,
    pub total_entries: usize,
    pub evaluated: usize,
    pub matched: u64,
    pub soft_failures: usize,
    pub panicked_tasks: usize,
    /// 期限切れで途中結果を返した場合に true
    pub partial: bool,
    /// 最初の一致で打ち切った場合に true
    pub stopped_early: bool,
    pub elapsed_ms: u64,
    pub result: AggregateResult,
}
