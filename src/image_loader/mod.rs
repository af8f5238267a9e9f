use crate::core::ImageHeader;
use crate::storage::ImageSource;
use anyhow::Result;
use mockall::automock;
use std::path::Path;

pub mod standard;

/// 画像デコーダのトレイト
///
/// `path` はフォーマット推定のヒントにのみ使い、読み込みは `source` から行う。
/// ストリームは呼び出しの終わりで閉じられる。
#[automock]
pub trait ImageLoaderBackend: Send + Sync {
    /// ヘッダのみをデコードして寸法・フォーマット・色構成を取得
    fn read_header(&self, path: &Path, source: Box<dyn ImageSource>) -> Result<ImageHeader>;

    /// ピクセルデータまで全てデコードする（破損検出用）
    fn decode_full(&self, path: &Path, source: Box<dyn ImageSource>) -> Result<ImageHeader>;

    /// 読み込み戦略の名前を取得
    fn strategy_name(&self) -> &'static str;
}
