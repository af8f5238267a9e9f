// Evaluator - 単一エントリの述語評価

use crate::core::{EntryError, EntryMetadata};
use crate::filter::{DecodeLevel, Predicate, Requirements};
use crate::image_loader::ImageLoaderBackend;
use crate::storage::StorageBackend;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// エントリごとに必要最小限のメタデータを取得して述語を評価する
///
/// サイズだけなら stat のみ、寸法・フォーマット・色構成ならヘッダのみ、
/// 有効性の判定が必要な場合だけ全体をデコードする。
pub struct PredicateEvaluator<S, L> {
    storage: Arc<S>,
    loader: Arc<L>,
    predicate: Predicate,
    requirements: Requirements,
}

impl<S, L> PredicateEvaluator<S, L>
where
    S: StorageBackend,
    L: ImageLoaderBackend,
{
    pub fn new(storage: Arc<S>, loader: Arc<L>, predicate: Predicate) -> Self {
        let requirements = predicate.requirements();
        Self {
            storage,
            loader,
            predicate,
            requirements,
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn requirements(&self) -> Requirements {
        self.requirements
    }

    /// 述語を評価する
    ///
    /// オープン・stat・ヘッダデコードの失敗はエラーとして返す（呼び出し側でソフトエラー扱い）。
    /// 全体デコードの失敗は有効性の判定結果であり、エラーにはならない。
    pub fn evaluate(&self, path: &Path) -> Result<bool, EntryError> {
        if self.predicate.is_unsatisfiable() {
            return Ok(false);
        }

        let mut meta = EntryMetadata::default();

        if self.requirements.stat {
            let size = self
                .storage
                .stat(path)
                .map_err(|e| EntryError::open(path, e))?;
            meta.size_bytes = Some(size);

            if self.predicate.rejected_by_size(&meta) {
                return Ok(false);
            }
        }

        match self.requirements.decode {
            DecodeLevel::None => {}
            DecodeLevel::Header => {
                let source = self
                    .storage
                    .open(path)
                    .map_err(|e| EntryError::open(path, e))?;
                let header = self
                    .loader
                    .read_header(path, source)
                    .map_err(|e| EntryError::decode(path, e))?;
                meta.header = Some(header);
            }
            DecodeLevel::Full => {
                let source = self
                    .storage
                    .open(path)
                    .map_err(|e| EntryError::open(path, e))?;
                match self.loader.decode_full(path, source) {
                    Ok(header) => {
                        meta.header = Some(header);
                        meta.valid = Some(true);
                    }
                    Err(error) => {
                        debug!(path = %path.display(), error = %error, "Image failed full decode");
                        meta.valid = Some(false);
                    }
                }
            }
        }

        Ok(self.predicate.matches(&meta))
    }
}
