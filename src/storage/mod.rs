use anyhow::Result;
use mockall::automock;
use std::io::{BufRead, Seek};
use std::path::{Path, PathBuf};

pub mod local;

/// 画像デコーダに渡す読み込みストリーム
pub trait ImageSource: BufRead + Seek + Send {}

impl<T: BufRead + Seek + Send> ImageSource for T {}

/// ストレージバックエンドのトレイト
///
/// 全メソッドはブロッキング呼び出しで、ワーカースレッド上から並行に呼ばれる。
#[automock]
pub trait StorageBackend: Send + Sync {
    /// ルート以下の通常ファイルを列挙する（順序は保証しない）
    fn list_files(&self, root: &Path, recursive: bool) -> Result<Vec<PathBuf>>;

    /// ファイルサイズ（バイト）を取得
    fn stat(&self, path: &Path) -> std::io::Result<u64>;

    /// ファイルを開く
    ///
    /// 返されたストリームがドロップされるまでハンドルは開いたまま。
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn ImageSource>>;
}

// StorageBackend for Box<dyn StorageBackend>
impl StorageBackend for Box<dyn StorageBackend> {
    fn list_files(&self, root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        self.as_ref().list_files(root, recursive)
    }

    fn stat(&self, path: &Path) -> std::io::Result<u64> {
        self.as_ref().stat(path)
    }

    fn open(&self, path: &Path) -> std::io::Result<Box<dyn ImageSource>> {
        self.as_ref().open(path)
    }
}
