// フェイクストレージバックエンド
// メモリ上のファイルと、同時に開かれているハンドル数の計測

use anyhow::anyhow;
use image_filter::storage::{ImageSource, StorageBackend};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// ストレージ操作の計測値
#[derive(Debug, Default)]
pub struct StorageStats {
    pub opens: AtomicUsize,
    pub stats: AtomicUsize,
    pub open_handles: AtomicUsize,
    pub peak_open_handles: AtomicUsize,
}

impl StorageStats {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> usize {
        self.stats.load(Ordering::SeqCst)
    }

    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    pub fn peak_open_handles(&self) -> usize {
        self.peak_open_handles.load(Ordering::SeqCst)
    }
}

/// メモリ上のファイルを返すストレージ
///
/// `open` で返したストリームが生きている間は開いているハンドルとして数える。
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    root: PathBuf,
    files: BTreeMap<PathBuf, Arc<Vec<u8>>>,
    dirs: BTreeSet<PathBuf>,
    open_delay: Option<Duration>,
    stats: Arc<StorageStats>,
}

impl InMemoryStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut dirs = BTreeSet::new();
        dirs.insert(root.clone());

        Self {
            root,
            files: BTreeMap::new(),
            dirs,
            open_delay: None,
            stats: Arc::new(StorageStats::default()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// ルートからの相対パスでファイルを追加する
    pub fn with_file(mut self, relative: impl AsRef<Path>, bytes: Vec<u8>) -> Self {
        let path = self.root.join(relative);
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if !dir.starts_with(&self.root) {
                break;
            }
            self.dirs.insert(dir.to_path_buf());
            parent = dir.parent();
        }
        self.files.insert(path, Arc::new(bytes));
        self
    }

    /// ファイルを開くたびに待機する（ハンドルの重なりを起こしやすくする）
    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    pub fn stats(&self) -> Arc<StorageStats> {
        Arc::clone(&self.stats)
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.keys().cloned().collect()
    }
}

impl StorageBackend for InMemoryStorage {
    fn list_files(&self, root: &Path, recursive: bool) -> anyhow::Result<Vec<PathBuf>> {
        if !self.dirs.contains(root) {
            return Err(anyhow!("No such directory: {}", root.display()));
        }

        Ok(self
            .files
            .keys()
            .filter(|path| {
                if recursive {
                    path.starts_with(root)
                } else {
                    path.parent() == Some(root)
                }
            })
            .cloned()
            .collect())
    }

    fn stat(&self, path: &Path) -> io::Result<u64> {
        self.stats.stats.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(path)
            .map(|bytes| bytes.len() as u64)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn ImageSource>> {
        let bytes = self
            .files
            .get(path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;

        self.stats.opens.fetch_add(1, Ordering::SeqCst);
        let now = self.stats.open_handles.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.peak_open_handles.fetch_max(now, Ordering::SeqCst);

        let handle = TrackedHandle {
            inner: Cursor::new(bytes.as_ref().clone()),
            stats: Arc::clone(&self.stats),
        };

        if let Some(delay) = self.open_delay {
            std::thread::sleep(delay);
        }

        Ok(Box::new(handle))
    }
}

/// ドロップ時に開いているハンドル数を減らすストリーム
struct TrackedHandle {
    inner: Cursor<Vec<u8>>,
    stats: Arc<StorageStats>,
}

impl Read for TrackedHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for TrackedHandle {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amount: usize) {
        self.inner.consume(amount)
    }
}

impl Seek for TrackedHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl Drop for TrackedHandle {
    fn drop(&mut self) {
        self.stats.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}
