use super::{ImageSource, StorageBackend};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// ローカルファイルシステム用のストレージバックエンド
#[derive(Clone, Debug, Default)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    pub fn new() -> Self {
        Self
    }

    /// ルートが読み取り可能なディレクトリであることを確認
    fn check_root(root: &Path) -> Result<()> {
        let metadata = std::fs::metadata(root)
            .with_context(|| format!("Failed to get metadata for: {}", root.display()))?;

        if !metadata.is_dir() {
            anyhow::bail!("Not a directory: {}", root.display());
        }

        // 読み取り権限の確認を兼ねて一度開いておく
        std::fs::read_dir(root)
            .with_context(|| format!("Failed to read directory: {}", root.display()))?;

        Ok(())
    }
}

impl StorageBackend for LocalStorageBackend {
    fn list_files(&self, root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        Self::check_root(root)?;

        let mut walker = WalkDir::new(root).min_depth(1);
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    // ルート自体は検証済みなので、ここで失敗するのは配下のディレクトリのみ
                    warn!(
                        path = ?error.path(),
                        error = %error,
                        "Skipping unreadable directory entry"
                    );
                    continue;
                }
            };

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn stat(&self, path: &Path) -> std::io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    fn open(&self, path: &Path) -> std::io::Result<Box<dyn ImageSource>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}
