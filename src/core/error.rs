// スキャン処理のエラー型定義
// 実行全体を止める致命的エラーと、エントリ単位のソフトエラーを分けて扱う

use std::path::{Path, PathBuf};
use thiserror::Error;

/// スキャン全体を中断させる致命的エラー
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("ディレクトリ列挙エラー: {path} - {source}")]
    EnumerationError {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("フィルタ指定エラー: `{spec}` - {reason}")]
    ConstraintSpecError { spec: String, reason: String },

    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("並列処理エラー: {message}")]
    ParallelExecutionError { message: String },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ScanError {
    /// ディレクトリ列挙エラーの作成
    pub fn enumeration(path: impl Into<PathBuf>, source: anyhow::Error) -> Self {
        Self::EnumerationError {
            path: path.into(),
            source,
        }
    }

    /// フィルタ指定エラーの作成
    pub fn constraint_spec(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConstraintSpecError {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// 並列実行エラーの作成
    pub fn parallel_execution(message: impl Into<String>) -> Self {
        Self::ParallelExecutionError {
            message: message.into(),
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// スキャン開始前に検出されるエラーかどうか
    ///
    /// これらのエラーではタスクが一つも起動されない。
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            Self::EnumerationError { .. }
                | Self::ConstraintSpecError { .. }
                | Self::ConfigurationError { .. }
        )
    }

    /// エラーが回復可能かどうかを判定
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ConstraintSpecError { .. } | Self::ConfigurationError { .. } => false,
            Self::EnumerationError { .. } => false,
            Self::ParallelExecutionError { .. } => true,
            Self::TaskError { .. } => true,
        }
    }
}

impl From<tokio::task::JoinError> for ScanError {
    fn from(error: tokio::task::JoinError) -> Self {
        ScanError::TaskError { source: error }
    }
}

impl From<tokio::sync::AcquireError> for ScanError {
    fn from(error: tokio::sync::AcquireError) -> Self {
        ScanError::parallel_execution(format!("セマフォ取得エラー: {error}"))
    }
}

/// スキャンの結果型
pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// エントリ単位のエラー
///
/// 該当エントリは集計から除外されるが、スキャンは継続する。
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("ファイルオープンエラー: {path} - {source}")]
    OpenError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("画像デコードエラー: {path} - {source}")]
    DecodeError {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl EntryError {
    pub fn open(path: &Path, source: std::io::Error) -> Self {
        Self::OpenError {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn decode(path: &Path, source: anyhow::Error) -> Self {
        Self::DecodeError {
            path: path.to_path_buf(),
            source,
        }
    }

    /// エラーが発生したエントリのパス
    pub fn path(&self) -> &Path {
        match self {
            Self::OpenError { path, .. } | Self::DecodeError { path, .. } => path,
        }
    }

    /// ログ出力用の分類名
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::OpenError { .. } => "open",
            Self::DecodeError { .. } => "decode",
        }
    }
}
