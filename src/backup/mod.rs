pub mod archive;
pub mod manager;

pub use manager::BackupManager;

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

/// Record of one backup the manager produced (or deliberately skipped).
///
/// Artifacts are never mutated after creation; a later backup of the same
/// source supersedes the old one with a fresh timestamp in its name.
#[derive(Debug, Clone, Serialize)]
pub struct BackupArtifact {
    /// The path that was protected
    pub source: PathBuf,

    /// Where the copy (or encrypted bundle) lives. `None` means the source
    /// did not exist and there was nothing to protect.
    pub storage: Option<PathBuf>,

    /// When the artifact was created
    pub created_at: DateTime<Local>,

    /// Whether the artifact is an encrypted bundle
    pub encrypted: bool,

    /// Whether a passphrase is required to open the artifact
    pub passphrase_protected: bool,
}

impl BackupArtifact {
    /// True if there was nothing to copy (missing optional source).
    pub fn is_noop(&self) -> bool {
        self.storage.is_none()
    }
}

/// Failures of the backup manager. Each aborts only the operation it was
/// protecting; the batch continues.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encryption tool (gpg) not found on PATH; unencrypted backup kept")]
    EncryptionUnavailable,

    #[error("encryption failed ({status}); unencrypted backup kept")]
    EncryptionFailed { status: std::process::ExitStatus },

    #[error("backup directory has no contents to archive")]
    NothingToArchive,
}

impl BackupError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
