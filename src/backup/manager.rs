use chrono::Local;
use std::path::{Path, PathBuf};

use super::{BackupArtifact, BackupError};
use crate::common::permissions;

/// Copies sensitive paths into the backup directory before destructive
/// operations run.
///
/// Per-file copies are named `<basename>_<timestamp>`. The directory is
/// kept at 0700 and every copy at 0600; both are re-enforced on each write
/// rather than assumed from startup.
pub struct BackupManager {
    backup_dir: PathBuf,
}

impl BackupManager {
    pub fn new(backup_dir: PathBuf) -> Self {
        Self { backup_dir }
    }

    /// The directory all artifacts live under.
    pub fn dir(&self) -> &Path {
        &self.backup_dir
    }

    fn ensure_dir(&self) -> Result<(), BackupError> {
        permissions::ensure_private_dir(&self.backup_dir)
            .map_err(|e| BackupError::io(&self.backup_dir, e))
    }

    /// Back up one path into the backup directory.
    ///
    /// A missing source is not an error: there is nothing to protect, and
    /// the returned artifact records that as a no-op. Mode and mtime are
    /// preserved where the platform allows; the copy then gets owner-only
    /// permissions regardless of what the source had.
    pub fn backup_path(&self, src: &Path) -> Result<BackupArtifact, BackupError> {
        let created_at = Local::now();

        if !src.exists() {
            return Ok(BackupArtifact {
                source: src.to_path_buf(),
                storage: None,
                created_at,
                encrypted: false,
                passphrase_protected: false,
            });
        }

        self.ensure_dir()?;

        let basename = src
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "backup".to_string());
        let dest = self.backup_dir.join(format!(
            "{}_{}",
            basename,
            created_at.format("%Y%m%d-%H%M%S")
        ));

        if src.is_dir() {
            copy_dir_recursive(src, &dest)?;
            permissions::restrict_dir(&dest).map_err(|e| BackupError::io(&dest, e))?;
        } else {
            copy_file_preserving(src, &dest)?;
        }

        Ok(BackupArtifact {
            source: src.to_path_buf(),
            storage: Some(dest),
            created_at,
            encrypted: false,
            passphrase_protected: false,
        })
    }
}

/// Copy a file, carrying over the modification time when readable, then
/// restrict the copy to owner read/write.
fn copy_file_preserving(src: &Path, dest: &Path) -> Result<(), BackupError> {
    std::fs::copy(src, dest).map_err(|e| BackupError::io(src, e))?;

    // Best effort: a source whose metadata cannot be read still produced a
    // valid copy.
    if let Ok(meta) = std::fs::metadata(src) {
        if let Ok(mtime) = meta.modified() {
            if let Ok(file) = std::fs::File::options().write(true).open(dest) {
                let _ = file.set_modified(mtime);
            }
        }
    }

    permissions::restrict_file(dest).map_err(|e| BackupError::io(dest, e))
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<(), BackupError> {
    permissions::ensure_private_dir(dest).map_err(|e| BackupError::io(dest, e))?;

    for entry in std::fs::read_dir(src).map_err(|e| BackupError::io(src, e))? {
        let entry = entry.map_err(|e| BackupError::io(src, e))?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path)?;
        } else {
            copy_file_preserving(&src_path, &dest_path)?;
        }
    }

    Ok(())
}
