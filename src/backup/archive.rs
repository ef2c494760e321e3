use chrono::Local;
use flate2::write::GzEncoder;
use flate2::Compression;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{BackupArtifact, BackupError, BackupManager};
use crate::common::permissions;

/// Extensions that mark an entry as an already-produced bundle rather than
/// backup content; these are never re-archived.
fn is_bundle(path: &Path) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy().to_string());
    match name {
        Some(n) => n.ends_with(".tar.gz") || n.ends_with(".gpg"),
        None => false,
    }
}

impl BackupManager {
    /// Compress the backup directory's contents into one archive, then
    /// encrypt it symmetrically with AES-256 via `gpg`.
    ///
    /// gpg reads the passphrase through its own prompt; it is never placed
    /// on the command line and never logged. On any encryption failure the
    /// unencrypted archive is left in place so no data is lost, and the
    /// caller sees a typed error.
    pub fn archive_and_encrypt(
        &self,
        label: &str,
        show_progress: bool,
    ) -> Result<BackupArtifact, BackupError> {
        let tar_path = self.build_archive(label, show_progress)?;
        let bundle = encrypt_archive(&tar_path, "gpg")?;

        Ok(BackupArtifact {
            source: self.dir().to_path_buf(),
            storage: Some(bundle),
            created_at: Local::now(),
            encrypted: true,
            passphrase_protected: true,
        })
    }

    /// Build `<label>-<timestamp>.tar.gz` from the backup directory's
    /// contents (previous bundles excluded).
    pub fn build_archive(
        &self,
        label: &str,
        show_progress: bool,
    ) -> Result<PathBuf, BackupError> {
        let dir = self.dir().to_path_buf();
        permissions::ensure_private_dir(&dir).map_err(|e| BackupError::io(&dir, e))?;

        let entries: Vec<PathBuf> = std::fs::read_dir(&dir)
            .map_err(|e| BackupError::io(&dir, e))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| !is_bundle(p))
            .collect();

        if entries.is_empty() {
            return Err(BackupError::NothingToArchive);
        }

        let spinner = if show_progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} Archiving backups... {msg}")
                    .unwrap(),
            );
            Some(pb)
        } else {
            None
        };

        let tar_path = dir.join(format!(
            "{}-{}.tar.gz",
            label,
            Local::now().format("%Y%m%d-%H%M%S")
        ));

        let result = write_tar_gz(&tar_path, &entries);

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        match result {
            Ok(()) => {
                permissions::restrict_file(&tar_path)
                    .map_err(|e| BackupError::io(&tar_path, e))?;
                Ok(tar_path)
            }
            Err(e) => {
                // A half-written archive is worthless and would be swept
                // into the next bundle otherwise.
                let _ = std::fs::remove_file(&tar_path);
                Err(e)
            }
        }
    }

    /// Delete the unencrypted per-path copies and intermediate archives,
    /// keeping only encrypted bundles. Called only after the operator
    /// confirmed it.
    pub fn remove_unencrypted_intermediates(&self) -> Result<u64, BackupError> {
        let dir = self.dir();
        let mut removed = 0u64;

        for entry in std::fs::read_dir(dir).map_err(|e| BackupError::io(dir, e))? {
            let entry = entry.map_err(|e| BackupError::io(dir, e))?;
            let path = entry.path();

            let keep = path
                .file_name()
                .map(|n| n.to_string_lossy().ends_with(".gpg"))
                .unwrap_or(false);
            if keep {
                continue;
            }

            if path.is_dir() {
                std::fs::remove_dir_all(&path).map_err(|e| BackupError::io(&path, e))?;
            } else {
                std::fs::remove_file(&path).map_err(|e| BackupError::io(&path, e))?;
            }
            removed += 1;
        }

        Ok(removed)
    }
}

fn write_tar_gz(tar_path: &Path, entries: &[PathBuf]) -> Result<(), BackupError> {
    let file = std::fs::File::create(tar_path).map_err(|e| BackupError::io(tar_path, e))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for path in entries {
        let name = path.file_name().unwrap_or_default();
        let result = if path.is_dir() {
            builder.append_dir_all(name, path)
        } else {
            builder.append_path_with_name(path, name)
        };
        result.map_err(|e| BackupError::io(path, e))?;
    }

    let encoder = builder.into_inner().map_err(|e| BackupError::io(tar_path, e))?;
    encoder.finish().map_err(|e| BackupError::io(tar_path, e))?;
    Ok(())
}

/// Run the external encryption tool over a finished archive.
///
/// Stdio is inherited so the tool can collect the passphrase through its
/// own channel. A missing binary maps to `EncryptionUnavailable`, a
/// non-zero exit to `EncryptionFailed`; in both cases the unencrypted
/// archive stays on disk.
fn encrypt_archive(tar_path: &Path, program: &str) -> Result<PathBuf, BackupError> {
    let out_path = PathBuf::from(format!("{}.gpg", tar_path.display()));

    let status = Command::new(program)
        .arg("--symmetric")
        .arg("--cipher-algo")
        .arg("AES256")
        .arg("--output")
        .arg(&out_path)
        .arg(tar_path)
        .status();

    let status = match status {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BackupError::EncryptionUnavailable);
        }
        Err(e) => return Err(BackupError::io(tar_path, e)),
    };

    if !status.success() {
        let _ = std::fs::remove_file(&out_path);
        return Err(BackupError::EncryptionFailed { status });
    }

    permissions::restrict_file(&out_path).map_err(|e| BackupError::io(&out_path, e))?;
    Ok(out_path)
}
