use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global secsweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Label used for the encrypted backup bundle name
    #[serde(default = "default_archive_label")]
    pub archive_label: String,

    /// Journal retention window passed to `journalctl --vacuum-time`
    #[serde(default = "default_journal_vacuum_days")]
    pub journal_vacuum_days: u32,

    /// GVM data directory backed up before a purge
    #[serde(default = "default_gvm_data_dir")]
    pub gvm_data_dir: PathBuf,

    /// Additional cache directories swept by the browser-caches operation
    #[serde(default)]
    pub extra_cache_paths: Vec<PathBuf>,
}

fn default_archive_label() -> String {
    "secsweep-backup".to_string()
}
fn default_journal_vacuum_days() -> u32 {
    7
}
fn default_gvm_data_dir() -> PathBuf {
    PathBuf::from("/var/lib/gvm")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_label: default_archive_label(),
            journal_vacuum_days: default_journal_vacuum_days(),
            gvm_data_dir: default_gvm_data_dir(),
            extra_cache_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Get the secsweep data directory (~/.secsweep)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".secsweep")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Get the backup directory (owner-only; enforced on every write)
    pub fn backup_dir() -> PathBuf {
        Self::data_dir().join("backups")
    }

    /// Get the audit logs directory
    pub fn logs_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    /// Load config from file, or create default if not exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        let dir = path.parent().unwrap();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Initialize the secsweep data tree with restrictive permissions
    pub fn init_dirs() -> Result<()> {
        for dir in [Self::data_dir(), Self::backup_dir(), Self::logs_dir()] {
            super::permissions::ensure_private_dir(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }
}
