use anyhow::Result;
use std::path::PathBuf;

use crate::common::Config;
use crate::guard::{OpAction, Operation, OperationRegistry, RiskTier};

/// The cleanup catalog for a security workstation.
///
/// The guarded executor treats every entry as opaque; everything the tool
/// actually deletes or resets is declared here, and registration order is
/// the execution order. The archive-and-encrypt step comes last so all
/// backups of this run are already in the backup directory.
pub fn build_registry(config: &Config) -> OperationRegistry {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
    let mut registry = OperationRegistry::new();

    registry.register(Operation::new(
        "apt-clean",
        "Clear the apt package cache",
        RiskTier::Safe,
        sudo(&["apt-get", "clean"]),
    ));

    registry.register(Operation::new(
        "thumbnail-cache",
        "Remove the thumbnail cache",
        RiskTier::Safe,
        OpAction::RemovePaths(vec![home.join(".cache/thumbnails")]),
    ));

    registry.register(Operation::new(
        "pip-cache",
        "Remove the pip download cache",
        RiskTier::Safe,
        OpAction::RemovePaths(vec![home.join(".cache/pip")]),
    ));

    registry.register(Operation::new(
        "journal-vacuum",
        "Vacuum the systemd journal",
        RiskTier::Confirm,
        sudo(&[
            "journalctl",
            &format!("--vacuum-time={}d", config.journal_vacuum_days),
        ]),
    ));

    registry.register(Operation::new(
        "rotated-logs",
        "Delete rotated log files under /var/log",
        RiskTier::Confirm,
        sudo(&[
            "find", "/var/log", "-type", "f", "(", "-name", "*.gz", "-o", "-name", "*.1", ")",
            "-delete",
        ]),
    ));

    let user = std::env::var("USER").unwrap_or_else(|_| "root".to_string());
    registry.register(Operation::new(
        "tmp-sweep",
        "Delete the user's stale files under /tmp (older than two days)",
        RiskTier::Confirm,
        OpAction::Command {
            program: "find".to_string(),
            args: vec![
                "/tmp".to_string(),
                "-maxdepth".to_string(),
                "2".to_string(),
                "-type".to_string(),
                "f".to_string(),
                "-user".to_string(),
                user,
                "-mtime".to_string(),
                "+2".to_string(),
                "-delete".to_string(),
            ],
        },
    ));

    let mut browser_caches = vec![
        home.join(".cache/mozilla"),
        home.join(".cache/chromium"),
        home.join(".cache/google-chrome"),
    ];
    browser_caches.extend(config.extra_cache_paths.iter().cloned());
    registry.register(Operation::new(
        "browser-caches",
        "Remove browser cache directories",
        RiskTier::Confirm,
        OpAction::RemovePaths(browser_caches),
    ));

    registry.register(Operation::new(
        "trash-empty",
        "Empty the desktop trash",
        RiskTier::Confirm,
        OpAction::RemovePaths(vec![
            home.join(".local/share/Trash/files"),
            home.join(".local/share/Trash/info"),
        ]),
    ));

    registry.register(
        Operation::new(
            "shell-history",
            "Wipe shell history files",
            RiskTier::Dangerous,
            OpAction::RemovePaths(vec![home.join(".bash_history"), home.join(".zsh_history")]),
        )
        .with_keyword("WIPE-HISTORY")
        .with_backup_of(vec![home.join(".bash_history"), home.join(".zsh_history")]),
    );

    registry.register(
        Operation::new(
            "reset-msfdb",
            "Reinitialize the Metasploit database",
            RiskTier::Dangerous,
            sudo(&["msfdb", "reinit"]),
        )
        .with_keyword("RESET-MSFDB")
        .with_backup_of(vec![home.join(".msf4")]),
    );

    registry.register(
        Operation::new(
            "purge-gvm",
            "Rebuild the GVM vulnerability database",
            RiskTier::Dangerous,
            sudo(&["gvmd", "--rebuild"]),
        )
        .with_keyword("PURGE-GVM")
        .with_backup_of(vec![config.gvm_data_dir.clone()]),
    );

    registry.register(Operation::new(
        "encrypt-backups",
        "Archive and encrypt this run's backups",
        RiskTier::Confirm,
        OpAction::ArchiveBackups,
    ));

    registry
}

fn sudo(args: &[&str]) -> OpAction {
    OpAction::Command {
        program: "sudo".to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
    }
}

/// Check whether an external program answers `--version`.
pub fn is_program_available(program: &str) -> bool {
    std::process::Command::new(program)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Verify hard prerequisites before any operation runs. A missing
/// privilege-escalation helper is the one failure that aborts the entire
/// batch, with a non-zero exit.
pub fn check_preconditions(registry: &OperationRegistry) -> Result<()> {
    for program in registry.required_programs() {
        if program == "sudo" && !is_program_available("sudo") {
            anyhow::bail!(
                "required privilege-escalation helper 'sudo' is not available; \
                 no operations were run"
            );
        }
    }
    Ok(())
}
