use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use secsweep::audit::AuditLogger;
use secsweep::backup::BackupManager;
use secsweep::cli::args::{Cli, Commands, ConfigAction, OutputFormat};
use secsweep::cli::output;
use secsweep::common::{Config, Mode};
use secsweep::guard::{ConfirmationGate, GuardedExecutor, TerminalPrompter};
use secsweep::{ops, report};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("secsweep=debug")
            .init();
    }

    let mode = cli.mode();

    match cli.command {
        Commands::Clean => cmd_clean(&cli, mode),
        Commands::Backup {
            ref paths,
            encrypt,
        } => cmd_backup(&cli, mode, paths, encrypt),
        Commands::List => cmd_list(&cli),
        Commands::Config { action } => cmd_config(action),
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                secsweep::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                secsweep::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                secsweep::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "secsweep", &mut std::io::stdout());
            Ok(())
        }
    }
}

// ─── Clean ────────────────────────────────────────────────────────────────────

fn cmd_clean(cli: &Cli, mode: Mode) -> Result<()> {
    let config = Config::load()?;
    let registry = ops::build_registry(&config);

    // The one fatal check: with a missing escalation helper the batch
    // never starts. Skipped under dry-run, where no action will execute.
    if !mode.dry_run {
        ops::check_preconditions(&registry)?;
    }

    if !mode.quiet {
        println!();
        if mode.dry_run {
            println!("  {} Dry run — nothing will be modified.", "ℹ️");
        }
        println!(
            "  {} Running {} operations{}",
            "🧹",
            registry.len(),
            if mode.dangerous_enabled {
                " (dangerous enabled)".red().bold().to_string()
            } else {
                String::new()
            }
        );
        println!();
    }

    let disk_before = report::disk_summary("/");

    let mut log = AuditLogger::new(&Config::logs_dir(), mode.no_log);
    let gate = ConfirmationGate::new(mode);
    let backups = BackupManager::new(Config::backup_dir());
    let executor = GuardedExecutor::new(gate, backups, &config.archive_label);

    let mut prompter = TerminalPrompter;
    let run_report = executor.run(&registry, &mut prompter, &mut log);

    // Per-operation failures are recoverable at the batch level; the run
    // still reports success and ends with the disk summary.
    match cli.format {
        OutputFormat::Human => output::print_run_report(&run_report),
        OutputFormat::Json => output::print_run_json(&run_report),
        OutputFormat::Quiet => output::print_run_quiet(&run_report),
    }

    if matches!(cli.format, OutputFormat::Human) {
        output::print_disk_summary(disk_before.as_ref(), report::disk_summary("/").as_ref());
    }

    if let Some(path) = log.path() {
        if !mode.quiet {
            println!(
                "  Audit log: {}",
                secsweep::common::format::format_path(path)
            );
            println!();
        }
    }

    Ok(())
}

// ─── Backup ───────────────────────────────────────────────────────────────────

fn cmd_backup(cli: &Cli, mode: Mode, paths: &[std::path::PathBuf], encrypt: bool) -> Result<()> {
    let config = Config::load()?;
    let mut log = AuditLogger::new(&Config::logs_dir(), mode.no_log);
    let backups = BackupManager::new(Config::backup_dir());

    if mode.dry_run {
        for path in paths {
            log.record(&format!(
                "[dry-run] would back up {}",
                secsweep::common::format::format_path(path)
            ));
        }
        if encrypt {
            log.record("[dry-run] would archive and encrypt the backup directory");
        }
        return Ok(());
    }

    for path in paths {
        match backups.backup_path(path) {
            Ok(artifact) => {
                log.record(&format!(
                    "backed up {}",
                    secsweep::common::format::format_path(path)
                ));
                output::print_artifact(&artifact);
            }
            Err(e) => {
                log.record(&format!("ERROR backup failed: {}", e));
                println!("  {} {}", "✗".red(), e);
            }
        }
    }

    if encrypt {
        let show_progress = !mode.quiet && matches!(cli.format, OutputFormat::Human);
        match backups.archive_and_encrypt(&config.archive_label, show_progress) {
            Ok(artifact) => {
                log.record("encrypted backup bundle created");
                output::print_artifact(&artifact);
                let gate = ConfirmationGate::new(mode);
                let mut prompter = TerminalPrompter;
                if gate.confirm_extra(
                    "Delete the unencrypted backup copies, keeping only the encrypted bundle?",
                    &mut prompter,
                    &mut log,
                ) {
                    let removed = backups.remove_unencrypted_intermediates()?;
                    log.record(&format!("removed {} unencrypted intermediates", removed));
                }
            }
            Err(e) => {
                // Unencrypted copies stay on disk; losing data is worse
                // than leaving it unencrypted.
                log.record(&format!("ERROR {}", e));
                println!("  {} {}", "✗".red(), e);
            }
        }
    }

    Ok(())
}

// ─── List ─────────────────────────────────────────────────────────────────────

fn cmd_list(cli: &Cli) -> Result<()> {
    let config = Config::load()?;
    let registry = ops::build_registry(&config);

    match cli.format {
        OutputFormat::Human => output::print_catalog(&registry),
        OutputFormat::Json => output::print_catalog_json(&registry),
        OutputFormat::Quiet => output::print_catalog_quiet(&registry),
    }

    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            Config::init_dirs()?;
            let config = Config::default();
            config.save()?;
            println!("  {} secsweep initialized at ~/.secsweep", "✓".green());
            println!("  Created: config.toml, backups/, logs/");
            Ok(())
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            match key.as_str() {
                "journal_vacuum_days" => config.journal_vacuum_days = value.parse()?,
                "archive_label" => config.archive_label = value.clone(),
                "gvm_data_dir" => config.gvm_data_dir = value.clone().into(),
                _ => anyhow::bail!("Unknown config key: {}", key),
            }
            config.save()?;
            println!("  {} Set {} = {}", "✓".green(), key, value);
            Ok(())
        }
    }
}
