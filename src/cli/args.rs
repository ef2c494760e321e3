use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::common::Mode;

/// secsweep — a guarded cleanup utility for security workstations
#[derive(Parser, Debug)]
#[command(
    name = "secsweep",
    version,
    about = "Guarded cleanup of caches, logs, and security-tool databases",
    long_about = "secsweep removes caches and logs from a security workstation and can\n\
                   reset security-tool databases. Destructive steps are gated behind\n\
                   typed-keyword confirmation and a mandatory encrypted backup.",
    after_help = "EXAMPLES:\n  \
        secsweep clean --dry-run               Preview the whole pipeline\n  \
        secsweep clean                         Run with interactive confirmation\n  \
        secsweep clean --yes                   Auto-confirm routine steps\n  \
        secsweep clean --dangerous             Also offer database resets\n  \
        secsweep backup ~/.msf4 --encrypt      Back up and encrypt one path\n  \
        secsweep list                          Show the catalog with risk tiers\n  \
        secsweep clean --no-log                Console output only, no audit file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Simulate everything; no operation is allowed to run
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Auto-confirm routine (non-dangerous) operations
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// No prompts; operations that would ask are skipped
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable dangerous operations (each still requires its keyword)
    #[arg(long, global = true)]
    pub dangerous: bool,

    /// Do not write the persistent audit log
    #[arg(long, global = true)]
    pub no_log: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose diagnostics on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Snapshot the mode flags into the immutable value every component
    /// receives.
    pub fn mode(&self) -> Mode {
        Mode {
            dry_run: self.dry_run,
            auto_yes: self.yes,
            quiet: self.quiet,
            dangerous_enabled: self.dangerous,
            no_log: self.no_log,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the cleanup pipeline
    Clean,

    /// Back up named sensitive paths on demand
    Backup {
        /// Paths to copy into the backup directory
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Also archive and encrypt the backup directory afterwards
        #[arg(long)]
        encrypt: bool,
    },

    /// List registered operations with their risk tiers
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Initialize secsweep directories and default config
    Init,

    /// Reset to default configuration
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
