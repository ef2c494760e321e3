use serde::Serialize;
use std::path::PathBuf;

/// How destructive an operation is, controlling which gate rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    /// Runs without asking
    Safe,
    /// Needs a yes/no answer (or --yes)
    Confirm,
    /// Needs --dangerous plus an exact typed keyword
    Dangerous,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Safe => write!(f, "safe"),
            RiskTier::Confirm => write!(f, "confirm"),
            RiskTier::Dangerous => write!(f, "dangerous"),
        }
    }
}

/// What an operation does, expressed as a capability rather than a command
/// string so the executor can describe it faithfully without running it.
#[derive(Debug, Clone)]
pub enum OpAction {
    /// Delete a fixed set of paths (missing paths are fine)
    RemovePaths(Vec<PathBuf>),

    /// Run one external program with fixed arguments
    Command { program: String, args: Vec<String> },

    /// Archive the backup directory and encrypt the result
    ArchiveBackups,
}

impl OpAction {
    /// One-line statement of intent, used verbatim by dry-run logging.
    pub fn describe(&self) -> String {
        match self {
            OpAction::RemovePaths(paths) => {
                let list: Vec<String> = paths
                    .iter()
                    .map(|p| crate::common::format::format_path(p))
                    .collect();
                format!("remove {}", list.join(", "))
            }
            OpAction::Command { program, args } => {
                format!("run `{} {}`", program, args.join(" "))
            }
            OpAction::ArchiveBackups => "archive and encrypt the backup directory".to_string(),
        }
    }

    /// External program this action depends on, if any.
    pub fn program(&self) -> Option<&str> {
        match self {
            OpAction::Command { program, .. } => Some(program),
            _ => None,
        }
    }
}

/// A registered cleanup step. Constructed once at registry build time,
/// immutable, invoked at most once per run.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Unique identifier, also used in log lines
    pub id: String,

    /// Operator-facing consequence statement
    pub description: String,

    pub risk: RiskTier,

    /// Exact keyword a Dangerous operation requires. Ignored for other
    /// tiers.
    pub keyword: Option<String>,

    /// Paths that must be backed up successfully before the action runs
    pub requires_backup_of: Vec<PathBuf>,

    pub action: OpAction,
}

impl Operation {
    pub fn new(id: &str, description: &str, risk: RiskTier, action: OpAction) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            risk,
            keyword: None,
            requires_backup_of: Vec::new(),
            action,
        }
    }

    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keyword = Some(keyword.to_string());
        self
    }

    pub fn with_backup_of(mut self, paths: Vec<PathBuf>) -> Self {
        self.requires_backup_of = paths;
        self
    }

    /// The keyword a Dangerous operation demands; derived from the id when
    /// none was declared explicitly.
    pub fn required_keyword(&self) -> String {
        self.keyword
            .clone()
            .unwrap_or_else(|| self.id.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_remove_paths() {
        let action = OpAction::RemovePaths(vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")]);
        assert_eq!(action.describe(), "remove /tmp/a, /tmp/b");
    }

    #[test]
    fn test_describe_command() {
        let action = OpAction::Command {
            program: "sudo".to_string(),
            args: vec!["apt-get".to_string(), "clean".to_string()],
        };
        assert_eq!(action.describe(), "run `sudo apt-get clean`");
    }

    #[test]
    fn test_keyword_defaults_to_uppercase_id() {
        let op = Operation::new(
            "purge-gvm",
            "Purge the GVM data",
            RiskTier::Dangerous,
            OpAction::RemovePaths(vec![]),
        );
        assert_eq!(op.required_keyword(), "PURGE-GVM");

        let op = op.with_keyword("RESET-MSFDB");
        assert_eq!(op.required_keyword(), "RESET-MSFDB");
    }
}
