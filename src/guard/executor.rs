use serde::Serialize;
use std::path::Path;

use super::gate::{ConfirmationDecision, ConfirmationGate};
use super::op::{OpAction, Operation};
use super::prompt::Prompter;
use super::registry::OperationRegistry;
use crate::audit::AuditLogger;
use crate::backup::{BackupArtifact, BackupError, BackupManager};
use crate::common::format;

/// Terminal state of one operation.
///
/// Skipped is normal control flow (denied, keyword mismatch); Aborted
/// means a backup or the action itself failed. Neither stops the batch:
/// operations are independent, individually gated steps, not a
/// transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OpStatus {
    Completed,
    Skipped,
    Aborted,
}

impl std::fmt::Display for OpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpStatus::Completed => write!(f, "completed"),
            OpStatus::Skipped => write!(f, "skipped"),
            OpStatus::Aborted => write!(f, "aborted"),
        }
    }
}

/// Outcome of one operation in a run.
#[derive(Debug, Clone, Serialize)]
pub struct OpOutcome {
    pub id: String,
    pub status: OpStatus,
    pub detail: String,
    pub bytes_freed: u64,
}

/// Everything a run produced, for the end-of-run report.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<OpOutcome>,
    pub backups: Vec<BackupArtifact>,
}

impl RunReport {
    pub fn count(&self, status: OpStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn bytes_freed(&self) -> u64 {
        self.outcomes.iter().map(|o| o.bytes_freed).sum()
    }
}

/// Runs every registered operation through the gate, the backup step, and
/// the action, strictly in registration order.
pub struct GuardedExecutor {
    gate: ConfirmationGate,
    backups: BackupManager,
    archive_label: String,
}

impl GuardedExecutor {
    pub fn new(gate: ConfirmationGate, backups: BackupManager, archive_label: &str) -> Self {
        Self {
            gate,
            backups,
            archive_label: archive_label.to_string(),
        }
    }

    pub fn run(
        &self,
        registry: &OperationRegistry,
        prompter: &mut dyn Prompter,
        log: &mut AuditLogger,
    ) -> RunReport {
        let mut report = RunReport::default();

        for op in registry.all() {
            let outcome = self.run_one(op, prompter, log, &mut report.backups);
            tracing::debug!(id = %op.id, status = %outcome.status, "operation finished");
            report.outcomes.push(outcome);
        }

        report
    }

    fn run_one(
        &self,
        op: &Operation,
        prompter: &mut dyn Prompter,
        log: &mut AuditLogger,
        backups: &mut Vec<BackupArtifact>,
    ) -> OpOutcome {
        // Pending -> Gated
        match self.gate.decide(op, prompter, log) {
            ConfirmationDecision::Deny => {
                log.record(&format!("skipped '{}'", op.id));
                return skipped(op, "denied");
            }
            ConfirmationDecision::Allow => {}
            ConfirmationDecision::RequireTypedKeyword(keyword) => {
                if !self.collect_keyword(op, &keyword, prompter) {
                    log.record(&format!(
                        "skipped '{}': keyword not confirmed",
                        op.id
                    ));
                    return skipped(op, "keyword not confirmed");
                }
                log.record(&format!("keyword confirmed for '{}'", op.id));
            }
        }

        // Gated -> Backing-up. Any backup failure aborts this operation
        // before its action ever runs.
        for src in &op.requires_backup_of {
            match self.backups.backup_path(src) {
                Ok(artifact) => {
                    if artifact.is_noop() {
                        log.record(&format!(
                            "'{}': {} absent, nothing to back up",
                            op.id,
                            format::format_path(src)
                        ));
                    } else {
                        log.record(&format!(
                            "'{}': backed up {} -> {}",
                            op.id,
                            format::format_path(src),
                            format::format_path(artifact.storage.as_deref().unwrap_or(Path::new("?")))
                        ));
                    }
                    backups.push(artifact);
                }
                Err(e) => {
                    log.record(&format!("ERROR '{}': backup failed: {}", op.id, e));
                    return OpOutcome {
                        id: op.id.clone(),
                        status: OpStatus::Aborted,
                        detail: format!("backup failed: {}", e),
                        bytes_freed: 0,
                    };
                }
            }
        }

        // Backing-up -> Executing
        let outcome = self.execute_action(op, prompter, log, backups);
        match outcome.status {
            OpStatus::Completed => log.record(&format!(
                "completed '{}' ({} freed)",
                op.id,
                format::format_size(outcome.bytes_freed)
            )),
            OpStatus::Skipped => {
                log.record(&format!("skipped '{}': {}", op.id, outcome.detail))
            }
            OpStatus::Aborted => {
                log.record(&format!("ERROR '{}': {}", op.id, outcome.detail))
            }
        }
        outcome
    }

    /// Operator interaction protocol for dangerous operations: consequence
    /// statement, exact keyword, one line of input, byte-for-byte compare.
    /// No retries within the same operation.
    fn collect_keyword(&self, op: &Operation, keyword: &str, prompter: &mut dyn Prompter) -> bool {
        println!();
        println!("  !! {}", op.description);
        println!("  This action is irreversible once it runs.");
        match prompter.read_line(&format!("  Type '{}' to proceed: ", keyword)) {
            Some(line) => line == keyword,
            None => false,
        }
    }

    fn execute_action(
        &self,
        op: &Operation,
        prompter: &mut dyn Prompter,
        log: &mut AuditLogger,
        backups: &mut Vec<BackupArtifact>,
    ) -> OpOutcome {
        match &op.action {
            OpAction::RemovePaths(paths) => {
                let mut freed = 0u64;
                let mut errors = Vec::new();

                for path in paths {
                    if !path.exists() {
                        continue;
                    }
                    let size = path_size(path);
                    let result = if path.is_dir() {
                        std::fs::remove_dir_all(path)
                    } else {
                        std::fs::remove_file(path)
                    };
                    match result {
                        Ok(()) => freed += size,
                        Err(e) => errors.push(format!("{}: {}", format::format_path(path), e)),
                    }
                }

                if errors.is_empty() {
                    OpOutcome {
                        id: op.id.clone(),
                        status: OpStatus::Completed,
                        detail: String::new(),
                        bytes_freed: freed,
                    }
                } else {
                    OpOutcome {
                        id: op.id.clone(),
                        status: OpStatus::Aborted,
                        detail: errors.join("; "),
                        bytes_freed: freed,
                    }
                }
            }

            OpAction::Command { program, args } => {
                match std::process::Command::new(program).args(args).output() {
                    Ok(output) => {
                        for line in String::from_utf8_lossy(&output.stdout).lines() {
                            log.record(&format!("'{}' stdout: {}", op.id, line));
                        }
                        for line in String::from_utf8_lossy(&output.stderr).lines() {
                            log.record(&format!("'{}' stderr: {}", op.id, line));
                        }
                        if output.status.success() {
                            OpOutcome {
                                id: op.id.clone(),
                                status: OpStatus::Completed,
                                detail: String::new(),
                                bytes_freed: 0,
                            }
                        } else {
                            OpOutcome {
                                id: op.id.clone(),
                                status: OpStatus::Aborted,
                                detail: format!("`{}` exited with {}", program, output.status),
                                bytes_freed: 0,
                            }
                        }
                    }
                    Err(e) => OpOutcome {
                        id: op.id.clone(),
                        status: OpStatus::Aborted,
                        detail: format!("failed to run `{}`: {}", program, e),
                        bytes_freed: 0,
                    },
                }
            }

            OpAction::ArchiveBackups => {
                let show_progress = !self.gate.mode().quiet;
                match self.backups.archive_and_encrypt(&self.archive_label, show_progress) {
                    Ok(artifact) => {
                        log.record(&format!(
                            "encrypted bundle written: {}",
                            format::format_path(
                                artifact.storage.as_deref().unwrap_or(Path::new("?"))
                            )
                        ));
                        if self.gate.confirm_extra(
                            "Delete the unencrypted backup copies, keeping only the encrypted bundle?",
                            prompter,
                            log,
                        ) {
                            match self.backups.remove_unencrypted_intermediates() {
                                Ok(n) => log.record(&format!(
                                    "removed {}",
                                    format::format_count(n as usize, "unencrypted intermediate")
                                )),
                                Err(e) => log.record(&format!(
                                    "could not remove intermediates: {}",
                                    e
                                )),
                            }
                        }
                        backups.push(artifact);
                        OpOutcome {
                            id: op.id.clone(),
                            status: OpStatus::Completed,
                            detail: String::new(),
                            bytes_freed: 0,
                        }
                    }
                    // A run that produced no backups has nothing to
                    // encrypt; that is not a failure.
                    Err(BackupError::NothingToArchive) => skipped(op, "nothing to archive"),
                    Err(e) => OpOutcome {
                        id: op.id.clone(),
                        status: OpStatus::Aborted,
                        detail: e.to_string(),
                        bytes_freed: 0,
                    },
                }
            }
        }
    }
}

fn skipped(op: &Operation, reason: &str) -> OpOutcome {
    OpOutcome {
        id: op.id.clone(),
        status: OpStatus::Skipped,
        detail: reason.to_string(),
        bytes_freed: 0,
    }
}

/// Total size of a file or directory tree, best effort.
fn path_size(path: &Path) -> u64 {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::read_dir(path)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| path_size(&e.path()))
                    .sum()
            })
            .unwrap_or(0),
        Ok(meta) => meta.len(),
        Err(_) => 0,
    }
}
