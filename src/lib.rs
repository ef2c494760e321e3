//! # secsweep
//!
//! A guarded cleanup utility for security workstations.
//!
//! secsweep removes caches and logs and can optionally reset
//! security-tool databases (Metasploit, GVM). The interesting part is the
//! guarded execution workflow:
//!
//! - **Risk tiers**: every operation is Safe, Confirm, or Dangerous
//! - **Staged confirmation**: dangerous steps need `--dangerous` plus an
//!   exact typed keyword; `--yes` never bypasses them
//! - **Backup-then-destroy**: a dangerous step only runs after its
//!   sensitive paths were copied into an owner-only backup directory,
//!   with an encrypted bundle produced at the end of the run
//! - **Dry-run purity**: `--dry-run` forces every gate decision to Deny
//!   after logging the intent, so nothing outside the log is touched
//! - **Audit trail**: every decision and outcome is appended to a
//!   permission-restricted per-run log

pub mod audit;
pub mod backup;
pub mod cli;
pub mod common;
pub mod guard;
pub mod ops;
pub mod report;
