use colored::*;

use crate::backup::BackupArtifact;
use crate::common::format::{format_count, format_path, format_size};
use crate::guard::{OpStatus, OperationRegistry, RiskTier, RunReport};
use crate::report::DiskSummary;

/// Print the end-of-run report in human-readable format
pub fn print_run_report(report: &RunReport) {
    println!();
    println!("  secsweep run summary");
    println!("{}", "─".repeat(60).dimmed());

    for outcome in &report.outcomes {
        let (marker, status) = match outcome.status {
            OpStatus::Completed => ("✓".green(), "completed".green()),
            OpStatus::Skipped => ("•".dimmed(), "skipped".dimmed()),
            OpStatus::Aborted => ("✗".red(), "aborted".red()),
        };
        let mut line = format!("  {} {:<18} {}", marker, outcome.id, status);
        if outcome.bytes_freed > 0 {
            line.push_str(&format!("  ({})", format_size(outcome.bytes_freed)));
        }
        if !outcome.detail.is_empty() && outcome.status == OpStatus::Aborted {
            line.push_str(&format!("  — {}", outcome.detail.dimmed()));
        }
        println!("{}", line);
    }

    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {} completed, {} skipped, {} aborted  •  {} freed  •  {}",
        report.count(OpStatus::Completed),
        report.count(OpStatus::Skipped),
        report.count(OpStatus::Aborted),
        format_size(report.bytes_freed()),
        format_count(report.backups.len(), "backup"),
    );
}

/// Print the run report as JSON
pub fn print_run_json(report: &RunReport) {
    match serde_json::to_string_pretty(report) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: {}", e),
    }
}

/// Print the run report as pipe-friendly one-liners
pub fn print_run_quiet(report: &RunReport) {
    for outcome in &report.outcomes {
        println!("{}  {}  {}", outcome.id, outcome.status, outcome.bytes_freed);
    }
}

/// Print the disk usage summary that ends every run, with the change
/// since the run started when a before snapshot is available.
pub fn print_disk_summary(before: Option<&DiskSummary>, after: Option<&DiskSummary>) {
    match after {
        Some(s) => {
            println!(
                "  Disk {}: {} used of {}, {} available",
                s.mount,
                format_size(s.used),
                format_size(s.total),
                format_size(s.available),
            );
            if let Some(b) = before {
                if b.used > s.used {
                    println!("  Reclaimed {} during this run", format_size(b.used - s.used));
                }
            }
        }
        None => println!("  Disk usage unavailable"),
    }
    println!();
}

/// Print the operation catalog
pub fn print_catalog(registry: &OperationRegistry) {
    println!();
    println!("  Registered operations (run in this order)");
    println!("{}", "─".repeat(60).dimmed());

    for op in registry.all() {
        let tier = match op.risk {
            RiskTier::Safe => "safe".green(),
            RiskTier::Confirm => "confirm".yellow(),
            RiskTier::Dangerous => "dangerous".red().bold(),
        };
        println!("  {:<18} {:<12} {}", op.id, tier, op.description);
        if let Some(keyword) = &op.keyword {
            println!("  {:<18} {:<12} keyword: {}", "", "", keyword.dimmed());
        }
    }
    println!();
}

/// Print the catalog as JSON
pub fn print_catalog_json(registry: &OperationRegistry) {
    let entries: Vec<_> = registry
        .all()
        .iter()
        .map(|op| {
            serde_json::json!({
                "id": op.id,
                "description": op.description,
                "risk": op.risk,
                "keyword": op.keyword,
                "requires_backup_of": op.requires_backup_of,
            })
        })
        .collect();
    match serde_json::to_string_pretty(&entries) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: {}", e),
    }
}

/// Print the catalog as pipe-friendly one-liners
pub fn print_catalog_quiet(registry: &OperationRegistry) {
    for op in registry.all() {
        println!("{}  {}", op.id, op.risk);
    }
}

/// Print one backup artifact result
pub fn print_artifact(artifact: &BackupArtifact) {
    match &artifact.storage {
        Some(storage) => {
            let label = if artifact.encrypted {
                "encrypted bundle".to_string()
            } else {
                "copy".to_string()
            };
            println!(
                "  {} {} -> {} ({})",
                "✓".green(),
                format_path(&artifact.source),
                format_path(storage),
                label
            );
        }
        None => println!(
            "  {} {} absent, nothing to protect",
            "•".dimmed(),
            format_path(&artifact.source)
        ),
    }
}
