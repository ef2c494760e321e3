use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn secsweep(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("secsweep").unwrap();
    cmd.env("HOME", home.path()).env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_shows_subcommands() {
    let home = TempDir::new().unwrap();
    secsweep(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("backup"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("--dangerous"));
}

#[test]
fn version_flag_works() {
    let home = TempDir::new().unwrap();
    secsweep(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("secsweep"));
}

#[test]
fn list_shows_catalog_with_risk_tiers() {
    let home = TempDir::new().unwrap();
    secsweep(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("apt-clean"))
        .stdout(predicate::str::contains("reset-msfdb"))
        .stdout(predicate::str::contains("purge-gvm"))
        .stdout(predicate::str::contains("dangerous"))
        .stdout(predicate::str::contains("RESET-MSFDB"));
}

#[test]
fn list_json_is_parseable() {
    let home = TempDir::new().unwrap();
    let output = secsweep(&home)
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let entries: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let entries = entries.as_array().unwrap();
    assert!(entries.iter().any(|e| e["id"] == "encrypt-backups"));
    assert!(entries
        .iter()
        .any(|e| e["keyword"] == "PURGE-GVM"));
}

#[test]
fn list_quiet_is_one_line_per_operation() {
    let home = TempDir::new().unwrap();
    let output = secsweep(&home)
        .args(["list", "--format", "quiet"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        assert!(fields.next().is_some(), "id field missing in {:?}", line);
        let tier = fields.next().unwrap();
        assert!(matches!(tier, "safe" | "confirm" | "dangerous"));
    }
}

// ── Clean ────────────────────────────────────────────────────────────────────

#[test]
fn dry_run_without_log_leaves_no_trace_in_home() {
    let home = TempDir::new().unwrap();
    secsweep(&home)
        .args(["clean", "--dry-run", "--no-log", "-q"])
        .assert()
        .success();

    assert!(
        !home.path().join(".secsweep").exists(),
        "a quiet no-log dry run must not write anything"
    );
}

#[test]
fn dry_run_writes_audit_log_of_intended_actions() {
    let home = TempDir::new().unwrap();
    secsweep(&home)
        .args(["clean", "--dry-run", "-q"])
        .assert()
        .success();

    let logs_dir = home.path().join(".secsweep").join("logs");
    let entries: Vec<_> = std::fs::read_dir(&logs_dir).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let log = std::fs::read_to_string(entries[0].as_ref().unwrap().path()).unwrap();
    assert!(log.contains("[dry-run]"));
    assert!(log.contains("apt-clean"));
}

#[test]
fn dry_run_reports_every_operation_as_skipped() {
    let home = TempDir::new().unwrap();
    let output = secsweep(&home)
        .args(["clean", "--dry-run", "--no-log", "-q", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    // Audit lines are echoed to the console before the report; the JSON
    // document starts at the first line that is exactly "{".
    let text = String::from_utf8(output).unwrap();
    let start = text.find("\n{").map(|i| i + 1).unwrap_or(0);
    let report: serde_json::Value = serde_json::from_str(&text[start..]).unwrap();
    let outcomes = report["outcomes"].as_array().unwrap();
    assert!(!outcomes.is_empty());
    for outcome in outcomes {
        assert_eq!(outcome["status"], "Skipped");
    }
    assert!(report["backups"].as_array().unwrap().is_empty());
}

#[test]
fn clean_refuses_to_start_without_escalation_helper() {
    let home = TempDir::new().unwrap();
    secsweep(&home)
        .args(["clean", "-q", "--no-log"])
        .env("PATH", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "privilege-escalation helper 'sudo' is not available",
        ))
        .stderr(predicate::str::contains("no operations were run"));

    assert!(!home.path().join(".secsweep").join("backups").exists());
}

// ── Backup ───────────────────────────────────────────────────────────────────

#[test]
fn backup_copies_file_into_private_backup_dir() {
    let home = TempDir::new().unwrap();
    let source = home.path().join("creds.txt");
    std::fs::write(&source, "api-key").unwrap();

    secsweep(&home)
        .args(["backup", "--no-log"])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("creds.txt"));

    let backup_dir = home.path().join(".secsweep").join("backups");
    let entries: Vec<_> = std::fs::read_dir(&backup_dir).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let copy = entries[0].as_ref().unwrap().path();
    let name = copy.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("creds.txt_"), "got {}", name);
    assert_eq!(std::fs::read_to_string(&copy).unwrap(), "api-key");
}

#[test]
fn backup_of_missing_path_succeeds_as_noop() {
    let home = TempDir::new().unwrap();
    secsweep(&home)
        .args(["backup", "--no-log"])
        .arg(home.path().join("never-existed"))
        .assert()
        .success()
        .stdout(predicate::str::contains("absent, nothing to protect"));
}

#[test]
fn backup_dry_run_copies_nothing() {
    let home = TempDir::new().unwrap();
    let source = home.path().join("creds.txt");
    std::fs::write(&source, "api-key").unwrap();

    secsweep(&home)
        .args(["backup", "--dry-run", "--no-log"])
        .arg(&source)
        .assert()
        .success();

    assert!(!home.path().join(".secsweep").join("backups").exists());
}

// ── Config ───────────────────────────────────────────────────────────────────

#[test]
fn config_show_prints_defaults_without_creating_files() {
    let home = TempDir::new().unwrap();
    secsweep(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("journal_vacuum_days = 7"))
        .stdout(predicate::str::contains("archive_label"));

    assert!(!home.path().join(".secsweep").join("config.toml").exists());
}

#[test]
fn config_set_round_trips_through_show() {
    let home = TempDir::new().unwrap();
    secsweep(&home)
        .args(["config", "set", "journal_vacuum_days", "14"])
        .assert()
        .success();

    secsweep(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("journal_vacuum_days = 14"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    secsweep(&home)
        .args(["config", "set", "no_such_key", "1"])
        .assert()
        .failure();
}

#[test]
#[cfg(unix)]
fn config_init_creates_private_tree() {
    use std::os::unix::fs::PermissionsExt;

    let home = TempDir::new().unwrap();
    secsweep(&home).args(["config", "init"]).assert().success();

    let data_dir = home.path().join(".secsweep");
    assert!(data_dir.join("config.toml").exists());
    for sub in ["backups", "logs"] {
        let mode = std::fs::metadata(data_dir.join(sub))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o077, 0, "{} must be owner-only", sub);
    }
}

// ── Completions ──────────────────────────────────────────────────────────────

#[test]
fn completions_generate_for_bash() {
    let home = TempDir::new().unwrap();
    secsweep(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("secsweep"));
}
