use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::common::permissions;

/// Append-only audit log for gate decisions and operation outcomes.
///
/// One line per entry, `<local-date> <local-time> - <message>`, appended to
/// a per-run file under the logs directory and mirrored to the console.
/// With `no_log` the file is never created and entries only reach the
/// console. A failing sink degrades to console-only output; logging never
/// fails the run.
pub struct AuditLogger {
    sink: Option<File>,
    path: Option<PathBuf>,
    warned: bool,
}

impl AuditLogger {
    /// Open a per-run log file under `logs_dir`, or fall back to
    /// console-only if the directory or file cannot be prepared.
    pub fn new(logs_dir: &Path, no_log: bool) -> Self {
        if no_log {
            return Self::console_only();
        }

        match Self::open_run_log(logs_dir) {
            Ok((file, path)) => Self {
                sink: Some(file),
                path: Some(path),
                warned: false,
            },
            Err(e) => {
                eprintln!(
                    "warning: audit log unavailable ({}); continuing with console output only",
                    e
                );
                Self::console_only()
            }
        }
    }

    /// Logger that only echoes to the console.
    pub fn console_only() -> Self {
        Self {
            sink: None,
            path: None,
            warned: false,
        }
    }

    fn open_run_log(logs_dir: &Path) -> std::io::Result<(File, PathBuf)> {
        permissions::ensure_private_dir(logs_dir)?;

        let name = format!("sweep-{}.log", Local::now().format("%Y-%m-%dT%H-%M-%S"));
        let path = logs_dir.join(name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        permissions::restrict_file(&path)?;
        Ok((file, path))
    }

    /// Path of the persistent log file, if one is open.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record one entry. Mirrors to the console; appends to the log file
    /// when persistence is enabled and the sink is still writable.
    pub fn record(&mut self, message: &str) {
        let line = format!("{} - {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message);
        println!("{}", line);

        if let Some(file) = self.sink.as_mut() {
            if let Err(e) = writeln!(file, "{}", line) {
                if !self.warned {
                    eprintln!(
                        "warning: audit log write failed ({}); continuing with console output only",
                        e
                    );
                    self.warned = true;
                }
                self.sink = None;
            }
        }
    }
}
