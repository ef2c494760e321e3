use serde::Serialize;

/// Disk usage snapshot for the end-of-run summary. Parsed from `df -k`,
/// which is also where the numbers in the operator's other tooling come
/// from.
#[derive(Debug, Clone, Serialize)]
pub struct DiskSummary {
    pub mount: String,
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

/// Query disk usage for a mount point. `None` when `df` is unavailable or
/// its output is unparseable; the summary then just omits the numbers.
pub fn disk_summary(mount: &str) -> Option<DiskSummary> {
    let output = std::process::Command::new("df")
        .args(["-k", mount])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_df_output(&String::from_utf8_lossy(&output.stdout), mount)
}

fn parse_df_output(output: &str, mount: &str) -> Option<DiskSummary> {
    // Header line, then one data line per filesystem; sizes in 1K blocks.
    let line = output.lines().nth(1)?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return None;
    }

    let kb = |s: &str| s.parse::<u64>().ok().map(|v| v * 1024);
    Some(DiskSummary {
        mount: mount.to_string(),
        total: kb(fields[1])?,
        used: kb(fields[2])?,
        available: kb(fields[3])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_df_output() {
        let output = "Filesystem     1K-blocks     Used Available Use% Mounted on\n\
                      /dev/sda2      102687672 55163344  42267300  57% /\n";
        let summary = parse_df_output(output, "/").unwrap();
        assert_eq!(summary.total, 102687672 * 1024);
        assert_eq!(summary.used, 55163344 * 1024);
        assert_eq!(summary.available, 42267300 * 1024);
        assert_eq!(summary.mount, "/");
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_df_output("", "/").is_none());
        assert!(parse_df_output("just one line", "/").is_none());
        assert!(parse_df_output("header\nshort line\n", "/").is_none());
    }
}
