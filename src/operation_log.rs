//! Append-only text log of user-requested operations (gift cancellations),
//! kept next to the settings file.

use anyhow::Result;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::user_settings::app_dir;

const OPERATION_LOG_FILE: &str = "operation_log.txt";

fn log_path() -> PathBuf {
    app_dir().join(OPERATION_LOG_FILE)
}

/// Full path to the operation log, for display
pub fn log_file_path() -> String {
    log_path().display().to_string()
}

fn write_entry(
    out: &mut impl Write,
    timestamp: &str,
    operation: &str,
    network_key: &str,
    details: &str,
) -> std::io::Result<()> {
    writeln!(
        out,
        "[{}] network={} operation={}",
        timestamp, network_key, operation
    )?;

    if details.trim().is_empty() {
        writeln!(out, "  (no additional details)")?;
    } else {
        for line in details.lines() {
            if line.trim().is_empty() {
                writeln!(out)?;
            } else {
                writeln!(out, "  {}", line)?;
            }
        }
    }
    writeln!(out)
}

/// Append a structured log entry describing a user-requested operation.
pub fn append_log(operation: &str, network_key: &str, details: impl AsRef<str>) -> Result<()> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    write_entry(
        &mut file,
        &Utc::now().to_rfc3339(),
        operation,
        network_key,
        details.as_ref(),
    )?;
    Ok(())
}

/// Read the entire log file content
pub fn read_log() -> Result<String> {
    let path = log_path();
    if path.exists() {
        Ok(fs::read_to_string(&path)?)
    } else {
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(details: &str) -> String {
        let mut buf = Vec::new();
        write_entry(&mut buf, "2024-01-01T00:00:00+00:00", "cancel_gift", "testnet", details).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_entry_header() {
        let text = entry("recipient=0xbeef");
        assert!(text.starts_with("[2024-01-01T00:00:00+00:00] network=testnet operation=cancel_gift\n"));
    }

    #[test]
    fn test_entry_indents_details_and_ends_blank() {
        let text = entry("recipient=0xbeef\n\nhash=0xfeed");
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "[2024-01-01T00:00:00+00:00] network=testnet operation=cancel_gift",
                "  recipient=0xbeef",
                "",
                "  hash=0xfeed",
                "",
            ]
        );
    }

    #[test]
    fn test_entry_without_details() {
        assert!(entry("  ").contains("  (no additional details)\n"));
    }

    #[test]
    fn test_log_path_name() {
        assert!(log_file_path().ends_with(OPERATION_LOG_FILE));
    }
}
