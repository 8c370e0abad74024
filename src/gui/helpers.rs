//! Helper functions for the GUI
//!
//! Display helpers and the CSV export of the gift list.

use anyhow::Result;
use std::io::Write;

use crate::types::Gift;
use crate::units::format_release_date;

/// Header row of the exported gift list
pub const CSV_HEADER: [&str; 5] = [
    "address",
    "amount_apt",
    "amount_octas",
    "release_timestamp",
    "release_date",
];

/// Health of the node based on round-trip latency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyLevel {
    Good,
    Slow,
    Bad,
}

pub fn latency_level(latency_ms: u64) -> LatencyLevel {
    if latency_ms < 200 {
        LatencyLevel::Good
    } else if latency_ms < 1000 {
        LatencyLevel::Slow
    } else {
        LatencyLevel::Bad
    }
}

/// Shorten a message for the toast, on a char boundary.
pub fn truncate_message(msg: &str, max_chars: usize) -> String {
    if msg.chars().count() > max_chars {
        let head: String = msg.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        msg.to_string()
    }
}

/// Write the gift list as CSV.
pub fn write_gifts_csv<W: Write>(out: W, gifts: &[Gift]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for gift in gifts {
        writer.write_record([
            gift.address.clone(),
            format!("{:.8}", gift.amount),
            gift.amount_octas.to_string(),
            gift.timestamp.to_string(),
            format_release_date(gift.timestamp),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Default file name offered by the save dialog
pub fn default_export_file_name() -> String {
    format!("sent_gifts_{}.csv", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawGift;

    // ==================== latency_level tests ====================

    #[test]
    fn test_latency_level_bounds() {
        assert_eq!(latency_level(0), LatencyLevel::Good);
        assert_eq!(latency_level(199), LatencyLevel::Good);
        assert_eq!(latency_level(200), LatencyLevel::Slow);
        assert_eq!(latency_level(999), LatencyLevel::Slow);
        assert_eq!(latency_level(1000), LatencyLevel::Bad);
    }

    // ==================== truncate_message tests ====================

    #[test]
    fn test_truncate_message_short_untouched() {
        assert_eq!(truncate_message("Gift cancelled", 40), "Gift cancelled");
    }

    #[test]
    fn test_truncate_message_multibyte() {
        assert_eq!(truncate_message("🟢🟢🟢🟢", 2), "🟢🟢...");
    }

    // ==================== write_gifts_csv tests ====================

    #[test]
    fn test_write_gifts_csv() {
        let gifts = vec![Gift::from(RawGift {
            address: "0xbeef".to_string(),
            amount: 250_000_000,
            timestamp: 1_700_000_000,
        })];
        let mut buf = Vec::new();
        write_gifts_csv(&mut buf, &gifts).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "address,amount_apt,amount_octas,release_timestamp,release_date");
        assert!(lines[1].starts_with("0xbeef,2.50000000,250000000,1700000000,"));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_write_gifts_csv_empty_has_header() {
        let mut buf = Vec::new();
        write_gifts_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_default_export_file_name() {
        let name = default_export_file_name();
        assert!(name.starts_with("sent_gifts_"));
        assert!(name.ends_with(".csv"));
    }
}
