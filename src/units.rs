//! Amount, address and date formatting.

use chrono::{DateTime, Local, TimeZone};

/// Octas per APT (the coin has 8 decimals)
pub const OCTAS_PER_APT: u64 = 100_000_000;

/// Currency label shown after every amount
pub const APT_UNIT: &str = "APT";

/// Decimals shown inline in the gift table
pub const INLINE_PRECISION: usize = 2;

/// Decimals shown in hover/disclosure text
pub const DETAIL_PRECISION: usize = 8;

pub fn octas_to_apt(octas: u64) -> f64 {
    octas as f64 / OCTAS_PER_APT as f64
}

/// Format an amount with a fixed number of decimals followed by the unit label.
///
/// Every place that shows an amount goes through here so inline and detail
/// renderings only differ in `precision`.
pub fn format_amount(amount: f64, precision: usize, unit: &str) -> String {
    format!("{:.*} {}", precision, amount, unit)
}

pub fn format_apt(amount: f64, precision: usize) -> String {
    format_amount(amount, precision, APT_UNIT)
}

/// Shorten an address to its first 5 and last 4 characters.
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 9 {
        return address.to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Convert a release timestamp (seconds) to a local date-time.
pub fn release_time(timestamp_secs: u64) -> Option<DateTime<Local>> {
    let millis = i64::try_from(timestamp_secs).ok()?.checked_mul(1000)?;
    Local.timestamp_millis_opt(millis).single()
}

/// Local calendar date of a release timestamp, e.g. `11/14/2023`.
pub fn format_release_date(timestamp_secs: u64) -> String {
    release_time(timestamp_secs)
        .map(|t| t.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| "Invalid date".to_string())
}

/// Local date and time of a release timestamp, e.g. `11/14/2023, 10:13:20 PM`.
pub fn format_release_datetime(timestamp_secs: u64) -> String {
    release_time(timestamp_secs)
        .map(|t| t.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|| "Invalid date".to_string())
}

/// Normalize an account address to lowercase `0x`-prefixed hex.
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    format!("0x{}", body.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== octas_to_apt tests ====================

    #[test]
    fn test_octas_to_apt_fractional() {
        assert_eq!(octas_to_apt(250_000_000), 2.5);
    }

    #[test]
    fn test_octas_to_apt_zero() {
        assert_eq!(octas_to_apt(0), 0.0);
    }

    #[test]
    fn test_octas_to_apt_one_octa() {
        assert_eq!(octas_to_apt(1), 0.00000001);
    }

    // ==================== format_amount tests ====================

    #[test]
    fn test_format_apt_inline() {
        assert_eq!(format_apt(2.5, INLINE_PRECISION), "2.50 APT");
    }

    #[test]
    fn test_format_apt_detail() {
        assert_eq!(format_apt(2.5, DETAIL_PRECISION), "2.50000000 APT");
    }

    #[test]
    fn test_format_amount_rounds() {
        assert_eq!(format_amount(0.126, 2, "APT"), "0.13 APT");
        assert_eq!(format_amount(1.0, 0, "X"), "1 X");
    }

    // ==================== truncate_address tests ====================

    #[test]
    fn test_truncate_address() {
        assert_eq!(truncate_address("0x1234567890abcdef"), "0x123...cdef");
    }

    #[test]
    fn test_truncate_address_short_is_unchanged() {
        assert_eq!(truncate_address("0x1"), "0x1");
        assert_eq!(truncate_address("0x1234567"), "0x1234567");
    }

    #[test]
    fn test_truncate_address_ten_chars() {
        assert_eq!(truncate_address("0x12345678"), "0x123...5678");
    }

    // ==================== release date tests ====================

    #[test]
    fn test_format_release_date_matches_local_date() {
        let expected = Local
            .timestamp_millis_opt(1_700_000_000 * 1000)
            .unwrap()
            .format("%-m/%-d/%Y")
            .to_string();
        assert_eq!(format_release_date(1_700_000_000), expected);
    }

    #[test]
    fn test_format_release_datetime_contains_date() {
        let date = format_release_date(1_700_000_000);
        let datetime = format_release_datetime(1_700_000_000);
        assert!(datetime.starts_with(&date));
        assert!(datetime.ends_with("AM") || datetime.ends_with("PM"));
    }

    #[test]
    fn test_release_time_out_of_range() {
        assert!(release_time(u64::MAX).is_none());
        assert_eq!(format_release_date(u64::MAX), "Invalid date");
    }

    // ==================== normalize_address tests ====================

    #[test]
    fn test_normalize_address_adds_prefix() {
        assert_eq!(normalize_address("ABCdef"), "0xabcdef");
        assert_eq!(normalize_address(" 0XAB "), "0xab");
        assert_eq!(normalize_address("0x01"), "0x01");
    }
}
