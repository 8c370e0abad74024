//! Notification entries and the user-facing text for job results.

use crate::gift_list::CancelOutcome;
use crate::wallet::WalletStatus;

/// A notification entry with message and timestamp
#[derive(Clone)]
pub struct NotificationEntry {
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl NotificationEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: chrono::Local::now(),
        }
    }

    pub fn time_ago(&self) -> String {
        let now = chrono::Local::now();
        let duration = now.signed_duration_since(self.timestamp);
        if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            format!("{}m ago", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h ago", duration.num_hours())
        } else {
            self.timestamp.format("%m/%d %H:%M").to_string()
        }
    }
}

/// Extra guidance for well-known Aptos and wallet failures.
pub fn failure_hint(error_msg: &str) -> Option<&'static str> {
    if error_msg.contains("INSUFFICIENT_BALANCE") {
        Some("The account cannot pay for gas. Fund it and try again.")
    } else if error_msg.contains("SEQUENCE_NUMBER") {
        Some("Another transaction from this account was in flight. Wait a moment and try again.")
    } else if error_msg.contains("Move abort") || error_msg.contains("ABORTED") {
        Some("The gift contract rejected the call. The gift may already be claimed or cancelled.")
    } else if error_msg.contains("aptos CLI not found") {
        Some("Install the aptos CLI or switch the wallet backend in Settings.")
    } else if error_msg.contains("not connected") {
        Some("Connect a wallet first: run `aptos init` for the CLI profile or set APTOS_PRIVATE_KEY.")
    } else if error_msg.contains("module address is not configured") {
        Some("Set MODULE_ADDRESS in your environment or .env file.")
    } else {
        None
    }
}

/// Status line shown under the gift table after a cancel finishes.
pub fn cancel_status_message(outcome: &CancelOutcome) -> String {
    match outcome {
        CancelOutcome::Confirmed { .. } | CancelOutcome::Settled { .. } => {
            format!("[OK] {}", outcome.summary())
        }
        CancelOutcome::Unconfirmed { .. } => format!("[!!] {}", outcome.summary()),
        CancelOutcome::Failed(e) => {
            let msg = e.to_string();
            match failure_hint(&msg) {
                Some(hint) => format!("[XX] Cancel failed: {}\n\n{}", msg, hint),
                None => format!("[XX] Cancel failed: {}", msg),
            }
        }
    }
}

/// Notification text when the wallet status meaningfully changed, None otherwise.
///
/// `previous` is the last stable status (never `Checking`).
pub fn wallet_status_change_notification(
    previous: &WalletStatus,
    new_status: &WalletStatus,
) -> Option<String> {
    if matches!(new_status, WalletStatus::Checking) {
        return None;
    }

    let changed = match (previous, new_status) {
        (WalletStatus::Connected { address: a }, WalletStatus::Connected { address: b }) => a != b,
        (WalletStatus::Disconnected, WalletStatus::Disconnected) => false,
        (WalletStatus::Unknown(old_msg), WalletStatus::Unknown(new_msg)) => old_msg != new_msg,
        _ => true,
    };
    if !changed {
        return None;
    }

    match new_status {
        WalletStatus::Connected { address } => Some(format!(
            "Wallet connected: {}",
            crate::units::truncate_address(address)
        )),
        WalletStatus::Disconnected => Some("Wallet disconnected".to_string()),
        WalletStatus::Unknown(msg) => Some(format!("Wallet status: {}", msg)),
        WalletStatus::Checking => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalletError;

    fn connected(address: &str) -> WalletStatus {
        WalletStatus::Connected {
            address: address.to_string(),
        }
    }

    // ==================== failure_hint tests ====================

    #[test]
    fn test_failure_hint_known_errors() {
        assert!(failure_hint("transaction rejected: INSUFFICIENT_BALANCE_FOR_TRANSACTION_FEE")
            .unwrap()
            .contains("gas"));
        assert!(failure_hint("SEQUENCE_NUMBER_TOO_OLD").is_some());
        assert!(failure_hint("Move abort in 0xcafe::birthday_bot: 0x1").is_some());
        assert!(failure_hint("wallet is not connected").is_some());
    }

    #[test]
    fn test_failure_hint_unknown_error() {
        assert!(failure_hint("connection reset by peer").is_none());
    }

    // ==================== cancel_status_message tests ====================

    #[test]
    fn test_cancel_status_success() {
        let msg = cancel_status_message(&CancelOutcome::Confirmed {
            hash: "0xfeed".to_string(),
        });
        assert!(msg.starts_with("[OK]"));
        assert!(msg.contains("0xfeed"));
    }

    #[test]
    fn test_cancel_status_failure_with_hint() {
        let msg = cancel_status_message(&CancelOutcome::Failed(WalletError::CliNotFound));
        assert!(msg.starts_with("[XX] Cancel failed"));
        assert!(msg.contains("switch the wallet backend"));
    }

    #[test]
    fn test_cancel_status_unconfirmed() {
        let msg = cancel_status_message(&CancelOutcome::Unconfirmed {
            hash: "0xfeed".to_string(),
            reason: "timed out".to_string(),
        });
        assert!(msg.starts_with("[!!]"));
        assert!(msg.contains("timed out"));
    }

    // ==================== wallet_status_change_notification tests ====================

    #[test]
    fn test_status_change_connect() {
        let msg = wallet_status_change_notification(
            &WalletStatus::Disconnected,
            &connected("0x1234567890abcdef"),
        );
        assert_eq!(msg.as_deref(), Some("Wallet connected: 0x123...cdef"));
    }

    #[test]
    fn test_status_change_same_account_is_silent() {
        assert!(wallet_status_change_notification(&connected("0xa"), &connected("0xa")).is_none());
        assert!(wallet_status_change_notification(
            &WalletStatus::Disconnected,
            &WalletStatus::Disconnected
        )
        .is_none());
    }

    #[test]
    fn test_status_change_account_switch() {
        assert!(wallet_status_change_notification(&connected("0xa"), &connected("0xb")).is_some());
    }

    #[test]
    fn test_status_change_checking_is_silent() {
        assert!(wallet_status_change_notification(&connected("0xa"), &WalletStatus::Checking).is_none());
    }

    #[test]
    fn test_notification_time_ago_fresh() {
        assert_eq!(NotificationEntry::new("hi").time_ago(), "just now");
    }
}
