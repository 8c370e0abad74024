//! Wallet provider layer.
//!
//! A wallet supplies the connected account and signs/submits entry function
//! transactions. Two backends are available and selected in settings:
//! the `aptos` CLI (keys live in the CLI profile) and a local Ed25519 key
//! read from the environment.

pub mod aptos_cli;
pub mod local_key;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::error::WalletError;
use crate::types::{EntryFunctionPayload, SubmittedTransaction};
use crate::units::truncate_address;

pub use aptos_cli::AptosCliWallet;
pub use local_key::LocalKeyWallet;

/// Connection state of the configured wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletStatus {
    Connected { address: String },
    Disconnected,
    Checking,
    Unknown(String),
}

impl WalletStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, WalletStatus::Connected { .. })
    }

    /// The connected account, if any
    pub fn address(&self) -> Option<&str> {
        match self {
            WalletStatus::Connected { address } => Some(address.as_str()),
            _ => None,
        }
    }

    /// Returns true if there's a known connection problem (not checking, not connected)
    pub fn has_problem(&self) -> bool {
        matches!(self, WalletStatus::Disconnected | WalletStatus::Unknown(_))
    }

    pub fn display_text(&self) -> String {
        match self {
            WalletStatus::Connected { address } => {
                format!("🟢 Connected: {}", truncate_address(address))
            }
            WalletStatus::Disconnected => "🔴 Not Connected".to_string(),
            WalletStatus::Checking => "⏳ Checking...".to_string(),
            WalletStatus::Unknown(msg) => format!("⚪ {}", msg),
        }
    }

    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            WalletStatus::Connected { .. } => (50, 205, 50),
            WalletStatus::Disconnected => (220, 53, 69),
            WalletStatus::Checking => (100, 149, 237),
            WalletStatus::Unknown(_) => (150, 150, 150),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WalletBackend {
    /// Sign through the `aptos` CLI profile
    #[default]
    AptosCli,
    /// Sign with a key from `APTOS_PRIVATE_KEY`
    LocalKey,
}

impl WalletBackend {
    pub const ALL: [WalletBackend; 2] = [WalletBackend::AptosCli, WalletBackend::LocalKey];

    pub fn display_name(&self) -> &'static str {
        match self {
            WalletBackend::AptosCli => "Aptos CLI profile",
            WalletBackend::LocalKey => "Local key (env)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WalletBackend::AptosCli => {
                "Uses the aptos CLI and the keys of the selected profile. The CLI waits for each transaction to commit."
            }
            WalletBackend::LocalKey => {
                "Signs with the Ed25519 key in APTOS_PRIVATE_KEY and submits through the fullnode REST API."
            }
        }
    }
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Current account and connection state
    async fn status(&self) -> WalletStatus;

    /// Sign and submit an entry function transaction. Returns once the
    /// transaction is accepted, which is not necessarily once it is final.
    async fn sign_and_submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<SubmittedTransaction, WalletError>;
}

/// Build the wallet selected in the config.
pub fn build_wallet(config: &Config) -> Result<Arc<dyn WalletProvider>> {
    match config.wallet_backend {
        WalletBackend::AptosCli => Ok(Arc::new(AptosCliWallet::new(
            config.cli_profile.clone(),
            config.node_url.clone(),
        ))),
        WalletBackend::LocalKey => {
            let client = config.rest_client()?;
            let wallet = LocalKeyWallet::from_env(client).map_err(|e| anyhow!(e))?;
            Ok(Arc::new(wallet))
        }
    }
}

/// Check wallet status using the configured backend
pub async fn check_wallet_status(config: &Config) -> WalletStatus {
    info!("Checking wallet status via {}", config.wallet_backend.display_name());
    match build_wallet(config) {
        Ok(wallet) => wallet.status().await,
        Err(e) => {
            let msg = e.to_string();
            if msg.contains(&WalletError::NotConnected.to_string()) {
                WalletStatus::Disconnected
            } else {
                WalletStatus::Unknown(msg.chars().take(40).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_address_only_when_connected() {
        let connected = WalletStatus::Connected {
            address: "0x1234567890abcdef".to_string(),
        };
        assert_eq!(connected.address(), Some("0x1234567890abcdef"));
        assert!(connected.is_connected());
        assert!(WalletStatus::Disconnected.address().is_none());
        assert!(WalletStatus::Checking.address().is_none());
    }

    #[test]
    fn test_status_display_truncates() {
        let connected = WalletStatus::Connected {
            address: "0x1234567890abcdef".to_string(),
        };
        assert_eq!(connected.display_text(), "🟢 Connected: 0x123...cdef");
    }

    #[test]
    fn test_status_has_problem() {
        assert!(WalletStatus::Disconnected.has_problem());
        assert!(WalletStatus::Unknown("x".into()).has_problem());
        assert!(!WalletStatus::Checking.has_problem());
    }

    #[test]
    fn test_backend_default_is_cli() {
        assert_eq!(WalletBackend::default(), WalletBackend::AptosCli);
    }

    #[test]
    fn test_build_wallet_cli_needs_no_env() {
        let config = Config::new("https://fullnode.testnet.aptoslabs.com".to_string(), "testnet");
        assert!(build_wallet(&config).is_ok());
    }
}
