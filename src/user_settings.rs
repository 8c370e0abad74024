use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::config::{self, Config, DEFAULT_NETWORK_KEY};
use crate::confirmation::ConfirmationPolicy;
use crate::wallet::WalletBackend;

const SETTINGS_FILE: &str = "gifter_settings.json";

/// Directory under the platform config dir that holds settings and the operation log
pub const APP_DIR: &str = "gifter";

fn default_network_key() -> String {
    DEFAULT_NETWORK_KEY.to_string()
}

fn default_cli_profile() -> String {
    "default".to_string()
}

fn default_wallet_refresh_interval() -> u64 {
    10
}

/// User settings that persist between sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSettings {
    /// Key of the selected network (see `config::NETWORKS`)
    #[serde(default = "default_network_key")]
    pub selected_network_key: String,
    /// Custom fullnode URL overrides per network key
    #[serde(default)]
    pub custom_node_urls: HashMap<String, String>,
    #[serde(default)]
    pub wallet_backend: WalletBackend,
    /// None keeps the settle delay from TRANSACTION_DELAY_MILLISECONDS
    #[serde(default)]
    pub confirmation_policy: Option<ConfirmationPolicy>,
    #[serde(default = "default_cli_profile")]
    pub cli_profile: String,
    /// Auto-refresh interval for wallet status (seconds)
    #[serde(default = "default_wallet_refresh_interval")]
    pub wallet_refresh_interval_secs: u64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            selected_network_key: default_network_key(),
            custom_node_urls: HashMap::new(),
            wallet_backend: WalletBackend::default(),
            confirmation_policy: None,
            cli_profile: default_cli_profile(),
            wallet_refresh_interval_secs: default_wallet_refresh_interval(),
        }
    }
}

/// `<config_dir>/gifter`, created on first use. Falls back to the current directory.
pub fn app_dir() -> PathBuf {
    match dirs::config_dir() {
        Some(config_dir) => {
            let app_dir = config_dir.join(APP_DIR);
            if !app_dir.exists() {
                let _ = fs::create_dir_all(&app_dir);
            }
            app_dir
        }
        None => PathBuf::from("."),
    }
}

impl UserSettings {
    fn settings_path() -> PathBuf {
        app_dir().join(SETTINGS_FILE)
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::settings_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match Self::from_json(&content) {
                    Ok(settings) => {
                        tracing::info!("Loaded settings from {:?}", path);
                        return settings;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse settings file: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read settings file: {}", e);
                }
            }
        }
        tracing::info!("Using default settings");
        Self::default()
    }

    fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Get the settings file path for display
    pub fn settings_path_display() -> String {
        Self::settings_path().display().to_string()
    }

    /// Custom node URL for a network, or None if using the default
    pub fn get_custom_node_url(&self, network_key: &str) -> Option<&String> {
        self.custom_node_urls.get(network_key).filter(|s| !s.is_empty())
    }

    /// Set the node URL override for a network (empty string removes it)
    pub fn set_custom_node_url(&mut self, network_key: &str, url: String) {
        if url.trim().is_empty() {
            self.custom_node_urls.remove(network_key);
        } else {
            self.custom_node_urls
                .insert(network_key.to_string(), url.trim().to_string());
        }
    }

    /// Build the runtime config for the selected network.
    ///
    /// Precedence for the node URL: saved override, then `APTOS_NODE_URL`,
    /// then the network default. An unknown key falls back to testnet.
    pub fn to_config(&self) -> Config {
        let network = config::find_network(&self.selected_network_key)
            .or_else(|| config::find_network(DEFAULT_NETWORK_KEY));
        let mut cfg = match network {
            Some(network) => Config::from_network(network),
            None => Config::default(),
        };
        if let Some(url) = self.get_custom_node_url(&cfg.network_key) {
            cfg.node_url = url.clone();
        }
        cfg.wallet_backend = self.wallet_backend;
        if let Some(policy) = self.confirmation_policy {
            cfg.confirmation_policy = policy;
        }
        if !self.cli_profile.trim().is_empty() {
            cfg.cli_profile = self.cli_profile.trim().to_string();
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== UserSettings::default tests ====================

    #[test]
    fn test_user_settings_default_network() {
        let settings = UserSettings::default();
        assert_eq!(settings.selected_network_key, "testnet");
    }

    #[test]
    fn test_user_settings_default_values() {
        let settings = UserSettings::default();
        assert!(settings.custom_node_urls.is_empty());
        assert_eq!(settings.wallet_backend, WalletBackend::AptosCli);
        assert!(settings.confirmation_policy.is_none());
        assert_eq!(settings.cli_profile, "default");
        assert_eq!(settings.wallet_refresh_interval_secs, 10);
    }

    // ==================== get_custom_node_url / set_custom_node_url tests ====================

    #[test]
    fn test_set_and_get_custom_node_url() {
        let mut settings = UserSettings::default();
        settings.set_custom_node_url("devnet", "  https://my.node/v1  ".to_string());
        assert_eq!(
            settings.get_custom_node_url("devnet"),
            Some(&"https://my.node/v1".to_string())
        );
        assert!(settings.get_custom_node_url("mainnet").is_none());
    }

    #[test]
    fn test_set_empty_custom_node_url_removes() {
        let mut settings = UserSettings::default();
        settings.set_custom_node_url("devnet", "https://my.node".to_string());
        settings.set_custom_node_url("devnet", "   ".to_string());
        assert!(settings.get_custom_node_url("devnet").is_none());
        assert!(settings.custom_node_urls.is_empty());
    }

    // ==================== serialization tests ====================

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings = UserSettings::from_json(r#"{"selected_network_key": "mainnet"}"#).unwrap();
        assert_eq!(settings.selected_network_key, "mainnet");
        assert_eq!(settings.wallet_refresh_interval_secs, 10);
        assert_eq!(settings.cli_profile, "default");
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(UserSettings::from_json("{}").unwrap(), UserSettings::default());
    }

    #[test]
    fn test_roundtrip_with_policy() {
        let mut settings = UserSettings::default();
        settings.wallet_backend = WalletBackend::LocalKey;
        settings.confirmation_policy = Some(ConfirmationPolicy::poll_default());
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(UserSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_garbage_is_error() {
        assert!(UserSettings::from_json("not json").is_err());
    }

    // ==================== to_config tests ====================

    #[test]
    fn test_to_config_applies_overrides() {
        let mut settings = UserSettings::default();
        settings.selected_network_key = "devnet".to_string();
        settings.set_custom_node_url("devnet", "http://10.0.0.2:8080".to_string());
        settings.wallet_backend = WalletBackend::LocalKey;
        settings.cli_profile = "gifter".to_string();
        settings.confirmation_policy = Some(ConfirmationPolicy::poll_default());

        let cfg = settings.to_config();
        assert_eq!(cfg.network_key, "devnet");
        assert_eq!(cfg.node_url, "http://10.0.0.2:8080");
        assert_eq!(cfg.wallet_backend, WalletBackend::LocalKey);
        assert_eq!(cfg.cli_profile, "gifter");
        assert_eq!(cfg.confirmation_policy, ConfirmationPolicy::poll_default());
    }

    #[test]
    fn test_to_config_unknown_network_falls_back() {
        let mut settings = UserSettings::default();
        settings.selected_network_key = "nowhere".to_string();
        assert_eq!(settings.to_config().network_key, "testnet");
    }

    #[test]
    fn test_settings_path_in_app_dir() {
        assert!(UserSettings::settings_path_display().ends_with(SETTINGS_FILE));
    }
}
