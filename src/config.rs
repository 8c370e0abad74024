use anyhow::{anyhow, Result};
use std::env;
use url::Url;

use crate::confirmation::ConfirmationPolicy;
use crate::rpc::RestClient;
use crate::wallet::WalletBackend;

/// Module name used when `MODULE_NAME` is not set.
pub const DEFAULT_MODULE_NAME: &str = "birthday_bot";

/// Timeout applied to every REST call against the fullnode.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// A predefined Aptos network with label, key and default fullnode.
#[derive(Clone, Debug)]
pub struct AptosNetwork {
    /// Display name
    pub label: &'static str,
    /// Key used by the explorer `?network=` query and stored in settings
    pub key: &'static str,
    pub default_node: &'static str,
    pub is_testnet: bool,
}

impl AptosNetwork {
    pub const fn new(
        label: &'static str,
        key: &'static str,
        default_node: &'static str,
        is_testnet: bool,
    ) -> Self {
        Self {
            label,
            key,
            default_node,
            is_testnet,
        }
    }
}

pub const NETWORKS: &[AptosNetwork] = &[
    AptosNetwork::new("Mainnet", "mainnet", "https://fullnode.mainnet.aptoslabs.com", false),
    AptosNetwork::new("Testnet", "testnet", "https://fullnode.testnet.aptoslabs.com", true),
    AptosNetwork::new("Devnet", "devnet", "https://fullnode.devnet.aptoslabs.com", true),
    AptosNetwork::new("Local", "local", "http://127.0.0.1:8080", true),
];

pub const DEFAULT_NETWORK_KEY: &str = "testnet";

pub fn find_network(key: &str) -> Option<&'static AptosNetwork> {
    NETWORKS.iter().find(|n| n.key.eq_ignore_ascii_case(key))
}

const EXPLORER_BASE: &str = "https://explorer.aptoslabs.com";

/// Explorer link for a transaction. Local networks have no public explorer.
pub fn get_tx_explorer_url(network_key: &str, tx_hash: &str) -> Option<String> {
    explorer_network(network_key).map(|n| format!("{}/txn/{}?network={}", EXPLORER_BASE, tx_hash, n))
}

pub fn get_account_explorer_url(network_key: &str, address: &str) -> Option<String> {
    explorer_network(network_key)
        .map(|n| format!("{}/account/{}?network={}", EXPLORER_BASE, address, n))
}

fn explorer_network(network_key: &str) -> Option<&'static str> {
    match find_network(network_key)?.key {
        "local" => None,
        key => Some(key),
    }
}

/// Parse the settle delay from `TRANSACTION_DELAY_MILLISECONDS`; unset or garbage means 0.
pub fn parse_delay_ms(raw: Option<String>) -> u64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// Check that a node URL parses and uses http(s).
pub fn validate_node_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| anyhow!("Invalid node URL '{}': {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!("Unsupported URL scheme '{}' (use http or https)", other)),
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub node_url: String,
    pub network_key: String,
    /// Account the gift module is published under
    pub module_address: String,
    pub module_name: String,
    pub confirmation_policy: ConfirmationPolicy,
    pub wallet_backend: WalletBackend,
    /// Profile passed to `aptos --profile`
    pub cli_profile: String,
    pub request_timeout_secs: u64,
    pub label_override: Option<String>,
}

impl Config {
    pub fn new(node_url: String, network_key: &str) -> Self {
        let module_address = env::var("MODULE_ADDRESS").unwrap_or_default();
        let module_name = env::var("MODULE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODULE_NAME.to_string());
        let delay_ms = parse_delay_ms(env::var("TRANSACTION_DELAY_MILLISECONDS").ok());
        let cli_profile = env::var("APTOS_CLI_PROFILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "default".to_string());

        Self {
            node_url,
            network_key: network_key.to_string(),
            module_address: module_address.trim().to_string(),
            module_name: module_name.trim().to_string(),
            confirmation_policy: ConfirmationPolicy::FixedDelay { delay_ms },
            wallet_backend: WalletBackend::default(),
            cli_profile,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            label_override: None,
        }
    }

    pub fn from_network(network: &AptosNetwork) -> Self {
        let node_url = env::var("APTOS_NODE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| network.default_node.to_string());
        Self::new(node_url, network.key)
    }

    /// `<module-address>::<module-name>::view_gifters_gifts`
    pub fn view_gifts_function(&self) -> String {
        self.function_id("view_gifters_gifts")
    }

    /// `<module-address>::<module-name>::remove_birthday_gift`
    pub fn remove_gift_function(&self) -> String {
        self.function_id("remove_birthday_gift")
    }

    fn function_id(&self, name: &str) -> String {
        format!("{}::{}::{}", self.module_address, self.module_name, name)
    }

    /// True once a module address has been configured.
    pub fn has_module(&self) -> bool {
        !self.module_address.is_empty()
    }

    pub fn network_label(&self) -> &str {
        if let Some(ref label) = self.label_override {
            label.as_str()
        } else {
            find_network(&self.network_key)
                .map(|n| n.label)
                .unwrap_or("Custom")
        }
    }

    pub fn rest_client(&self) -> Result<RestClient> {
        let url = validate_node_url(&self.node_url)?;
        RestClient::new(url, self.request_timeout_secs).map_err(|e| anyhow!(e))
    }
}

impl Default for Config {
    fn default() -> Self {
        match find_network(DEFAULT_NETWORK_KEY) {
            Some(testnet) => Self::from_network(testnet),
            None => Self::new(
                "https://fullnode.testnet.aptoslabs.com".to_string(),
                DEFAULT_NETWORK_KEY,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_module() -> Config {
        let mut config = Config::new("https://fullnode.testnet.aptoslabs.com".to_string(), "testnet");
        config.module_address = "0xcafe".to_string();
        config.module_name = "birthday_bot".to_string();
        config
    }

    // ==================== find_network tests ====================

    #[test]
    fn test_find_network_testnet() {
        let network = find_network("testnet").unwrap();
        assert_eq!(network.label, "Testnet");
        assert!(network.is_testnet);
    }

    #[test]
    fn test_find_network_case_insensitive() {
        assert_eq!(find_network("MAINNET").unwrap().key, "mainnet");
    }

    #[test]
    fn test_find_network_not_found() {
        assert!(find_network("moonnet").is_none());
    }

    // ==================== explorer URL tests ====================

    #[test]
    fn test_tx_explorer_url() {
        assert_eq!(
            get_tx_explorer_url("testnet", "0xabc").as_deref(),
            Some("https://explorer.aptoslabs.com/txn/0xabc?network=testnet")
        );
    }

    #[test]
    fn test_account_explorer_url() {
        assert_eq!(
            get_account_explorer_url("mainnet", "0x1").as_deref(),
            Some("https://explorer.aptoslabs.com/account/0x1?network=mainnet")
        );
    }

    #[test]
    fn test_explorer_url_local_and_unknown() {
        assert!(get_tx_explorer_url("local", "0xabc").is_none());
        assert!(get_tx_explorer_url("moonnet", "0xabc").is_none());
    }

    // ==================== parse_delay_ms tests ====================

    #[test]
    fn test_parse_delay_ms_unset_defaults_to_zero() {
        assert_eq!(parse_delay_ms(None), 0);
    }

    #[test]
    fn test_parse_delay_ms_value() {
        assert_eq!(parse_delay_ms(Some(" 1500 ".to_string())), 1500);
    }

    #[test]
    fn test_parse_delay_ms_garbage() {
        assert_eq!(parse_delay_ms(Some("soon".to_string())), 0);
    }

    // ==================== validate_node_url tests ====================

    #[test]
    fn test_validate_node_url_https() {
        assert!(validate_node_url("https://fullnode.devnet.aptoslabs.com").is_ok());
    }

    #[test]
    fn test_validate_node_url_rejects_scheme() {
        let err = validate_node_url("ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn test_validate_node_url_rejects_garbage() {
        assert!(validate_node_url("not a url").is_err());
    }

    // ==================== Config tests ====================

    #[test]
    fn test_function_ids() {
        let config = config_with_module();
        assert_eq!(config.view_gifts_function(), "0xcafe::birthday_bot::view_gifters_gifts");
        assert_eq!(config.remove_gift_function(), "0xcafe::birthday_bot::remove_birthday_gift");
        assert!(config.has_module());
    }

    #[test]
    fn test_network_label() {
        let mut config = config_with_module();
        assert_eq!(config.network_label(), "Testnet");
        config.label_override = Some("My Node".to_string());
        assert_eq!(config.network_label(), "My Node");
        config.label_override = None;
        config.network_key = "elsewhere".to_string();
        assert_eq!(config.network_label(), "Custom");
    }

    #[test]
    fn test_config_default_is_testnet() {
        let config = Config::default();
        assert_eq!(config.network_key, "testnet");
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_rest_client_rejects_bad_url() {
        let mut config = config_with_module();
        config.node_url = "nope".to_string();
        assert!(config.rest_client().is_err());
    }
}
