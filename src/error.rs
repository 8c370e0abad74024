//! Typed errors for the ledger RPC and wallet layers.
//!
//! Application glue (settings, GUI jobs) uses `anyhow`; these enums are what the
//! network-facing modules hand back so callers can branch on them.

use thiserror::Error;

/// Failure of a call against the Aptos fullnode REST API.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid node URL '{0}'")]
    InvalidUrl(String),

    #[error("request to {endpoint} failed: {message}")]
    Http { endpoint: String, message: String },

    #[error("node returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("unexpected response shape: {0}")]
    InvalidResponse(String),
}

impl RpcError {
    /// True for a 404 from the node, which the transaction lookup treats as "not yet known".
    pub fn is_not_found(&self) -> bool {
        matches!(self, RpcError::Status { code: 404, .. })
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        let endpoint = e
            .url()
            .map(|u| u.path().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        if e.is_decode() {
            RpcError::Decode(e.to_string())
        } else {
            RpcError::Http {
                endpoint,
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(e: serde_json::Error) -> Self {
        RpcError::Decode(e.to_string())
    }
}

/// Failure while obtaining the account or submitting a transaction through a wallet.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet is not connected")]
    NotConnected,

    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("aptos CLI not found - install it from https://aptos.dev/tools/aptos-cli")]
    CliNotFound,

    #[error("aptos CLI failed: {0}")]
    CliFailed(String),

    #[error("timed out after {0}s waiting for the wallet")]
    Timeout(u64),

    #[error("invalid transaction payload: {0}")]
    InvalidPayload(String),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_only_for_404() {
        let nf = RpcError::Status {
            code: 404,
            body: "transaction_not_found".into(),
        };
        let server = RpcError::Status {
            code: 500,
            body: "boom".into(),
        };
        assert!(nf.is_not_found());
        assert!(!server.is_not_found());
        assert!(!RpcError::Decode("x".into()).is_not_found());
    }

    #[test]
    fn test_wallet_error_wraps_rpc_message() {
        let err: WalletError = RpcError::Status {
            code: 400,
            body: "SEQUENCE_NUMBER_TOO_OLD".into(),
        }
        .into();
        assert!(err.to_string().contains("SEQUENCE_NUMBER_TOO_OLD"));
    }

    #[test]
    fn test_serde_error_becomes_decode() {
        let e = serde_json::from_str::<u64>("not json").unwrap_err();
        assert!(matches!(RpcError::from(e), RpcError::Decode(_)));
    }
}
