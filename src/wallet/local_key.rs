//! Wallet backend that signs with a local Ed25519 key.
//!
//! Transactions are built by the fullnode (`encode_submission`), signed here
//! and submitted as JSON, so no BCS encoding is needed client-side.

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use serde_json::json;
use sha3::{Digest, Sha3_256};
use std::env;
use tracing::{debug, info};

use super::{WalletProvider, WalletStatus};
use crate::error::{RpcError, WalletError};
use crate::rpc::RestClient;
use crate::types::{EntryFunctionPayload, SubmittedTransaction};

pub const PRIVATE_KEY_ENV: &str = "APTOS_PRIVATE_KEY";

/// Upper bound on gas units for a single cancel
const MAX_GAS_AMOUNT: u64 = 5_000;

/// Seconds a signed transaction stays valid
const EXPIRATION_SECS: i64 = 60;

/// Single-signer Ed25519 authentication scheme byte
const ED25519_SCHEME: u8 = 0x00;

/// Parse a hex private key. Accepts `0x` and AIP-80 `ed25519-priv-` prefixes.
pub fn parse_private_key(raw: &str) -> Result<SigningKey, WalletError> {
    let trimmed = raw.trim();
    let without_scheme = trimmed.strip_prefix("ed25519-priv-").unwrap_or(trimmed);
    let hex_part = without_scheme.strip_prefix("0x").unwrap_or(without_scheme);
    let bytes = hex::decode(hex_part).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| WalletError::InvalidKey(format!("expected 32 bytes, got {}", b.len())))?;
    Ok(SigningKey::from_bytes(&bytes))
}

/// Account address of a single-key Ed25519 account: `sha3_256(pubkey || 0x00)`.
pub fn derive_address(public_key: &[u8; 32]) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(public_key);
    hasher.update([ED25519_SCHEME]);
    format!("0x{}", hex::encode(hasher.finalize()))
}

pub struct LocalKeyWallet {
    signing_key: SigningKey,
    address: String,
    client: RestClient,
}

impl LocalKeyWallet {
    pub fn new(signing_key: SigningKey, client: RestClient) -> Self {
        let address = derive_address(&signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
            client,
        }
    }

    /// Load the key from `APTOS_PRIVATE_KEY`. Missing means "not connected".
    pub fn from_env(client: RestClient) -> Result<Self, WalletError> {
        let raw = env::var(PRIVATE_KEY_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(WalletError::NotConnected)?;
        Ok(Self::new(parse_private_key(&raw)?, client))
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.verifying_key().to_bytes()))
    }

    /// Sign the hex signing message returned by `encode_submission`.
    fn sign_message(&self, message_hex: &str) -> Result<String, WalletError> {
        let hex_part = message_hex.strip_prefix("0x").unwrap_or(message_hex);
        let message = hex::decode(hex_part)
            .map_err(|e| WalletError::Rpc(RpcError::Decode(format!("signing message: {}", e))))?;
        let signature = self.signing_key.sign(&message);
        Ok(format!("0x{}", hex::encode(signature.to_bytes())))
    }

    fn unsigned_body(
        &self,
        payload: &EntryFunctionPayload,
        sequence_number: u64,
        gas_unit_price: u64,
    ) -> serde_json::Value {
        let expiration = chrono::Utc::now().timestamp() + EXPIRATION_SECS;
        json!({
            "sender": self.address,
            "sequence_number": sequence_number.to_string(),
            "max_gas_amount": MAX_GAS_AMOUNT.to_string(),
            "gas_unit_price": gas_unit_price.to_string(),
            "expiration_timestamp_secs": expiration.to_string(),
            "payload": payload,
        })
    }
}

#[async_trait]
impl WalletProvider for LocalKeyWallet {
    async fn status(&self) -> WalletStatus {
        WalletStatus::Connected {
            address: self.address.clone(),
        }
    }

    async fn sign_and_submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<SubmittedTransaction, WalletError> {
        let _lock = crate::wallet_lock::wallet_lock().lock().await;

        let sequence_number = self.client.account_sequence_number(&self.address).await?;
        let gas_unit_price = self.client.estimate_gas_price().await?;
        debug!(
            "Building {} for {} (seq {}, gas price {})",
            payload.function, self.address, sequence_number, gas_unit_price
        );

        let mut body = self.unsigned_body(payload, sequence_number, gas_unit_price);
        let message = self.client.encode_submission(&body).await?;
        body["signature"] = json!({
            "type": "ed25519_signature",
            "public_key": self.public_key_hex(),
            "signature": self.sign_message(&message)?,
        });

        let pending = self.client.submit_transaction(&body).await.map_err(|e| match e {
            RpcError::Status { code, body } if (400..500).contains(&code) => WalletError::Rejected(body),
            other => WalletError::Rpc(other),
        })?;
        info!("Submitted {} as {}", payload.function, pending.hash);
        Ok(SubmittedTransaction {
            hash: pending.hash,
            committed: None,
            vm_status: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier};
    use url::Url;

    const KEY_HEX: &str = "0x9bf49a6a0755f953811fce125f2683d50429c3bb49e074147e0089a52eae155f";

    fn wallet() -> LocalKeyWallet {
        let client = RestClient::new(Url::parse("http://127.0.0.1:8080").unwrap(), 5).unwrap();
        LocalKeyWallet::new(parse_private_key(KEY_HEX).unwrap(), client)
    }

    // ==================== parse_private_key tests ====================

    #[test]
    fn test_parse_private_key_prefixes_agree() {
        let plain = parse_private_key(KEY_HEX.trim_start_matches("0x")).unwrap();
        let prefixed = parse_private_key(KEY_HEX).unwrap();
        let aip80 = parse_private_key(&format!("ed25519-priv-{}", KEY_HEX)).unwrap();
        assert_eq!(plain.to_bytes(), prefixed.to_bytes());
        assert_eq!(plain.to_bytes(), aip80.to_bytes());
    }

    #[test]
    fn test_parse_private_key_wrong_length() {
        match parse_private_key("0xabcd") {
            Err(WalletError::InvalidKey(msg)) => assert!(msg.contains("32 bytes")),
            other => panic!("unexpected {:?}", other.map(|k| k.to_bytes())),
        }
    }

    #[test]
    fn test_parse_private_key_not_hex() {
        assert!(matches!(parse_private_key("zz"), Err(WalletError::InvalidKey(_))));
    }

    // ==================== derive_address tests ====================

    #[test]
    fn test_derive_address_shape() {
        let w = wallet();
        assert!(w.address().starts_with("0x"));
        assert_eq!(w.address().len(), 66);
    }

    #[test]
    fn test_derive_address_appends_scheme_byte() {
        let key = parse_private_key(KEY_HEX).unwrap();
        let public = key.verifying_key().to_bytes();
        let mut bytes = public.to_vec();
        bytes.push(0x00);
        let expected = format!("0x{}", hex::encode(Sha3_256::digest(&bytes)));
        assert_eq!(derive_address(&public), expected);
    }

    #[test]
    fn test_derive_address_differs_per_key() {
        let a = derive_address(&[1u8; 32]);
        let b = derive_address(&[2u8; 32]);
        assert_ne!(a, b);
    }

    // ==================== signing tests ====================

    #[test]
    fn test_sign_message_verifies() {
        let w = wallet();
        let sig_hex = w.sign_message("0xb5e97db07fa0bd0e5598aa3643a9bc6f").unwrap();
        let sig_bytes: [u8; 64] = hex::decode(sig_hex.trim_start_matches("0x"))
            .unwrap()
            .try_into()
            .unwrap();
        let message = hex::decode("b5e97db07fa0bd0e5598aa3643a9bc6f").unwrap();
        assert!(w
            .signing_key
            .verifying_key()
            .verify(&message, &Signature::from_bytes(&sig_bytes))
            .is_ok());
    }

    #[test]
    fn test_unsigned_body_fields() {
        let w = wallet();
        let payload = EntryFunctionPayload::new("0xcafe::birthday_bot::remove_birthday_gift", vec![json!("0xbeef")]);
        let body = w.unsigned_body(&payload, 7, 100);
        assert_eq!(body["sender"], w.address());
        assert_eq!(body["sequence_number"], "7");
        assert_eq!(body["gas_unit_price"], "100");
        assert_eq!(body["payload"]["type"], "entry_function_payload");
        assert_eq!(body["payload"]["arguments"][0], "0xbeef");
    }

    #[tokio::test]
    async fn test_status_is_connected_with_derived_address() {
        let w = wallet();
        assert_eq!(w.status().await.address(), Some(w.address()));
    }
}
