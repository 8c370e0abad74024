//! Common types shared across modules.

use serde::{Deserialize, Deserializer, Serialize};

use crate::units;

/// A gift as returned by the `view_gifters_gifts` view function, before unit conversion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawGift {
    pub address: String,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub amount: u64,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub timestamp: u64,
}

/// A gift the connected account has sent and not yet seen claimed.
#[derive(Debug, Clone, PartialEq)]
pub struct Gift {
    /// Recipient account address
    pub address: String,
    /// Amount in APT
    pub amount: f64,
    /// Amount in octas, as stored on chain
    pub amount_octas: u64,
    /// Release time, seconds since epoch
    pub timestamp: u64,
}

impl From<RawGift> for Gift {
    fn from(raw: RawGift) -> Self {
        Self {
            address: raw.address,
            amount: units::octas_to_apt(raw.amount),
            amount_octas: raw.amount,
            timestamp: raw.timestamp,
        }
    }
}

/// Body of a `POST /v1/view` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRequest {
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<serde_json::Value>,
}

/// Entry function payload handed to a wallet for signing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<serde_json::Value>,
}

impl EntryFunctionPayload {
    pub fn new(function: impl Into<String>, arguments: Vec<serde_json::Value>) -> Self {
        Self {
            kind: "entry_function_payload".to_string(),
            function: function.into(),
            type_arguments: Vec::new(),
            arguments,
        }
    }
}

/// A transaction accepted by the wallet or node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub hash: String,
    /// Some backends (the aptos CLI) only return after commit and report the VM result
    pub committed: Option<bool>,
    /// VM status reported alongside `committed`
    pub vm_status: Option<String>,
}

/// Result of `GET /v1/transactions/by_hash/{hash}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub hash: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub vm_status: Option<String>,
}

impl TransactionInfo {
    pub fn is_pending(&self) -> bool {
        self.kind == "pending_transaction"
    }
}

/// Aptos encodes u64 as a JSON string; accept both that and a plain number.
pub fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(u64),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        StringOrNumber::Number(n) => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_gift_accepts_numbers() {
        let raw: RawGift = serde_json::from_str(
            r#"{"address":"0xabc1234","amount":250000000,"timestamp":1700000000}"#,
        )
        .unwrap();
        assert_eq!(raw.amount, 250_000_000);
        assert_eq!(raw.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_raw_gift_accepts_strings() {
        let raw: RawGift = serde_json::from_str(
            r#"{"address":"0xabc1234","amount":"250000000","timestamp":"1700000000"}"#,
        )
        .unwrap();
        assert_eq!(raw.amount, 250_000_000);
        assert_eq!(raw.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_raw_gift_rejects_negative_amount() {
        let res = serde_json::from_str::<RawGift>(
            r#"{"address":"0xabc","amount":"-5","timestamp":1}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_gift_from_raw_converts_amount() {
        let gift = Gift::from(RawGift {
            address: "0xabc...1234".into(),
            amount: 250_000_000,
            timestamp: 1_700_000_000,
        });
        assert_eq!(gift.amount, 2.5);
        assert_eq!(gift.amount_octas, 250_000_000);
        assert_eq!(gift.address, "0xabc...1234");
        assert_eq!(gift.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_entry_payload_serializes_type_field() {
        let payload = EntryFunctionPayload::new(
            "0x1::birthday_bot::remove_birthday_gift",
            vec![serde_json::json!("0xbeef")],
        );
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "entry_function_payload");
        assert_eq!(value["type_arguments"], serde_json::json!([]));
        assert_eq!(value["arguments"], serde_json::json!(["0xbeef"]));
    }

    #[test]
    fn test_transaction_info_pending() {
        let info: TransactionInfo =
            serde_json::from_str(r#"{"type":"pending_transaction","hash":"0x1"}"#).unwrap();
        assert!(info.is_pending());
        assert_eq!(info.success, None);
    }
}
