//! domain and wire types shared by the driver and the rpc client

use serde::{Deserialize, Serialize};

use crate::envelope::Resources;

/// escrow record held by the contract; server-owned, read-only here
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escrow {
    pub id: String,
    pub sender: String,
    pub receiver: String,
    /// amount in the smallest unit; decimal string on the wire, 128-bit
    /// values do not survive json numbers
    #[serde(with = "i128_string")]
    pub amount: i128,
    pub completed: bool,
}

/// account state resolved from the node
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountState {
    pub address: String,
    /// current sequence; the next envelope consumes sequence + 1
    pub sequence: u64,
    #[serde(with = "u128_string", default)]
    pub balance: u128,
}

impl AccountState {
    /// format balance with decimals
    pub fn format_balance(&self, decimals: u8) -> String {
        let divisor = 10u128.pow(decimals as u32);
        let whole = self.balance / divisor;
        let frac = self.balance % divisor;
        format!("{}.{:0>width$}", whole, frac, width = decimals as usize)
    }
}

/// dry-run outcome: fee and footprint estimate plus either a return value
/// or a simulation-level error; consumed immediately to prepare an envelope
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Simulation {
    /// structural or contract-level failure reported by the node
    #[serde(default)]
    pub error: Option<String>,
    /// estimated footprint, present on success
    #[serde(default)]
    pub resources: Option<Resources>,
    /// return value of the call, present on success
    #[serde(default)]
    pub retval: Option<serde_json::Value>,
}

/// immediate acceptance status for a submitted envelope
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitStatus {
    Pending,
    Duplicate,
    Error,
}

/// opaque transaction id plus immediate status; the hash is the polling key
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub hash: String,
    pub status: SubmitStatus,
    /// diagnostic for an immediate rejection
    #[serde(default)]
    pub error: Option<String>,
}

/// confirmation status reported by the node for a transaction hash
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    /// not yet observed; may still resolve
    NotFound,
    Success,
    Failed,
}

impl TxStatus {
    /// terminal statuses do not change on further polling
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TxStatus::NotFound)
    }
}

/// 128-bit amounts cross the json wire as decimal strings
mod i128_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

mod u128_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escrow_amount_is_a_string_on_the_wire() {
        let escrow = Escrow {
            id: "escrow-001".into(),
            sender: "alice".into(),
            receiver: "bob".into(),
            amount: 5_0000000,
            completed: false,
        };

        let json = serde_json::to_value(&escrow).unwrap();
        assert_eq!(json["amount"], serde_json::json!("50000000"));

        let back: Escrow = serde_json::from_value(json).unwrap();
        assert_eq!(back, escrow);
    }

    #[test]
    fn test_statuses_use_screaming_snake_case() {
        let status: TxStatus = serde_json::from_str("\"NOT_FOUND\"").unwrap();
        assert_eq!(status, TxStatus::NotFound);
        assert!(!status.is_terminal());

        let status: SubmitStatus = serde_json::from_str("\"DUPLICATE\"").unwrap();
        assert_eq!(status, SubmitStatus::Duplicate);
    }

    #[test]
    fn test_format_balance() {
        let state = AccountState {
            address: "alice".into(),
            sequence: 0,
            balance: 12_5000000,
        };
        assert_eq!(state.format_balance(7), "12.5000000");
    }
}
