//! client configuration and deployment endpoints

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// fixed base fee per envelope, in the smallest unit
pub const BASE_FEE: u64 = 100;

/// envelope validity window in seconds from build time
pub const TX_VALIDITY_SECS: u64 = 180;

/// escrow client configuration
///
/// rpc endpoint, contract id and network passphrase are fixed per
/// deployment; only the contract id is checked, for presence
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// rpc http endpoint
    pub rpc_url: String,
    /// escrow contract identifier
    pub contract_id: String,
    /// network passphrase the envelope and signature are bound to
    pub network_passphrase: String,
    /// explorer base url for transaction links
    pub explorer_url: String,
    /// token symbol
    pub symbol: String,
    /// token decimals
    pub decimals: u8,
    /// base fee per envelope (smallest unit)
    pub base_fee: u64,
    /// validity window in seconds from build time
    pub tx_validity_secs: u64,
    /// delay between confirmation polls
    pub poll_interval: Duration,
    /// confirmation polls before giving up
    pub poll_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.kinko.rotko.net".into(),
            contract_id: String::new(),
            network_passphrase: "kinko testnet ; march 2025".into(),
            explorer_url: "https://explorer.kinko.rotko.net/tx".into(),
            symbol: "KNK".into(),
            decimals: 7,
            base_fee: BASE_FEE,
            tx_validity_secs: TX_VALIDITY_SECS,
            poll_interval: Duration::from_secs(1),
            poll_attempts: 30,
        }
    }
}

impl ClientConfig {
    /// testnet deployment for the given contract
    pub fn testnet(contract_id: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            ..Default::default()
        }
    }

    /// presence check; a missing contract id is fatal
    pub fn validate(&self) -> Result<()> {
        if self.contract_id.is_empty() {
            return Err(ClientError::MissingContractId);
        }
        Ok(())
    }

    /// network identifier derived from the passphrase
    pub fn network_id(&self) -> [u8; 32] {
        *blake3::hash(self.network_passphrase.as_bytes()).as_bytes()
    }

    /// explorer link for a transaction hash
    pub fn explorer_link(&self, hash: &str) -> String {
        format!("{}/{}", self.explorer_url, hash)
    }
}
