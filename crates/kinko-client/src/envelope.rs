//! transaction envelope: a sequenced, time-bounded container for one operation

use std::time::{SystemTime, UNIX_EPOCH};

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::operation::Operation;

/// resource footprint and fee estimated by simulation
#[derive(Clone, Debug, Default, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Resources {
    pub instructions: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
    /// fee covering the footprint, added on top of the base fee
    pub resource_fee: u64,
}

/// unsigned transaction envelope
///
/// built fresh per call and invalid once `valid_until` passes. a retry after
/// any terminal outcome rebuilds from a fresh sequence number; an envelope is
/// never resubmitted
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct Envelope {
    /// acting account address
    pub source: String,
    /// account sequence consumed by this envelope
    pub sequence: u64,
    /// total fee; base fee until prepared
    pub fee: u64,
    /// unix seconds after which the envelope is invalid
    pub valid_until: u64,
    /// network the envelope is bound to
    pub network_id: [u8; 32],
    pub operation: Operation,
    /// simulation-derived footprint, present once prepared
    pub resources: Option<Resources>,
}

impl Envelope {
    /// build an unsigned envelope around one operation
    pub fn build(
        source: &str,
        sequence: u64,
        base_fee: u64,
        validity_secs: u64,
        network_id: [u8; 32],
        operation: Operation,
    ) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Self {
            source: source.into(),
            sequence,
            fee: base_fee,
            valid_until: now + validity_secs,
            network_id,
            operation,
            resources: None,
        }
    }

    /// merge a simulation's fee and footprint into a prepared envelope
    ///
    /// pure transform: `self` stays untouched so a caller can rebuild from a
    /// fresh sequence instead of reusing it
    pub fn prepared(&self, resources: &Resources) -> Envelope {
        let mut prepared = self.clone();
        prepared.fee = self.fee.saturating_add(resources.resource_fee);
        prepared.resources = Some(resources.clone());
        prepared
    }

    /// canonical binary encoding
    pub fn encode_bytes(&self) -> Vec<u8> {
        self.encode()
    }

    pub fn decode_bytes(bytes: &[u8]) -> std::result::Result<Self, parity_scale_codec::Error> {
        Self::decode(&mut &bytes[..])
    }

    /// digest the signing authority signs, bound to the network id
    pub fn signing_payload(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.network_id);
        hasher.update(&self.encode());
        *hasher.finalize().as_bytes()
    }
}

/// envelope plus the authority's signature; submitted exactly once
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct SignedEnvelope {
    pub envelope: Envelope,
    pub signature: Vec<u8>,
}

impl SignedEnvelope {
    pub fn encode_bytes(&self) -> Vec<u8> {
        self.encode()
    }

    pub fn decode_bytes(bytes: &[u8]) -> std::result::Result<Self, parity_scale_codec::Error> {
        Self::decode(&mut &bytes[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsigned() -> Envelope {
        Envelope::build(
            "alice",
            8,
            100,
            180,
            [7u8; 32],
            Operation::get("ctr", "escrow-001"),
        )
    }

    #[test]
    fn test_prepared_leaves_unsigned_intact() {
        let envelope = unsigned();
        let resources = Resources {
            instructions: 1_000,
            read_bytes: 64,
            write_bytes: 64,
            resource_fee: 250,
        };

        let prepared = envelope.prepared(&resources);

        assert_eq!(prepared.fee, 350);
        assert_eq!(prepared.resources, Some(resources));
        // original stays a valid base for a rebuilt retry
        assert_eq!(envelope.fee, 100);
        assert_eq!(envelope.resources, None);
    }

    #[test]
    fn test_signing_payload_binds_network() {
        let on_testnet = unsigned();
        let mut on_mainnet = on_testnet.clone();
        on_mainnet.network_id = [9u8; 32];

        assert_ne!(on_testnet.signing_payload(), on_mainnet.signing_payload());
    }

    #[test]
    fn test_signed_envelope_decodes() {
        let signed = SignedEnvelope {
            envelope: unsigned(),
            signature: vec![1u8; 64],
        };

        let decoded = SignedEnvelope::decode_bytes(&signed.encode_bytes()).unwrap();
        assert_eq!(decoded, signed);

        assert!(SignedEnvelope::decode_bytes(&[0u8; 3]).is_err());
    }
}
