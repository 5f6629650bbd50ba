//! signing authority seam and local keypair signer
//!
//! production deployments sign through an external wallet; the cli and tests
//! sign in-process with an ed25519 keypair behind the same trait

use std::future::Future;
use std::sync::Arc;

use ed25519_dalek::{Signer as _, SigningKey};
use thiserror::Error;

use crate::envelope::{Envelope, SignedEnvelope};

#[derive(Error, Debug)]
pub enum SignerError {
    /// the user said no; terminal, never conflated with transient trouble
    #[error("signing request declined")]
    Declined,

    /// authority absent or unreachable
    #[error("signer unavailable: {0}")]
    Unavailable(String),

    #[error("signing failed: {0}")]
    Failed(String),
}

/// external signing authority
pub trait Signer: Send + Sync {
    /// whether the authority is reachable
    fn is_connected(&self) -> impl Future<Output = bool> + Send;

    /// public address of the acting account
    fn address(&self) -> impl Future<Output = Result<String, SignerError>> + Send;

    /// sign the canonical envelope encoding for the given network; returns
    /// the signed encoding
    fn sign(
        &self,
        envelope_bytes: &[u8],
        network_passphrase: &str,
        address: &str,
    ) -> impl Future<Output = Result<Vec<u8>, SignerError>> + Send;
}

impl<T: Signer> Signer for Arc<T> {
    async fn is_connected(&self) -> bool {
        (**self).is_connected().await
    }

    async fn address(&self) -> Result<String, SignerError> {
        (**self).address().await
    }

    async fn sign(
        &self,
        envelope_bytes: &[u8],
        network_passphrase: &str,
        address: &str,
    ) -> Result<Vec<u8>, SignerError> {
        (**self).sign(envelope_bytes, network_passphrase, address).await
    }
}

/// in-process ed25519 signer
pub struct LocalSigner {
    key: SigningKey,
}

impl LocalSigner {
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    /// signer from a 32-byte hex seed
    pub fn from_hex(seed: &str) -> Result<Self, SignerError> {
        let bytes =
            hex::decode(seed).map_err(|e| SignerError::Failed(format!("bad seed hex: {e}")))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SignerError::Failed("seed must be 32 bytes".into()))?;
        Ok(Self::new(SigningKey::from_bytes(&seed)))
    }

    /// fresh random signer
    pub fn generate() -> Self {
        Self::new(SigningKey::generate(&mut rand::rngs::OsRng))
    }

    /// lowercase hex address of the verifying key
    pub fn public_address(&self) -> String {
        hex::encode(self.key.verifying_key().as_bytes())
    }
}

impl Signer for LocalSigner {
    async fn is_connected(&self) -> bool {
        true
    }

    async fn address(&self) -> Result<String, SignerError> {
        Ok(self.public_address())
    }

    async fn sign(
        &self,
        envelope_bytes: &[u8],
        network_passphrase: &str,
        address: &str,
    ) -> Result<Vec<u8>, SignerError> {
        let envelope = Envelope::decode_bytes(envelope_bytes)
            .map_err(|e| SignerError::Failed(format!("undecodable envelope: {e}")))?;

        let network_id = *blake3::hash(network_passphrase.as_bytes()).as_bytes();
        if envelope.network_id != network_id {
            return Err(SignerError::Failed(
                "envelope bound to a different network".into(),
            ));
        }
        if address != self.public_address() || envelope.source != address {
            return Err(SignerError::Failed("address not held by this signer".into()));
        }

        let signature = self.key.sign(&envelope.signing_payload());
        let signed = SignedEnvelope {
            envelope,
            signature: signature.to_bytes().to_vec(),
        };
        Ok(signed.encode_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use ed25519_dalek::{Verifier, VerifyingKey};

    const PASSPHRASE: &str = "kinko testnet ; march 2025";

    fn envelope_for(signer: &LocalSigner, passphrase: &str) -> Envelope {
        Envelope::build(
            &signer.public_address(),
            8,
            100,
            180,
            *blake3::hash(passphrase.as_bytes()).as_bytes(),
            Operation::get("ctr", "escrow-001"),
        )
    }

    #[tokio::test]
    async fn test_signature_verifies_over_payload() {
        let signer = LocalSigner::generate();
        let envelope = envelope_for(&signer, PASSPHRASE);
        let address = signer.public_address();

        let signed_bytes = signer
            .sign(&envelope.encode_bytes(), PASSPHRASE, &address)
            .await
            .unwrap();
        let signed = SignedEnvelope::decode_bytes(&signed_bytes).unwrap();
        assert_eq!(signed.envelope, envelope);

        let key_bytes: [u8; 32] = hex::decode(&address).unwrap().try_into().unwrap();
        let verifying = VerifyingKey::from_bytes(&key_bytes).unwrap();
        let signature =
            ed25519_dalek::Signature::from_slice(&signed.signature).unwrap();
        verifying
            .verify(&signed.envelope.signing_payload(), &signature)
            .unwrap();
    }

    #[tokio::test]
    async fn test_refuses_foreign_network() {
        let signer = LocalSigner::generate();
        let envelope = envelope_for(&signer, "kinko mainnet ; march 2025");
        let address = signer.public_address();

        let err = signer
            .sign(&envelope.encode_bytes(), PASSPHRASE, &address)
            .await
            .unwrap_err();
        assert!(matches!(err, SignerError::Failed(_)));
    }

    #[tokio::test]
    async fn test_refuses_foreign_address() {
        let signer = LocalSigner::generate();
        let other = LocalSigner::generate();
        let envelope = envelope_for(&other, PASSPHRASE);

        let err = signer
            .sign(&envelope.encode_bytes(), PASSPHRASE, &other.public_address())
            .await
            .unwrap_err();
        assert!(matches!(err, SignerError::Failed(_)));
    }

    #[test]
    fn test_from_hex_round_trips() {
        let signer = LocalSigner::from_hex(&hex::encode([3u8; 32])).unwrap();
        assert_eq!(signer.public_address().len(), 64);

        assert!(LocalSigner::from_hex("zz").is_err());
        assert!(LocalSigner::from_hex("0a0b").is_err());
    }
}
