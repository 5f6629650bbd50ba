//! transaction lifecycle driver
//!
//! write path: resolve account, build, simulate, prepare, sign, submit,
//! poll. read path: simulate-only. each stage either advances or aborts the
//! call with that stage's error; no stage is re-entered or retried

use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::envelope::{Envelope, SignedEnvelope};
use crate::error::{ClientError, Result};
use crate::operation::Operation;
use crate::rpc::RpcNode;
use crate::signer::{Signer, SignerError};
use crate::types::{AccountState, Escrow, SubmitStatus, TxStatus};

/// escrow contract client
///
/// owns its collaborators; construct one per deployment and share it (or an
/// `Arc` of each collaborator) freely. methods take `&self` and impose no
/// mutual exclusion: concurrent calls interleave at the node's discretion
pub struct EscrowClient<N, S> {
    node: N,
    signer: S,
    config: ClientConfig,
}

impl<N: RpcNode, S: Signer> EscrowClient<N, S> {
    /// build a client; fails fast when the contract id is missing
    pub fn new(node: N, signer: S, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            node,
            signer,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// whether the signing authority is reachable
    pub async fn signer_connected(&self) -> bool {
        self.signer.is_connected().await
    }

    /// resolve the acting account's sequence state and balance
    pub async fn account_state(&self) -> Result<AccountState> {
        let address = self.acting_address().await?;
        self.node
            .account(&address)
            .await
            .map_err(|e| ClientError::AccountResolution(e.to_string()))
    }

    /// create an escrow; resolves to the confirmed transaction hash
    pub async fn create(&self, id: &str, receiver: &str, amount: i128) -> Result<String> {
        let sender = self.acting_address().await?;
        let op = Operation::create(&self.config.contract_id, id, &sender, receiver, amount);
        self.execute(&sender, op).await
    }

    /// release escrowed funds to the receiver
    pub async fn release(&self, id: &str) -> Result<String> {
        let caller = self.acting_address().await?;
        let op = Operation::release(&self.config.contract_id, id, &caller);
        self.execute(&caller, op).await
    }

    /// refund escrowed funds to the sender
    pub async fn refund(&self, id: &str) -> Result<String> {
        let caller = self.acting_address().await?;
        let op = Operation::refund(&self.config.contract_id, id, &caller);
        self.execute(&caller, op).await
    }

    /// read an escrow record
    ///
    /// simulate-only: the envelope carries a throwaway source and is never
    /// signed or submitted. a missing record and an unreadable one both come
    /// back `None`; the debug log is the only place they differ
    pub async fn get(&self, id: &str) -> Option<Escrow> {
        let op = Operation::get(&self.config.contract_id, id);
        let envelope = self.build_envelope(&throwaway_address(), 0, op);

        let sim = match self.node.simulate(&envelope).await {
            Ok(sim) => sim,
            Err(e) => {
                debug!("get {}: simulation unreachable: {}", id, e);
                return None;
            }
        };
        if let Some(diag) = sim.error {
            debug!("get {}: simulation error: {}", id, diag);
            return None;
        }
        let retval = sim.retval?;

        match serde_json::from_value::<Escrow>(retval) {
            Ok(escrow) => Some(escrow),
            Err(e) => {
                debug!("get {}: undecodable escrow record: {}", id, e);
                None
            }
        }
    }

    async fn acting_address(&self) -> Result<String> {
        self.signer.address().await.map_err(signing_error)
    }

    fn build_envelope(&self, source: &str, sequence: u64, operation: Operation) -> Envelope {
        Envelope::build(
            source,
            sequence,
            self.config.base_fee,
            self.config.tx_validity_secs,
            self.config.network_id(),
            operation,
        )
    }

    /// full write lifecycle for one operation
    async fn execute(&self, source: &str, operation: Operation) -> Result<String> {
        // resolve the acting account's sequence state
        let account = self
            .node
            .account(source)
            .await
            .map_err(|e| ClientError::AccountResolution(e.to_string()))?;

        // one operation, base fee, bounded validity window
        let envelope = self.build_envelope(source, account.sequence + 1, operation);
        debug!(
            "built {} envelope at sequence {}",
            envelope.operation.call, envelope.sequence
        );

        // dry-run against current ledger state
        let sim = self
            .node
            .simulate(&envelope)
            .await
            .map_err(|e| ClientError::Simulation(e.to_string()))?;
        if let Some(diag) = sim.error {
            return Err(ClientError::Simulation(diag));
        }
        let resources = sim
            .resources
            .ok_or_else(|| ClientError::Simulation("no result".into()))?;

        // merge footprint and fee; the unsigned envelope stays intact
        let prepared = envelope.prepared(&resources);

        // hand the prepared encoding to the external authority
        let signed_bytes = self
            .signer
            .sign(
                &prepared.encode_bytes(),
                &self.config.network_passphrase,
                source,
            )
            .await
            .map_err(signing_error)?;

        // decode the signed encoding and check it is bound to our network
        let signed = SignedEnvelope::decode_bytes(&signed_bytes)
            .map_err(|e| ClientError::Signing(format!("undecodable signed envelope: {e}")))?;
        if signed.envelope.network_id != self.config.network_id() {
            return Err(ClientError::Signing(
                "signed envelope bound to a different network".into(),
            ));
        }

        let receipt = self
            .node
            .submit(&signed)
            .await
            .map_err(|e| ClientError::Submission(e.to_string()))?;
        if receipt.status == SubmitStatus::Error {
            return Err(ClientError::Submission(
                receipt.error.unwrap_or_else(|| "rejected".into()),
            ));
        }
        info!(
            "submitted {} ({:?})",
            receipt.hash, receipt.status
        );

        self.confirm(&receipt.hash).await
    }

    /// poll for a terminal outcome at a fixed interval
    ///
    /// the attempt ceiling is the cancellation mechanism; exhausting it
    /// reports an unknown outcome, never a negative one
    async fn confirm(&self, hash: &str) -> Result<String> {
        let attempts = self.config.poll_attempts;
        for attempt in 1..=attempts {
            match self.node.transaction_status(hash).await {
                Ok(TxStatus::Success) => {
                    info!("{} confirmed after {} polls", hash, attempt);
                    return Ok(hash.to_string());
                }
                Ok(TxStatus::Failed) => {
                    return Err(ClientError::TransactionFailed {
                        hash: hash.to_string(),
                    });
                }
                Ok(TxStatus::NotFound) => {
                    debug!("{} not found yet (poll {}/{})", hash, attempt, attempts);
                }
                // a blip spends the attempt; the ceiling still bounds the loop
                Err(e) => warn!("{} status query failed: {}", hash, e),
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }

        Err(ClientError::TransactionTimeout {
            hash: hash.to_string(),
            attempts,
        })
    }
}

/// random, never-funded source for read-only simulation envelopes
fn throwaway_address() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

fn signing_error(e: SignerError) -> ClientError {
    match e {
        SignerError::Declined => ClientError::SigningDeclined,
        other => ClientError::Signing(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throwaway_address_shape() {
        let a = throwaway_address();
        let b = throwaway_address();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_declined_stays_distinct() {
        assert!(matches!(
            signing_error(SignerError::Declined),
            ClientError::SigningDeclined
        ));
        assert!(matches!(
            signing_error(SignerError::Unavailable("gone".into())),
            ClientError::Signing(_)
        ));
    }
}
