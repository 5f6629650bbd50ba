//! error types for the escrow client
//!
//! one variant per lifecycle stage; any failure aborts the whole call, the
//! client never retries a stage on its own

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// fatal configuration error, not retryable
    #[error("contract id not configured")]
    MissingContractId,

    /// acting account unknown or node unreachable
    #[error("account resolution failed: {0}")]
    AccountResolution(String),

    /// the call would fail, or simulation returned nothing usable
    #[error("simulation failed: {0}")]
    Simulation(String),

    /// the user declined the signing request; terminal, distinct from
    /// transient signer trouble
    #[error("signing declined by user")]
    SigningDeclined,

    /// signer absent, unreachable or otherwise failing
    #[error("signing failed: {0}")]
    Signing(String),

    /// immediate rejection at submission
    #[error("submission rejected by node: {0}")]
    Submission(String),

    /// terminal on-chain failure
    #[error("transaction {hash} failed on chain")]
    TransactionFailed { hash: String },

    /// the attempt ceiling ran out while the transaction was still unseen;
    /// it may yet land, the outcome is unknown rather than negative
    #[error("transaction {hash} unconfirmed after {attempts} polls; outcome unknown")]
    TransactionTimeout { hash: String, attempts: u32 },
}

pub type Result<T> = std::result::Result<T, ClientError>;
