//! kinko-client: escrow contract client
//!
//! drives the full transaction lifecycle for the kinko escrow contract:
//! build an envelope, simulate it, merge the estimated fees, obtain a
//! signature, submit, and poll until the network reports a terminal
//! outcome. the rpc node and the signing authority sit behind trait seams
//! so deployments and tests can swap them.
//!
//! ## usage
//!
//! ```rust,ignore
//! let config = ClientConfig::testnet("CKNK01ESCROW");
//! let node = NodeClient::new(&config.rpc_url);
//! let signer = LocalSigner::from_hex(&seed)?;
//! let client = EscrowClient::new(node, signer, config)?;
//!
//! let hash = client.create("escrow-001", &receiver, 5_0000000).await?;
//! let escrow = client.get("escrow-001").await;
//! client.release("escrow-001").await?;
//! ```

pub mod config;
pub mod driver;
pub mod envelope;
pub mod error;
pub mod operation;
pub mod rpc;
pub mod signer;
pub mod translate;
pub mod types;

pub use config::*;
pub use driver::*;
pub use envelope::*;
pub use error::*;
pub use operation::*;
pub use rpc::*;
pub use signer::*;
pub use translate::*;
pub use types::*;
