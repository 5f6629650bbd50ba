//! kinko cli: create, inspect, release and refund on-chain escrows
//!
//! thin glue over kinko-client; every lifecycle decision lives there

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use kinko_client::{
    translate_error, ClientConfig, ClientError, EscrowClient, EscrowError, LocalSigner, NodeClient,
};

#[derive(Parser)]
#[command(name = "kinko")]
#[command(about = "escrow client for the kinko contract")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// rpc endpoint
    #[arg(long, env = "KINKO_RPC_URL")]
    rpc: Option<String>,

    /// escrow contract id
    #[arg(long, env = "KINKO_CONTRACT_ID")]
    contract: Option<String>,

    /// network passphrase
    #[arg(long, env = "KINKO_NETWORK_PASSPHRASE")]
    network_passphrase: Option<String>,

    /// signer seed, 32 bytes hex
    #[arg(long, env = "KINKO_SIGNER_SEED")]
    seed: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// create a new escrow
    Create {
        /// escrow id
        #[arg(long)]
        id: String,

        /// receiver address
        #[arg(long)]
        receiver: String,

        /// amount in the smallest unit
        #[arg(long)]
        amount: i128,
    },

    /// show an escrow record
    Get {
        #[arg(long)]
        id: String,
    },

    /// release escrowed funds to the receiver
    Release {
        #[arg(long)]
        id: String,
    },

    /// refund escrowed funds to the sender
    Refund {
        #[arg(long)]
        id: String,
    },

    /// show the signer account balance
    Balance,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kinko=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::default();
    if let Some(rpc) = cli.rpc {
        config.rpc_url = rpc;
    }
    if let Some(contract) = cli.contract {
        config.contract_id = contract;
    }
    if let Some(passphrase) = cli.network_passphrase {
        config.network_passphrase = passphrase;
    }

    let signer = match cli.seed {
        Some(seed) => LocalSigner::from_hex(&seed).map_err(|e| anyhow::anyhow!("{e}"))?,
        None => {
            info!("no signer seed given, generating a throwaway key");
            LocalSigner::generate()
        }
    };

    let node = NodeClient::new(&config.rpc_url);
    let client = EscrowClient::new(node, signer, config)?;

    match cli.command {
        Commands::Create {
            id,
            receiver,
            amount,
        } => {
            if !client.signer_connected().await {
                warn!("signing authority not reachable; the signing step will fail");
            }
            let hash = client
                .create(&id, &receiver, amount)
                .await
                .map_err(report)?;
            println!("escrow {} created", id);
            println!("tx: {}", hash);
            println!("explorer: {}", client.config().explorer_link(&hash));
        }
        Commands::Get { id } => match client.get(&id).await {
            Some(escrow) => {
                println!("escrow:    {}", escrow.id);
                println!("sender:    {}", escrow.sender);
                println!("receiver:  {}", escrow.receiver);
                println!("amount:    {} {}", escrow.amount, client.config().symbol);
                println!(
                    "state:     {}",
                    if escrow.completed { "completed" } else { "open" }
                );
            }
            None => println!("{}", EscrowError::NotFound),
        },
        Commands::Release { id } => {
            let hash = client.release(&id).await.map_err(report)?;
            println!("escrow {} released", id);
            println!("tx: {}", hash);
            println!("explorer: {}", client.config().explorer_link(&hash));
        }
        Commands::Refund { id } => {
            let hash = client.refund(&id).await.map_err(report)?;
            println!("escrow {} refunded", id);
            println!("tx: {}", hash);
            println!("explorer: {}", client.config().explorer_link(&hash));
        }
        Commands::Balance => match client.account_state().await {
            Ok(state) => println!(
                "{} {}",
                state.format_balance(client.config().decimals),
                client.config().symbol
            ),
            Err(e) => {
                warn!("balance query failed: {}", e);
                println!("0 {}", client.config().symbol);
            }
        },
    }

    Ok(())
}

/// render the user-facing category before handing the raw error up
fn report(err: ClientError) -> anyhow::Error {
    match &err {
        // the outcome is unknown; say so instead of claiming failure
        ClientError::TransactionTimeout { hash, .. } => {
            eprintln!(
                "outcome unknown: {} was not confirmed in time; check the explorer before retrying",
                hash
            );
        }
        other => eprintln!("error: {}", translate_error(&other.to_string())),
    }
    err.into()
}
