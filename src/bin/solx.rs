use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde_json::json;
use solana_asset_kit::core::constants::{program_names, DEFAULT_WAIT_INTERVAL_MS};
use solana_asset_kit::{
    AssetDirection, CoinTransaction, ContractTransaction, NetworkConfig, NftTransaction, Provider,
    TokenTransaction, TransactionType,
};

#[derive(Parser)]
#[command(author, version, about = "Inspect and verify Solana asset transfers", long_about = None)]
struct Cli {
    /// RPC endpoint URL (can also be set via SOLANA_RPC_URL)
    #[arg(long, global = true, env = "SOLANA_RPC_URL")]
    rpc_url: Option<String>,
    /// Use devnet instead of mainnet-beta
    #[arg(long, global = true)]
    testnet: bool,
    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the status of a transaction
    Status {
        signature: String,
        /// Poll until the transaction leaves PENDING
        #[arg(long)]
        wait: bool,
        /// Poll interval in milliseconds
        #[arg(long, default_value_t = DEFAULT_WAIT_INTERVAL_MS)]
        interval_ms: u64,
    },
    /// Classify a transaction and print its transfer fields
    Classify { signature: String },
    /// Check a transaction against an expected transfer
    Verify {
        signature: String,
        #[arg(long, value_enum)]
        direction: Direction,
        /// Expected receiver (incoming) or sender (outgoing)
        #[arg(long)]
        address: String,
        /// Expected amount in human units
        #[arg(long, conflicts_with = "nft_id", required_unless_present = "nft_id")]
        amount: Option<String>,
        /// Expected NFT mint
        #[arg(long)]
        nft_id: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Incoming,
    Outgoing,
}

impl From<Direction> for AssetDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Incoming => AssetDirection::Incoming,
            Direction::Outgoing => AssetDirection::Outgoing,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .compact()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let mut config = if cli.testnet {
        NetworkConfig::testnet()
    } else {
        NetworkConfig::mainnet()
    };
    if let Some(rpc_url) = cli.rpc_url {
        config = config.with_rpc_url(rpc_url);
    }
    let provider = Provider::initialize(config).context("failed to initialize provider")?;

    match cli.command {
        Commands::Status {
            signature,
            wait,
            interval_ms,
        } => {
            let tx = provider.transaction(&signature);
            let status = if wait {
                tx.wait(Duration::from_millis(interval_ms))
            } else {
                tx.status()?
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "id": tx.id(),
                    "status": status,
                    "url": tx.url(provider.node()),
                }))?
            );
        }
        Commands::Classify { signature } => {
            let tx = provider.transaction(&signature);
            let kind = tx.transaction_type()?;
            let fields = match kind {
                TransactionType::Coin => {
                    let tx = CoinTransaction::from(tx);
                    json!({
                        "sender": tx.sender()?,
                        "receiver": tx.receiver()?,
                        "amount": tx.amount()?.to_string(),
                    })
                }
                TransactionType::Token => {
                    let tx = TokenTransaction::from(tx);
                    json!({
                        "address": tx.address()?,
                        "sender": tx.sender()?,
                        "receiver": tx.receiver()?,
                        "amount": tx.amount()?.to_string(),
                    })
                }
                TransactionType::Nft => {
                    let tx = NftTransaction::from(tx);
                    json!({
                        "address": tx.address()?,
                        "sender": tx.sender()?,
                        "receiver": tx.receiver()?,
                        "nftId": tx.nft_id()?,
                    })
                }
                TransactionType::Contract => {
                    let address = ContractTransaction::from(tx).address()?;
                    json!({ "program": program_names::name(&address), "address": address })
                }
                TransactionType::General => json!({}),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "type": kind, "fields": fields }))?
            );
        }
        Commands::Verify {
            signature,
            direction,
            address,
            amount,
            nft_id,
        } => {
            let direction = AssetDirection::from(direction);
            let tx = provider.transaction(&signature);
            let status = match (nft_id, amount) {
                (Some(nft_id), _) => {
                    NftTransaction::from(tx).verify_transfer(direction, &address, &nft_id)
                }
                (None, Some(amount)) => {
                    let amount = Decimal::from_str(&amount)
                        .with_context(|| format!("invalid amount {amount}"))?;
                    if tx.transaction_type()? == TransactionType::Coin {
                        CoinTransaction::from(tx).verify_transfer(direction, &address, amount)
                    } else {
                        TokenTransaction::from(tx).verify_transfer(direction, &address, amount)
                    }
                }
                (None, None) => bail!("either --amount or --nft-id is required"),
            };
            println!("{}", serde_json::to_string_pretty(&json!({ "status": status }))?);
        }
    }

    Ok(())
}
