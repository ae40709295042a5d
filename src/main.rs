//! Block replica proof agent CLI.
//!
//! ```text
//! config file ──▶ AgentConfig ──▶ logging / metrics
//!                     │
//! env private key ──▶ Credential
//!                     │
//! result file ──▶ ResultSegment ──▶ ProofSubmitter ──▶ registry contract
//!                                        │
//!                                        ▼
//!                              tx hash (or failure exit)
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use alloy::primitives::B256;
use replica_proof_agent::blockchain::{Credential, LedgerClient, RpcLedgerClient};
use replica_proof_agent::config::validation::validate_config;
use replica_proof_agent::config::{load_config, AgentConfig, ConfigError};
use replica_proof_agent::observability::{logging, metrics};
use replica_proof_agent::proof::{digest, ProofRequest, ProofSubmitter};
use replica_proof_agent::replica::{BlockReplica, BlockResult, ResultSegment};

#[derive(Parser)]
#[command(name = "replica-agent")]
#[command(about = "Submit block replica proofs to the proof registry", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the address of the signing key
    Address,
    /// Print the chain ID reported by the ledger
    ChainId,
    /// Print the proof digest of a block result file
    Digest {
        /// Block result JSON file.
        #[arg(short, long)]
        result: PathBuf,
    },
    /// Submit a proof for a block result and wait for it to be mined
    Submit {
        /// Block result JSON file.
        #[arg(short, long)]
        result: PathBuf,
        /// Network the replica was taken from.
        #[arg(long)]
        network_id: u64,
        /// Block hash, defaults to the hash recorded in the result file.
        #[arg(long)]
        block_hash: Option<B256>,
        /// Chain height to file the proof at.
        #[arg(long)]
        chain_height: u64,
        /// Length of the processed chain segment.
        #[arg(long, default_value_t = 1)]
        chain_length: u64,
        /// Where the replica can be retrieved.
        #[arg(long)]
        replica_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AgentConfig::default(),
    };

    logging::init(&config.observability)?;
    tracing::info!("replica-agent v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    match cli.command {
        Commands::Address => {
            let credential = Credential::from_env()?;
            println!("{}", credential.address()?);
        }
        Commands::ChainId => {
            let client = RpcLedgerClient::new(config.ledger.clone()).await?;
            println!("{}", client.chain_id().await?);
        }
        Commands::Digest { result } => {
            let segment = read_result(&result)?.1;
            println!("{}", digest(&segment)?);
        }
        Commands::Submit {
            result,
            network_id,
            block_hash,
            chain_height,
            chain_length,
            replica_url,
        } => {
            validate_config(&config).map_err(ConfigError::Validation)?;

            let credential = Credential::from_env()?;
            let client = RpcLedgerClient::new(config.ledger.clone()).await?;
            let submitter = ProofSubmitter::new(Arc::new(client), credential, config.proof.clone());

            let (block_result, segment) = read_result(&result)?;
            let mut replica = BlockReplica::from_block_result(network_id, &block_result);
            if let Some(hash) = block_hash {
                replica.hash = hash;
            }

            let request = ProofRequest::new(replica, chain_height, segment, replica_url)
                .with_chain_length(chain_length);

            let outcome = submitter.spawn(request).recv().await;
            if !outcome.is_success() {
                return Err("proof submission failed, see logs".into());
            }
            println!("{}", outcome);
        }
    }

    Ok(())
}

fn read_result(path: &Path) -> Result<(BlockResult, ResultSegment), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    let block_result = BlockResult::from_json(&bytes)?;
    Ok((block_result, ResultSegment::new(bytes)))
}
