//! Signing credential and per-submission transaction options.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized
//! - Options are derived per submission and never shared between tasks

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use std::sync::Arc;

use crate::blockchain::client::LedgerClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "REPLICA_AGENT_PRIVATE_KEY";

/// Raw hex-encoded signing credential.
///
/// The key is only parsed when options are derived, so a malformed key
/// surfaces as an authorization failure of the submission using it.
#[derive(Clone)]
pub struct Credential {
    key_hex: Arc<str>,
}

impl Credential {
    /// Wrap a hex string (with or without 0x prefix).
    pub fn from_hex(private_key_hex: &str) -> Self {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);
        Self {
            key_hex: Arc::from(key_hex),
        }
    }

    /// Load the credential from environment variable.
    ///
    /// Reads `REPLICA_AGENT_PRIVATE_KEY` from environment.
    pub fn from_env() -> BlockchainResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            BlockchainError::Wallet(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Ok(Self::from_hex(&private_key))
    }

    /// Derive the signing key.
    pub fn signer(&self) -> BlockchainResult<PrivateKeySigner> {
        self.key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))
    }

    /// Address of the signing key.
    pub fn address(&self) -> BlockchainResult<Address> {
        Ok(self.signer()?.address())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential").field("key", &"<redacted>").finish()
    }
}

/// Transaction options scoped to one submission on one chain.
#[derive(Debug, Clone)]
pub struct TransactOpts {
    signer: PrivateKeySigner,
    chain_id: ChainId,
}

impl TransactOpts {
    /// Scope a signer to a chain ID for EIP-155 replay protection.
    ///
    /// Chain ID 0 cannot be signed for and is rejected.
    pub fn new(signer: PrivateKeySigner, chain_id: ChainId) -> BlockchainResult<Self> {
        if chain_id.0 == 0 {
            return Err(BlockchainError::InvalidChainId(chain_id.0));
        }

        Ok(Self {
            signer: signer.with_chain_id(Some(chain_id.0)),
            chain_id,
        })
    }

    /// Sender address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Chain the options are scoped to.
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// The chain-scoped signer.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

/// Derive transaction options for the chain the ledger client is connected to.
pub async fn authorize(
    credential: &Credential,
    client: &dyn LedgerClient,
) -> BlockchainResult<TransactOpts> {
    let signer = credential.signer()?;
    let address = signer.address();

    let chain_id = client.chain_id().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to query chain ID for transaction options");
        e
    })?;

    let opts = TransactOpts::new(signer, chain_id)?;

    tracing::debug!(
        address = %address,
        chain_id = chain_id.0,
        "Transaction options derived"
    );

    Ok(opts)
}
