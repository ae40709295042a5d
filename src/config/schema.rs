//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the agent.
//! All types derive Serde traits for deserialization from config files.
//! The signing key is never part of the file; see
//! [`Credential::from_env`](crate::blockchain::Credential::from_env).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::blockchain::PollSchedule;

/// Largest accepted `proof.tx_timeout_secs` (one day).
pub const MAX_TX_TIMEOUT_SECS: u64 = 86_400;

/// Root configuration for the proof agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AgentConfig {
    /// Ledger RPC settings.
    pub ledger: LedgerConfig,

    /// Proof registry and submission settings.
    pub proof: ProofConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID the endpoint must report, checked at startup when set.
    pub expected_chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            expected_chain_id: None,
            rpc_timeout_secs: 10,
        }
    }
}

/// Proof submission configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProofConfig {
    /// Address of the proof registry contract.
    pub contract_address: String,

    /// Upper bound on one whole submission, in seconds.
    pub tx_timeout_secs: u64,

    /// First delay between receipt polls, in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum delay between receipt polls, in milliseconds.
    pub max_poll_interval_ms: u64,
}

impl ProofConfig {
    /// Submission timeout, clamped to [`MAX_TX_TIMEOUT_SECS`].
    pub fn tx_timeout(&self) -> Duration {
        Duration::from_secs(self.tx_timeout_secs.min(MAX_TX_TIMEOUT_SECS))
    }

    pub fn poll_schedule(&self) -> PollSchedule {
        PollSchedule {
            base: Duration::from_millis(self.poll_interval_ms),
            max: Duration::from_millis(self.max_poll_interval_ms),
        }
    }
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self {
            contract_address: String::new(),
            tx_timeout_secs: 60,
            poll_interval_ms: 1000,
            max_poll_interval_ms: 8000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
