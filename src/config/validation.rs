//! Configuration validation.
//!
//! Serde handles syntax; this checks values: URLs parse, the registry
//! address is a 20-byte address, durations are non-zero and ordered.
//! All errors are returned, not just the first.

use alloy::primitives::Address;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{AgentConfig, MAX_TX_TIMEOUT_SECS};

/// One semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("proof.contract_address: invalid address '{0}'")]
    InvalidContractAddress(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{field} ({value}) exceeds the maximum of {max}")]
    TooLarge {
        field: &'static str,
        value: u64,
        max: u64,
    },

    #[error("proof.poll_interval_ms ({base}) exceeds proof.max_poll_interval_ms ({max})")]
    PollIntervalOrder { base: u64, max: u64 },

    #[error("observability.metrics_address: invalid socket address '{0}'")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration.
pub fn validate_config(config: &AgentConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.ledger.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "ledger.rpc_url",
            value: config.ledger.rpc_url.clone(),
        });
    }
    for url in &config.ledger.failover_urls {
        if url.parse::<url::Url>().is_err() {
            errors.push(ValidationError::InvalidUrl {
                field: "ledger.failover_urls",
                value: url.clone(),
            });
        }
    }
    if config.ledger.rpc_timeout_secs == 0 {
        errors.push(ValidationError::Zero("ledger.rpc_timeout_secs"));
    }

    let proof = &config.proof;
    if proof.contract_address.trim().parse::<Address>().is_err() {
        errors.push(ValidationError::InvalidContractAddress(
            proof.contract_address.clone(),
        ));
    }
    if proof.tx_timeout_secs == 0 {
        errors.push(ValidationError::Zero("proof.tx_timeout_secs"));
    }
    if proof.tx_timeout_secs > MAX_TX_TIMEOUT_SECS {
        errors.push(ValidationError::TooLarge {
            field: "proof.tx_timeout_secs",
            value: proof.tx_timeout_secs,
            max: MAX_TX_TIMEOUT_SECS,
        });
    }
    if proof.poll_interval_ms == 0 {
        errors.push(ValidationError::Zero("proof.poll_interval_ms"));
    }
    if proof.poll_interval_ms > proof.max_poll_interval_ms {
        errors.push(ValidationError::PollIntervalOrder {
            base: proof.poll_interval_ms,
            max: proof.max_poll_interval_ms,
        });
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            obs.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
