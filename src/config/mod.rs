//! Configuration for the assistant.
//!
//! Values resolve with priority: env var > built-in default. The network
//! registry itself is static; only session tuning is overridable.

pub(crate) mod helpers;
mod networks;

pub use networks::{GasPriceSteps, NetworkConfig, network_config};

use std::time::Duration;

use crate::error::ConfigError;
use helpers::{optional_env, parse_env};

/// Wallet session tuning.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Bound on each individual RPC endpoint connection attempt.
    pub endpoint_timeout: Duration,
    /// Flat transfer fee in `utia`.
    pub fee_base_units: u64,
    /// Fixed gas limit for bank send transactions.
    pub gas_limit: u64,
    /// Memo attached to outgoing transfers.
    pub memo: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint_timeout: Duration::from_secs(5),
            fee_base_units: 1_000,
            gas_limit: 100_000,
            memo: "Sent via Celestia Chatbot Assistant".to_string(),
        }
    }
}

impl SessionConfig {
    /// Resolve from the environment, falling back to defaults.
    pub fn resolve() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(ms) = parse_env::<u64>("ASSISTANT_ENDPOINT_TIMEOUT_MS")? {
            config.endpoint_timeout = Duration::from_millis(ms);
        }
        if let Some(fee) = parse_env::<u64>("ASSISTANT_FEE_UTIA")? {
            config.fee_base_units = fee;
        }
        if let Some(gas) = parse_env::<u64>("ASSISTANT_GAS_LIMIT")? {
            config.gas_limit = gas;
        }
        if let Some(memo) = optional_env("ASSISTANT_TX_MEMO")? {
            config.memo = memo;
        }

        Ok(config)
    }
}
