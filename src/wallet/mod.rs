//! Wallet signer sessions, RPC endpoint failover, and the token transfer
//! surface.
//!
//! The browser wallet extension and the chain transport stay behind traits:
//! [`Signer`] is the opaque signing capability, [`ClientConnector`] dials
//! one endpoint, and [`ChainClient`] is the connected query/broadcast
//! handle. The crate never implements signing itself.

pub mod connectivity;
mod session;

pub use connectivity::{EndpointHealth, EndpointState, probe_endpoint, probe_endpoints};
pub use session::{SessionManager, WalletInfo, WalletSession};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::NetworkConfig;
use crate::error::WalletError;

/// A token amount in a concrete denomination, as the chain encodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u64) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }
}

/// Fixed fee envelope attached to a bank send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fee {
    pub amount: Coin,
    pub gas_limit: u64,
}

/// Broadcast outcome for a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub tx_hash: String,
    pub height: u64,
    pub gas_used: u64,
    pub gas_wanted: u64,
}

/// Signer account exposed by the wallet extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub address: String,
}

/// Opaque signing capability provided by the browser wallet extension.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Whether the extension is present at all.
    async fn is_available(&self) -> bool;

    /// Register the chain's parameters with the signer.
    ///
    /// Callers treat failure as non-fatal: some signers pre-register the
    /// supported chains.
    async fn suggest_chain(&self, config: &NetworkConfig) -> Result<(), WalletError>;

    /// Request user approval for the chain.
    async fn enable(&self, chain_id: &str) -> Result<(), WalletError>;

    /// Accounts the signer exposes for the chain.
    async fn accounts(&self, chain_id: &str) -> Result<Vec<Account>, WalletError>;
}

/// A client bound to one RPC endpoint, able to query and broadcast through
/// the signer it was connected with.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn balance(&self, address: &str, denom: &str) -> Result<Coin, WalletError>;

    async fn send_tokens(
        &self,
        from: &str,
        to: &str,
        amount: &Coin,
        fee: &Fee,
        memo: &str,
    ) -> Result<SendReceipt, WalletError>;
}

/// Dials one endpoint and yields a connected client.
#[async_trait]
pub trait ClientConnector: Send + Sync {
    async fn connect(
        &self,
        endpoint: &str,
        config: &NetworkConfig,
    ) -> Result<Box<dyn ChainClient>, WalletError>;
}
