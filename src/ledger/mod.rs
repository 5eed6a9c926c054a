//! Transfer lifecycle records and the tracker that owns their transitions.
//!
//! Records live in an external store reached through [`TransferStore`];
//! status only ever changes through the tracker's three transition
//! operations, never by writing a record directly.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chain::NetworkId;
use crate::config::network_config;
use crate::error::StoreError;

/// Lifecycle state, stored with the external store's Spanish labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "progreso")]
    InProgress,
    #[serde(rename = "completado")]
    Completed,
}

impl TransferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::InProgress => "progreso",
            Self::Completed => "completado",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pendiente" => Some(Self::Pending),
            "progreso" => Some(Self::InProgress),
            "completado" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::str::FromStr for TransferStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or(())
    }
}

/// Persisted row tracking one transfer from initiation to confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: Uuid,
    #[serde(rename = "wallet_emisor")]
    pub sender: String,
    #[serde(rename = "wallet_receptor")]
    pub receiver: String,
    #[serde(rename = "estado")]
    pub status: TransferStatus,
    #[serde(rename = "monto", with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(rename = "fecha")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "link_verificacion")]
    pub verification_link: Option<String>,
}

/// External persistence surface for transfer records.
#[async_trait]
pub trait TransferStore: Send + Sync {
    async fn insert(&self, record: &TransferRecord) -> Result<(), StoreError>;

    /// Update a record's status; the verification link is only overwritten
    /// when one is supplied.
    async fn update_status(
        &self,
        id: Uuid,
        status: TransferStatus,
        verification_link: Option<String>,
    ) -> Result<(), StoreError>;

    async fn by_id(&self, id: Uuid) -> Result<Option<TransferRecord>, StoreError>;

    /// Records where the wallet is sender or receiver, newest first.
    async fn by_wallet(&self, address: &str) -> Result<Vec<TransferRecord>, StoreError>;
}

/// Drives a record through `pendiente -> progreso -> completado`.
pub struct LifecycleTracker {
    store: Arc<dyn TransferStore>,
}

impl LifecycleTracker {
    pub fn new(store: Arc<dyn TransferStore>) -> Self {
        Self { store }
    }

    /// Record a freshly initiated transfer as `pendiente`.
    pub async fn begin(
        &self,
        sender: &str,
        receiver: &str,
        amount: Decimal,
    ) -> Result<Uuid, StoreError> {
        let record = TransferRecord {
            id: Uuid::new_v4(),
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            status: TransferStatus::Pending,
            amount,
            created_at: Utc::now(),
            verification_link: None,
        };
        self.store.insert(&record).await?;
        info!(id = %record.id, "transfer recorded as pendiente");
        Ok(record.id)
    }

    /// Mark the record `progreso` just before the signed call is submitted.
    pub async fn advance(&self, id: Uuid) -> Result<(), StoreError> {
        self.store
            .update_status(id, TransferStatus::InProgress, None)
            .await
    }

    /// Mark the record `completado` and attach its explorer link.
    pub async fn complete(&self, id: Uuid, verification_link: String) -> Result<(), StoreError> {
        self.store
            .update_status(id, TransferStatus::Completed, Some(verification_link))
            .await
    }

    /// Revert a failed attempt to `pendiente`.
    ///
    /// Failures are deliberately not a terminal state: a pending record
    /// means "still awaiting a successful attempt", whether or not one was
    /// already tried. Never leaves a record stuck in `progreso`.
    pub async fn fail(&self, id: Uuid) -> Result<(), StoreError> {
        self.store
            .update_status(id, TransferStatus::Pending, None)
            .await
    }

    /// Transfer history for one wallet, newest first.
    pub async fn history(&self, address: &str) -> Result<Vec<TransferRecord>, StoreError> {
        self.store.by_wallet(address).await
    }

    pub async fn record(&self, id: Uuid) -> Result<Option<TransferRecord>, StoreError> {
        self.store.by_id(id).await
    }
}

/// Explorer link for a broadcast transaction on `network`.
pub fn verification_link(network: NetworkId, tx_hash: &str) -> String {
    let config = network_config(network);
    format!(
        "https://{}/{}/txs/{}",
        config.explorer_host, config.explorer_slug, tx_hash
    )
}

/// `celestia1ab…cdef12` style abbreviation for display surfaces.
pub fn abbreviate_address(address: &str) -> String {
    if address.len() <= 16 {
        return address.to_string();
    }
    format!(
        "{}...{}",
        &address[..10],
        &address[address.len() - 6..]
    )
}

/// Six-decimal display formatting for TIA amounts.
pub fn format_amount(amount: Decimal) -> String {
    format!("{amount:.6}")
}
