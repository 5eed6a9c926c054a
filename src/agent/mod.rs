//! Orchestration of dialogue, wallet session, and lifecycle tracking.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::chain::NetworkId;
use crate::config::SessionConfig;
use crate::dialogue::{
    ConversationState, DialogueAction, DialogueMachine, FinalizedIntent, TurnOutput,
};
use crate::error::{StoreError, WalletError};
use crate::ledger::{self, LifecycleTracker, TransferRecord, TransferStore};
use crate::wallet::{ClientConnector, SessionManager, Signer, WalletInfo};

/// One conversation's engine: dialogue reducer, wallet session, and
/// lifecycle tracker wired together.
///
/// Callers hold one agent per conversation id; nothing here is shared
/// across conversations, and a conversation's session is never visible to
/// another.
pub struct TransferAgent {
    machine: DialogueMachine,
    wallet: SessionManager,
    tracker: LifecycleTracker,
    memo: String,
}

impl TransferAgent {
    pub fn new(
        signer: Arc<dyn Signer>,
        connector: Arc<dyn ClientConnector>,
        store: Arc<dyn TransferStore>,
        config: SessionConfig,
    ) -> Self {
        let memo = config.memo.clone();
        Self {
            machine: DialogueMachine::new(),
            wallet: SessionManager::new(signer, connector, config),
            tracker: LifecycleTracker::new(store),
            memo,
        }
    }

    pub fn dialogue_state(&self) -> ConversationState {
        self.machine.state()
    }

    pub fn wallet_info(&self) -> WalletInfo {
        self.wallet.wallet_info()
    }

    /// Transfer history for the connected wallet, newest first.
    pub async fn transfer_history(&self) -> Result<Vec<TransferRecord>, StoreError> {
        let address = self
            .wallet
            .session()
            .map(|session| session.address.clone())
            .unwrap_or_default();
        self.tracker.history(&address).await
    }

    /// Process one user utterance. When the dialogue reaches confirmation
    /// the transfer executes inline and its outcome is appended to the bot
    /// lines; failures surface as messages, never as errors.
    pub async fn handle_message(&mut self, utterance: &str) -> Vec<String> {
        let TurnOutput {
            mut messages,
            action,
            ..
        } = self.machine.process(utterance);

        if let Some(DialogueAction::ExecuteTransfer(intent)) = action {
            match self.execute(&intent).await {
                Ok(outcome) => messages.extend(outcome),
                Err(wallet_error) => {
                    error!(%wallet_error, "transfer execution failed");
                    messages.push("Error en la transacción:".to_string());
                    messages.push(wallet_error.user_message());
                    messages.push("Escribe 'reset' para intentar otra transferencia".to_string());
                }
            }
        }

        messages
    }

    async fn execute(&mut self, intent: &FinalizedIntent) -> Result<Vec<String>, WalletError> {
        let network = intent.network;

        // Reconnect when disconnected or parked on the other network.
        let connected_to = self.wallet.session().map(|session| session.network);
        if connected_to != Some(network) {
            self.wallet.switch_chain(network).await?;
        }
        let sender = self
            .wallet
            .session()
            .map(|session| session.address.clone())
            .ok_or(WalletError::NotConnected)?;

        let record_id = self.begin_record(&sender, intent).await;
        if let Some(id) = record_id
            && let Err(store_error) = self.tracker.advance(id).await
        {
            warn!(%store_error, "could not mark transfer record in progress");
        }

        // The unit steers the send denomination; mocha is denominated like
        // TIA but selects the testnet.
        let unit = if network == NetworkId::Mocha { "mocha" } else { "TIA" };

        match self
            .wallet
            .send_tokens(&intent.address, intent.amount, unit, &self.memo)
            .await
        {
            Ok(receipt) => {
                let link = ledger::verification_link(network, &receipt.tx_hash);
                if let Some(id) = record_id
                    && let Err(store_error) = self.tracker.complete(id, link.clone()).await
                {
                    warn!(%store_error, "could not mark transfer record completed");
                }
                info!(tx_hash = %receipt.tx_hash, gas_used = receipt.gas_used, "transfer completed");

                Ok(vec![
                    "¡Transacción exitosa!".to_string(),
                    format!("Hash: {}", receipt.tx_hash),
                    format!("Verificación: {link}"),
                    String::new(),
                    "¿Te gustaría realizar otra transferencia? Escribe 'reset'".to_string(),
                ])
            }
            Err(wallet_error) => {
                // Never leave the record stuck in progreso.
                if let Some(id) = record_id
                    && let Err(store_error) = self.tracker.fail(id).await
                {
                    warn!(%store_error, "could not revert transfer record to pendiente");
                }
                Err(wallet_error)
            }
        }
    }

    /// Store failures are logged and skipped: persistence never blocks the
    /// on-chain send.
    async fn begin_record(&self, sender: &str, intent: &FinalizedIntent) -> Option<Uuid> {
        match self
            .tracker
            .begin(sender, &intent.address, intent.amount)
            .await
        {
            Ok(id) => Some(id),
            Err(store_error) => {
                warn!(%store_error, "transfer record could not be persisted, continuing with send");
                None
            }
        }
    }
}
