//! Conversational transfer dialogue: utterance parsing and the turn reducer.

pub mod extractor;
pub mod machine;

pub use machine::DialogueMachine;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chain::NetworkId;

/// Conversation phase for one dialogue session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Greeting,
    #[serde(rename = "waiting_network")]
    AwaitingNetwork,
    Confirming,
    Completed,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::Greeting
    }
}

impl ConversationState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::AwaitingNetwork => "waiting_network",
            Self::Confirming => "confirming",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "greeting" => Some(Self::Greeting),
            "waiting_network" => Some(Self::AwaitingNetwork),
            "confirming" => Some(Self::Confirming),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Transfer data discovered so far in one conversation.
///
/// Owned exclusively by that conversation's [`DialogueMachine`]; complete
/// once amount, address, and network are all present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferIntent {
    pub amount: Option<Decimal>,
    pub unit: Option<String>,
    pub address: Option<String>,
    pub network: Option<NetworkId>,
}

impl TransferIntent {
    pub fn is_complete(&self) -> bool {
        self.amount.is_some() && self.address.is_some() && self.network.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Finalized intent, serialized for execution and the dialogue's JSON echo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedIntent {
    pub address: String,
    pub network: NetworkId,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Signal emitted by the reducer when a turn requires outside work.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueAction {
    ExecuteTransfer(FinalizedIntent),
}

/// One dialogue turn's output: ordered bot lines, the resulting state, and
/// an optional action signal.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutput {
    pub messages: Vec<String>,
    pub state: ConversationState,
    pub action: Option<DialogueAction>,
}
