//! Turn-by-turn dialogue reducer for one conversation.
//!
//! The machine is a pure, synchronous reducer over
//! `(state, intent, utterance)`: every input produces at least one bot
//! line, the reset keyword works from any state, and the execute signal is
//! only ever emitted on the single `Confirming -> Completed` transition.

use tracing::debug;

use crate::chain::NetworkId;

use super::extractor::{self, ParsedUtterance};
use super::{ConversationState, DialogueAction, FinalizedIntent, TransferIntent, TurnOutput};

/// Restarts the conversation from any state.
const RESET_KEYWORD: &str = "reset";

/// Confirms a staged transfer.
const CONFIRM_KEYWORD: &str = "confirmo";

/// One conversation's dialogue state and accumulated intent.
///
/// Callers hold one machine per conversation; there is no shared state.
#[derive(Debug, Default)]
pub struct DialogueMachine {
    state: ConversationState,
    intent: TransferIntent,
}

impl DialogueMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn intent(&self) -> &TransferIntent {
        &self.intent
    }

    /// Consume one utterance. Total: every `(state, utterance)` pair takes
    /// exactly one transition and yields a non-empty message list.
    pub fn process(&mut self, utterance: &str) -> TurnOutput {
        debug!(state = self.state.as_str(), utterance, "dialogue turn");

        let lowered = utterance.to_lowercase();
        if lowered.contains(RESET_KEYWORD) {
            return self.reset();
        }

        match self.state {
            ConversationState::Greeting => self.handle_greeting(utterance),
            ConversationState::AwaitingNetwork => self.handle_network_selection(utterance, &lowered),
            ConversationState::Confirming => self.handle_confirmation(&lowered),
            ConversationState::Completed => self.output(
                vec![
                    "La transferencia anterior ya está finalizada.".to_string(),
                    "Escribe 'reset' para iniciar otra transferencia.".to_string(),
                ],
                None,
            ),
        }
    }

    fn reset(&mut self) -> TurnOutput {
        self.intent.clear();
        self.state = ConversationState::Greeting;
        self.output(
            vec!["Empecemos de nuevo. ¡Hola! ¿Qué transferencia quieres hacer?".to_string()],
            None,
        )
    }

    fn handle_greeting(&mut self, utterance: &str) -> TurnOutput {
        let parsed = extractor::extract(utterance);
        if !parsed.has_transfer {
            return self.output(
                vec![
                    "¡Hola! Puedo ayudarte a enviar tokens en Celestia. Ejemplos:".to_string(),
                    "'Enviar 0.01 TIA a celestia1... en mainnet'".to_string(),
                    "'Enviar 0.1 mocha a celestia1...'".to_string(),
                ],
                None,
            );
        }

        let ParsedUtterance {
            amount: Some(amount),
            address: Some(address),
            ..
        } = parsed.clone()
        else {
            return self.output(
                vec![
                    "Datos incompletos. Necesito el monto y la dirección de destino.".to_string(),
                    "Ejemplo: 'Enviar 0.01 TIA a celestia1... en mainnet'".to_string(),
                ],
                None,
            );
        };

        self.intent.amount = Some(amount);
        self.intent.address = Some(address);
        self.intent.unit = parsed.unit.map(str::to_string);

        match parsed.network {
            Some(network) => {
                self.intent.network = Some(network);
                self.stage_confirmation()
            }
            None => {
                self.state = ConversationState::AwaitingNetwork;
                self.output(
                    vec![
                        "Datos recibidos:".to_string(),
                        format!("Monto: {amount} TIA"),
                        format!(
                            "Dirección: {}",
                            abbreviate(self.intent.address.as_deref().unwrap_or_default())
                        ),
                        String::new(),
                        "¿En qué red?".to_string(),
                        "1. Celestia Mainnet Beta".to_string(),
                        "2. Celestia Mocha Testnet".to_string(),
                        String::new(),
                        "Responde 1 o 2".to_string(),
                    ],
                    None,
                )
            }
        }
    }

    fn handle_network_selection(&mut self, utterance: &str, lowered: &str) -> TurnOutput {
        let trimmed = utterance.trim();
        let network = if trimmed == "1" || lowered.contains("mainnet") {
            Some(NetworkId::Mainnet)
        } else if trimmed == "2" || lowered.contains("mocha") {
            Some(NetworkId::Mocha)
        } else {
            None
        };

        match network {
            Some(network) => {
                self.intent.network = Some(network);
                self.stage_confirmation()
            }
            None => self.output(
                vec!["Responde 1 para Mainnet o 2 para Mocha Testnet".to_string()],
                None,
            ),
        }
    }

    fn handle_confirmation(&mut self, lowered: &str) -> TurnOutput {
        if lowered.contains(CONFIRM_KEYWORD)
            && let Some(finalized) = self.finalized_intent()
        {
            self.state = ConversationState::Completed;
            return self.output(
                vec![
                    "Transacción confirmada y lista para enviar.".to_string(),
                    "Conectando con el wallet...".to_string(),
                ],
                Some(DialogueAction::ExecuteTransfer(finalized)),
            );
        }

        self.output(
            vec!["Escribe 'confirmo' para proceder o 'reset' para cancelar".to_string()],
            None,
        )
    }

    /// Move to `Confirming`, echoing the staged intent as JSON.
    fn stage_confirmation(&mut self) -> TurnOutput {
        let Some(finalized) = self.finalized_intent() else {
            // Unreachable while callers only stage complete intents; stay
            // total anyway.
            return self.output(
                vec!["Datos incompletos. Escribe 'reset' para empezar de nuevo.".to_string()],
                None,
            );
        };

        self.state = ConversationState::Confirming;
        let json = serde_json::to_string_pretty(&finalized).unwrap_or_else(|_| "{}".to_string());

        self.output(
            vec![
                "Transacción detectada:".to_string(),
                format!("Monto: {} TIA", finalized.amount),
                format!("Red: {}", finalized.network.display_name()),
                format!("Destino: {}", abbreviate(&finalized.address)),
                String::new(),
                "JSON generado:".to_string(),
                "```json".to_string(),
                json,
                "```".to_string(),
                String::new(),
                "Escribe 'confirmo' para proceder".to_string(),
            ],
            None,
        )
    }

    fn finalized_intent(&self) -> Option<FinalizedIntent> {
        Some(FinalizedIntent {
            address: self.intent.address.clone()?,
            network: self.intent.network?,
            currency: "TIA".to_string(),
            amount: self.intent.amount?,
        })
    }

    fn output(&self, messages: Vec<String>, action: Option<DialogueAction>) -> TurnOutput {
        TurnOutput {
            messages,
            state: self.state,
            action,
        }
    }
}

fn abbreviate(address: &str) -> String {
    match address.get(..12) {
        Some(head) => format!("{head}..."),
        None => address.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const ADDR_A: &str = "celestia1uaclygpvytqwdvmrtjskyq0087az3v5wdedn7k";
    const ADDR_B: &str = "celestia1qnk2n4nlkpw9xfqntladh74w6ujtulwnmxnh3k";

    #[test]
    fn full_request_stages_confirmation() {
        let mut machine = DialogueMachine::new();
        let turn = machine.process(&format!("enviar 0.01 TIA a {ADDR_A} en mainnet"));

        assert_eq!(turn.state, ConversationState::Confirming);
        assert_eq!(turn.action, None);
        assert_eq!(machine.intent().amount, Some(dec!(0.01)));
        assert_eq!(machine.intent().address.as_deref(), Some(ADDR_A));
        assert_eq!(machine.intent().network, Some(NetworkId::Mainnet));
        assert!(turn.messages.iter().any(|m| m.contains("confirmo")));
    }

    #[test]
    fn missing_network_waits_then_resolves_by_index() {
        let mut machine = DialogueMachine::new();
        let turn = machine.process(&format!("enviar 5 TIA a {ADDR_B}"));
        assert_eq!(turn.state, ConversationState::AwaitingNetwork);

        let turn = machine.process("2");
        assert_eq!(turn.state, ConversationState::Confirming);
        assert_eq!(machine.intent().network, Some(NetworkId::Mocha));
    }

    #[test]
    fn network_selection_accepts_keywords_and_reprompts_otherwise() {
        let mut machine = DialogueMachine::new();
        machine.process(&format!("enviar 5 TIA a {ADDR_B}"));

        let turn = machine.process("ni idea");
        assert_eq!(turn.state, ConversationState::AwaitingNetwork);
        assert!(!turn.messages.is_empty());

        let turn = machine.process("mainnet por favor");
        assert_eq!(turn.state, ConversationState::Confirming);
        assert_eq!(machine.intent().network, Some(NetworkId::Mainnet));
    }

    #[test]
    fn confirmation_emits_execute_signal_once() {
        let mut machine = DialogueMachine::new();
        machine.process(&format!("enviar 0.01 TIA a {ADDR_A} en mainnet"));
        let turn = machine.process("confirmo");

        assert_eq!(turn.state, ConversationState::Completed);
        match turn.action {
            Some(DialogueAction::ExecuteTransfer(intent)) => {
                assert_eq!(intent.address, ADDR_A);
                assert_eq!(intent.network, NetworkId::Mainnet);
                assert_eq!(intent.currency, "TIA");
                assert_eq!(intent.amount, dec!(0.01));
            }
            other => panic!("expected execute signal, got {other:?}"),
        }

        // Further turns never re-emit the signal or touch the intent.
        let before = machine.intent().clone();
        let turn = machine.process("confirmo");
        assert_eq!(turn.action, None);
        assert_eq!(machine.intent(), &before);
    }

    #[test]
    fn anything_else_while_confirming_reprompts() {
        let mut machine = DialogueMachine::new();
        machine.process(&format!("enviar 0.01 TIA a {ADDR_A} en mainnet"));
        let turn = machine.process("mejor mañana");

        assert_eq!(turn.state, ConversationState::Confirming);
        assert!(turn.messages.iter().any(|m| m.contains("confirmo")));
    }

    #[test]
    fn reset_is_universal() {
        let stimuli: [&dyn Fn(&mut DialogueMachine); 4] = [
            &|_machine| {},
            &|machine| {
                machine.process(&format!("enviar 5 TIA a {ADDR_B}"));
            },
            &|machine| {
                machine.process(&format!("enviar 0.01 TIA a {ADDR_A} en mainnet"));
            },
            &|machine| {
                machine.process(&format!("enviar 0.01 TIA a {ADDR_A} en mainnet"));
                machine.process("confirmo");
            },
        ];

        for prepare in stimuli {
            let mut machine = DialogueMachine::new();
            prepare(&mut machine);
            let turn = machine.process("reset");
            assert_eq!(turn.state, ConversationState::Greeting);
            assert_eq!(machine.intent(), &TransferIntent::default());
            assert!(!turn.messages.is_empty());
        }
    }

    #[test]
    fn every_state_answers_arbitrary_input() {
        let junk = "qwerty 123 !!";

        let mut greeting = DialogueMachine::new();
        assert!(!greeting.process(junk).messages.is_empty());

        let mut waiting = DialogueMachine::new();
        waiting.process(&format!("enviar 5 TIA a {ADDR_B}"));
        assert!(!waiting.process(junk).messages.is_empty());

        let mut confirming = DialogueMachine::new();
        confirming.process(&format!("enviar 0.01 TIA a {ADDR_A} en mainnet"));
        assert!(!confirming.process(junk).messages.is_empty());

        let mut completed = DialogueMachine::new();
        completed.process(&format!("enviar 0.01 TIA a {ADDR_A} en mainnet"));
        completed.process("confirmo");
        assert!(!completed.process(junk).messages.is_empty());
    }

    #[test]
    fn partial_greeting_input_keeps_state_and_intent() {
        let mut machine = DialogueMachine::new();
        let turn = machine.process("enviar 5 TIA");
        assert_eq!(turn.state, ConversationState::Greeting);
        assert_eq!(machine.intent(), &TransferIntent::default());
    }

    #[test]
    fn intent_json_round_trips() {
        let mut machine = DialogueMachine::new();
        machine.process(&format!("enviar 0.01 TIA a {ADDR_A} en mainnet"));
        let turn = machine.process("confirmo");

        let Some(DialogueAction::ExecuteTransfer(intent)) = turn.action else {
            panic!("expected execute signal");
        };
        let encoded = serde_json::to_string(&intent).expect("intent serializes");
        assert!(encoded.contains("\"amount\":\"0.01\""));
        assert!(encoded.contains("\"network\":\"Celestia Mainnet Beta\""));

        let decoded: FinalizedIntent = serde_json::from_str(&encoded).expect("intent parses");
        assert_eq!(decoded, intent);
    }
}
