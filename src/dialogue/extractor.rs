//! Free-text utterance parsing into a partial transfer intent.
//!
//! Recognition is gated on an action keyword; without one the utterance is
//! not a transfer request and the extractor returns an empty result. Fields
//! are only ever filled from what the text actually contains.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::chain::NetworkId;
use crate::chain::address::is_valid_celestia_address;

/// Action keywords that gate transfer recognition (case-insensitive
/// substring match).
const ACTION_KEYWORDS: &[&str] = &["enviar", "send", "mandar"];

static AMOUNT_TIA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*TIA").expect("amount pattern"));
static AMOUNT_MOCHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*mocha").expect("amount pattern"));
static ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)celestia1[a-z0-9]{38,58}").expect("address pattern"));

/// Partial result of parsing one utterance. No field is invented when
/// absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedUtterance {
    pub has_transfer: bool,
    pub amount: Option<Decimal>,
    pub unit: Option<&'static str>,
    pub address: Option<String>,
    pub network: Option<NetworkId>,
}

/// Parse one free-text utterance. Deterministic: the same input always
/// yields the same output.
pub fn extract(utterance: &str) -> ParsedUtterance {
    let mut result = ParsedUtterance::default();
    let lowered = utterance.to_lowercase();

    if !ACTION_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return result;
    }
    result.has_transfer = true;

    // The two amount patterns are mutually exclusive: first match wins.
    if let Some(captures) = AMOUNT_TIA.captures(utterance) {
        result.amount = captures
            .get(1)
            .and_then(|m| Decimal::from_str(m.as_str()).ok());
        result.unit = Some("TIA");
    } else if let Some(captures) = AMOUNT_MOCHA.captures(utterance) {
        result.amount = captures
            .get(1)
            .and_then(|m| Decimal::from_str(m.as_str()).ok());
        result.unit = Some("mocha");
        // The testnet alias decides the network before keyword detection.
        result.network = Some(NetworkId::Mocha);
    }

    if let Some(m) = ADDRESS.find(utterance) {
        let candidate = m.as_str();
        if is_valid_celestia_address(candidate) {
            result.address = Some(candidate.to_string());
        }
    }

    // Keyword-based network detection only runs when the unit did not
    // already imply one.
    if result.network.is_none() {
        if lowered.contains("mainnet") || lowered.contains("main") {
            result.network = Some(NetworkId::Mainnet);
        } else if lowered.contains("mocha") || lowered.contains("testnet") {
            result.network = Some(NetworkId::Mocha);
        }
    }

    result
}
