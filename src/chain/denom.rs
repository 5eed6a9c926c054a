//! Unit normalization to the `utia` base denomination.
//!
//! Every recognized display unit scales by 10^6, including the `mocha`
//! testnet alias, which is denominated identically to TIA. Unrecognized
//! units fall back to the same scale rather than erroring, so the transfer
//! flow never blocks on a unit typo; the fallback is reported through
//! `unit_kind` and a warning log.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use tracing::warn;

/// Smallest indivisible denomination.
pub const BASE_DENOM: &str = "utia";

/// Display denomination shown to users.
pub const DISPLAY_DENOM: &str = "TIA";

/// Decimal places between the display unit and the base unit.
pub const DECIMALS: u32 = 6;

/// How a unit string was classified during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// `TIA` or the `mocha` testnet alias; scaled by 10^6.
    Display,
    /// Already in `utia`.
    Base,
    /// Not recognized; treated as a display unit.
    Unknown,
}

/// A display amount converted to base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAmount {
    pub denom: String,
    pub base_units: u64,
    pub unit_kind: UnitKind,
}

pub fn classify_unit(unit: &str) -> UnitKind {
    match unit.trim().to_ascii_lowercase().as_str() {
        "tia" | "mocha" => UnitKind::Display,
        "utia" => UnitKind::Base,
        _ => UnitKind::Unknown,
    }
}

/// Convert `amount` expressed in `unit` into whole `utia` base units.
///
/// Truncates toward zero; never rounds up, so the wallet can never send
/// more than the user asked for.
pub fn normalize_amount(amount: Decimal, unit: &str) -> NormalizedAmount {
    let unit_kind = classify_unit(unit);
    let scaled = match unit_kind {
        UnitKind::Base => amount,
        UnitKind::Display => amount * dec!(1_000_000),
        UnitKind::Unknown => {
            warn!(unit, "unrecognized unit, assuming display denomination");
            amount * dec!(1_000_000)
        }
    };

    NormalizedAmount {
        denom: BASE_DENOM.to_string(),
        base_units: scaled.trunc().to_u64().unwrap_or(0),
        unit_kind,
    }
}
