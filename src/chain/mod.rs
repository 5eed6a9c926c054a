//! Chain-level primitives: network identity, address rules, denominations.

pub mod address;
pub mod denom;

use serde::{Deserialize, Serialize};

/// Target network for a transfer.
///
/// Serialized as the network's display name, which is also what the dialogue
/// echoes back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    #[serde(rename = "Celestia Mainnet Beta")]
    Mainnet,
    #[serde(rename = "Celestia Mocha Testnet")]
    Mocha,
}

impl NetworkId {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Mainnet => "Celestia Mainnet Beta",
            Self::Mocha => "Celestia Mocha Testnet",
        }
    }

    /// Registry key, matching the connect-configuration map.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "celestia",
            Self::Mocha => "mocha",
        }
    }

    /// Accepts registry keys, chain ids, display names, and the common
    /// user-facing keywords.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "celestia" | "mainnet" | "celestia mainnet beta" => Some(Self::Mainnet),
            "mocha" | "testnet" | "mocha-4" | "celestia mocha testnet" => Some(Self::Mocha),
            _ => None,
        }
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for NetworkId {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or(())
    }
}
