//! Static connect configuration for the supported Celestia networks.
//!
//! Endpoint lists are fixed priority orders: `connect` tries them top to
//! bottom and always restarts from the top on a fresh attempt. There is no
//! health-based reordering.

use crate::chain::NetworkId;

/// Three-tier gas price schedule in `utia` per gas unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasPriceSteps {
    pub low: f64,
    pub average: f64,
    pub high: f64,
}

/// Connect parameters for one network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkConfig {
    pub chain_id: &'static str,
    pub display_name: &'static str,
    pub bech32_prefix: &'static str,
    pub base_denom: &'static str,
    pub display_denom: &'static str,
    pub decimals: u32,
    pub gas_price_steps: GasPriceSteps,
    /// RPC endpoints in failover priority order.
    pub rpc_endpoints: &'static [&'static str],
    pub explorer_host: &'static str,
    pub explorer_slug: &'static str,
}

const MAINNET: NetworkConfig = NetworkConfig {
    chain_id: "celestia",
    display_name: "Celestia Mainnet Beta",
    bech32_prefix: "celestia",
    base_denom: "utia",
    display_denom: "TIA",
    decimals: 6,
    gas_price_steps: GasPriceSteps {
        low: 0.01,
        average: 0.025,
        high: 0.04,
    },
    rpc_endpoints: &[
        "https://celestia-mainnet-rpc.itrocket.net:443",
        "https://celestia-rpc.chainode.tech:33373",
        "https://celestia.rpc.kjnodes.com",
        "https://public-celestia-rpc.numia.xyz",
        "https://rpc.celestia.pops.one",
    ],
    explorer_host: "www.mintscan.io",
    explorer_slug: "celestia",
};

const MOCHA: NetworkConfig = NetworkConfig {
    chain_id: "mocha-4",
    display_name: "Celestia Mocha Testnet",
    bech32_prefix: "celestia",
    base_denom: "utia",
    display_denom: "TIA",
    decimals: 6,
    gas_price_steps: GasPriceSteps {
        low: 0.1,
        average: 0.25,
        high: 0.4,
    },
    rpc_endpoints: &[
        "https://celestia-testnet-rpc.itrocket.net:443",
        "https://testnet-celestia-rpc.lavenderfive.com:443",
        "https://rpc-celestia-mocha-4.mesa.newmetric.xyz",
        "https://rpc.celestia-mocha-4.com",
        "https://rpc-mocha.pops.one",
    ],
    explorer_host: "testnet.mintscan.io",
    explorer_slug: "celestia-testnet",
};

/// Connect configuration for `network`. Total over [`NetworkId`].
pub fn network_config(network: NetworkId) -> &'static NetworkConfig {
    match network {
        NetworkId::Mainnet => &MAINNET,
        NetworkId::Mocha => &MOCHA,
    }
}
