//! RPC endpoint reachability probes for operator diagnostics.
//!
//! Separate from the connect failover path: probes report on every endpoint
//! in a network's list instead of stopping at the first success, so an
//! operator can see the whole picture before pointing users at a network.

use std::error::Error as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::NetworkId;
use crate::config::network_config;

/// Typed reachability state for one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointState {
    Reachable,
    InvalidUrl,
    DnsFailure,
    ConnectFailure,
    Timeout,
    HttpFailure,
}

impl EndpointState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reachable => "reachable",
            Self::InvalidUrl => "invalid_url",
            Self::DnsFailure => "dns_failure",
            Self::ConnectFailure => "connect_failure",
            Self::Timeout => "timeout",
            Self::HttpFailure => "http_failure",
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, Self::Reachable)
    }
}

/// Probe result for a single RPC endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointHealth {
    pub endpoint: String,
    pub state: EndpointState,
    pub detail: String,
    pub http_status: Option<u16>,
}

impl EndpointHealth {
    fn new(endpoint: &str, state: EndpointState, detail: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            state,
            detail: detail.into(),
            http_status: None,
        }
    }
}

/// Probe every endpoint in `network`'s priority list.
pub async fn probe_endpoints(network: NetworkId, timeout: Duration) -> Vec<EndpointHealth> {
    let config = network_config(network);
    let mut results = Vec::with_capacity(config.rpc_endpoints.len());
    for endpoint in config.rpc_endpoints {
        results.push(probe_endpoint(endpoint, timeout).await);
    }
    results
}

/// Probe one endpoint's `/status` route, classifying failures by
/// URL/DNS/connect/timeout.
pub async fn probe_endpoint(endpoint: &str, timeout: Duration) -> EndpointHealth {
    if url::Url::parse(endpoint).is_err() {
        return EndpointHealth::new(endpoint, EndpointState::InvalidUrl, "URL parse failed");
    }

    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(error) => {
            return EndpointHealth::new(
                endpoint,
                EndpointState::ConnectFailure,
                format!("HTTP client init failed: {error}"),
            );
        }
    };

    let status_url = format!("{}/status", endpoint.trim_end_matches('/'));
    debug!(endpoint, "probing RPC status route");

    match client.get(&status_url).send().await {
        Ok(response) => {
            let status = response.status();
            let state = if status.is_success() {
                EndpointState::Reachable
            } else {
                EndpointState::HttpFailure
            };
            EndpointHealth {
                endpoint: endpoint.to_string(),
                state,
                detail: format!("HTTP {}", status.as_u16()),
                http_status: Some(status.as_u16()),
            }
        }
        Err(error) => EndpointHealth::new(
            endpoint,
            classify_transport_error(&error),
            error.to_string(),
        ),
    }
}

fn classify_transport_error(error: &reqwest::Error) -> EndpointState {
    if error.is_timeout() {
        return EndpointState::Timeout;
    }

    let mut source = error.source();
    while let Some(err) = source {
        if let Some(io_error) = err.downcast_ref::<std::io::Error>() {
            return match io_error.kind() {
                std::io::ErrorKind::NotFound => EndpointState::DnsFailure,
                _ => EndpointState::ConnectFailure,
            };
        }
        source = err.source();
    }

    let lowered = error.to_string().to_ascii_lowercase();
    if lowered.contains("dns")
        || lowered.contains("lookup")
        || lowered.contains("name or service not known")
    {
        EndpointState::DnsFailure
    } else {
        EndpointState::ConnectFailure
    }
}
