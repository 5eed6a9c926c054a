//! Signer session lifecycle with ordered RPC endpoint failover.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::chain::{NetworkId, denom};
use crate::config::{NetworkConfig, SessionConfig, network_config};
use crate::error::WalletError;

use super::{ChainClient, ClientConnector, Coin, Fee, SendReceipt, Signer};

/// Connection snapshot for one established signer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSession {
    pub address: String,
    pub network: NetworkId,
    pub chain_id: String,
}

/// Connection snapshot including the disconnected case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletInfo {
    pub connected: bool,
    pub address: Option<String>,
    pub network: Option<NetworkId>,
}

struct ActiveSession {
    session: WalletSession,
    client: Box<dyn ChainClient>,
}

/// Owns at most one signer session at a time for one conversation.
///
/// Endpoint failover is strictly sequential in the network's fixed priority
/// order; every fresh connect starts from the top of the list.
pub struct SessionManager {
    signer: Arc<dyn Signer>,
    connector: Arc<dyn ClientConnector>,
    config: SessionConfig,
    active: Option<ActiveSession>,
}

impl SessionManager {
    pub fn new(
        signer: Arc<dyn Signer>,
        connector: Arc<dyn ClientConnector>,
        config: SessionConfig,
    ) -> Self {
        Self {
            signer,
            connector,
            config,
            active: None,
        }
    }

    pub fn session(&self) -> Option<&WalletSession> {
        self.active.as_ref().map(|active| &active.session)
    }

    pub fn wallet_info(&self) -> WalletInfo {
        match self.session() {
            Some(session) => WalletInfo {
                connected: true,
                address: Some(session.address.clone()),
                network: Some(session.network),
            },
            None => WalletInfo {
                connected: false,
                address: None,
                network: None,
            },
        }
    }

    /// Connect by registry key, chain id, or display name.
    pub async fn connect_named(&mut self, name: &str) -> Result<WalletSession, WalletError> {
        let network =
            NetworkId::parse(name).ok_or_else(|| WalletError::UnsupportedNetwork(name.to_string()))?;
        self.connect(network).await
    }

    /// Establish a session against `network`.
    pub async fn connect(&mut self, network: NetworkId) -> Result<WalletSession, WalletError> {
        if !self.signer.is_available().await {
            return Err(WalletError::SignerUnavailable);
        }

        let config = network_config(network);

        // Non-fatal: the signer may already know the chain.
        if let Err(error) = self.signer.suggest_chain(config).await {
            warn!(chain_id = config.chain_id, %error, "chain suggestion failed, continuing");
        }

        self.signer.enable(config.chain_id).await?;

        let accounts = self.signer.accounts(config.chain_id).await?;
        let account = accounts.into_iter().next().ok_or(WalletError::NoAccounts)?;

        let client = self.dial_endpoints(config).await?;

        let session = WalletSession {
            address: account.address,
            network,
            chain_id: config.chain_id.to_string(),
        };
        info!(address = %session.address, chain_id = %session.chain_id, "wallet connected");
        self.active = Some(ActiveSession {
            session: session.clone(),
            client,
        });
        Ok(session)
    }

    /// Try each endpoint in priority order, one at a time, each bounded by
    /// the configured per-attempt timeout. First success wins; earlier
    /// endpoints are never retried after a later one succeeds.
    async fn dial_endpoints(
        &self,
        config: &NetworkConfig,
    ) -> Result<Box<dyn ChainClient>, WalletError> {
        let mut last_error = "no endpoints configured".to_string();

        for endpoint in config.rpc_endpoints {
            debug!(endpoint, "attempting RPC connection");
            match timeout(
                self.config.endpoint_timeout,
                self.connector.connect(endpoint, config),
            )
            .await
            {
                Ok(Ok(client)) => {
                    info!(endpoint, "RPC connection established");
                    return Ok(client);
                }
                Ok(Err(error)) => {
                    warn!(endpoint, %error, "RPC connection failed");
                    last_error = error.to_string();
                }
                Err(_) => {
                    warn!(
                        endpoint,
                        timeout_ms = self.config.endpoint_timeout.as_millis() as u64,
                        "RPC connection timed out"
                    );
                    last_error = format!("connection to {endpoint} timed out");
                }
            }
        }

        Err(WalletError::AllEndpointsUnreachable {
            attempts: config.rpc_endpoints.len(),
            last: last_error,
        })
    }

    /// Balance of the session account in `denom`.
    pub async fn balance(&self, denom: &str) -> Result<Coin, WalletError> {
        let active = self.active.as_ref().ok_or(WalletError::NotConnected)?;
        active.client.balance(&active.session.address, denom).await
    }

    /// Send `amount` expressed in `unit` to `to`, with the fixed fee and
    /// gas limit from the session configuration.
    pub async fn send_tokens(
        &self,
        to: &str,
        amount: Decimal,
        unit: &str,
        memo: &str,
    ) -> Result<SendReceipt, WalletError> {
        let active = self.active.as_ref().ok_or(WalletError::NotConnected)?;

        let normalized = denom::normalize_amount(amount, unit);
        let send_amount = Coin {
            denom: normalized.denom,
            amount: normalized.base_units.to_string(),
        };
        let fee = Fee {
            amount: Coin::new(denom::BASE_DENOM, self.config.fee_base_units),
            gas_limit: self.config.gas_limit,
        };

        debug!(
            from = %active.session.address,
            to,
            amount = %send_amount.amount,
            denom = %send_amount.denom,
            "broadcasting bank send"
        );

        active
            .client
            .send_tokens(&active.session.address, to, &send_amount, &fee, memo)
            .await
            .map_err(|error| match error {
                WalletError::SendFailed(_) => error,
                other => WalletError::SendFailed(other.to_string()),
            })
    }

    /// Disconnect, then reconnect under `network`. A failed reconnect
    /// leaves the manager disconnected; there is no half-switched state.
    pub async fn switch_chain(&mut self, network: NetworkId) -> Result<WalletSession, WalletError> {
        self.disconnect();
        self.connect(network).await
    }

    /// Idempotent; clears the session unconditionally.
    pub fn disconnect(&mut self) {
        if self.active.take().is_some() {
            info!("wallet disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::wallet::Account;

    const RECEIVER: &str = "celestia1qnk2n4nlkpw9xfqntladh74w6ujtulwnmxnh3k";

    struct MockSigner {
        available: bool,
        accounts: Vec<Account>,
        suggest_fails: bool,
    }

    impl MockSigner {
        fn with_account() -> Self {
            Self {
                available: true,
                accounts: vec![Account {
                    address: "celestia1uaclygpvytqwdvmrtjskyq0087az3v5wdedn7k".to_string(),
                }],
                suggest_fails: false,
            }
        }
    }

    #[async_trait]
    impl Signer for MockSigner {
        async fn is_available(&self) -> bool {
            self.available
        }

        async fn suggest_chain(&self, _config: &NetworkConfig) -> Result<(), WalletError> {
            if self.suggest_fails {
                Err(WalletError::Query("suggest rejected".to_string()))
            } else {
                Ok(())
            }
        }

        async fn enable(&self, _chain_id: &str) -> Result<(), WalletError> {
            Ok(())
        }

        async fn accounts(&self, _chain_id: &str) -> Result<Vec<Account>, WalletError> {
            Ok(self.accounts.clone())
        }
    }

    /// Connector that fails the first `failures` dials (and, when
    /// `fail_after` is set, every dial past that count) while recording the
    /// endpoints it was asked to reach.
    struct ScriptedConnector {
        failures: usize,
        fail_after: Option<usize>,
        dialed: Mutex<Vec<String>>,
        send_error: Option<String>,
    }

    impl ScriptedConnector {
        fn failing_first(failures: usize) -> Self {
            Self {
                failures,
                fail_after: None,
                dialed: Mutex::new(Vec::new()),
                send_error: None,
            }
        }

        fn dialed(&self) -> Vec<String> {
            self.dialed.lock().expect("mock lock").clone()
        }
    }

    struct MockClient {
        send_error: Option<String>,
    }

    #[async_trait]
    impl ChainClient for MockClient {
        async fn balance(&self, _address: &str, denom: &str) -> Result<Coin, WalletError> {
            Ok(Coin::new(denom, 5_000_000))
        }

        async fn send_tokens(
            &self,
            _from: &str,
            _to: &str,
            _amount: &Coin,
            _fee: &Fee,
            _memo: &str,
        ) -> Result<SendReceipt, WalletError> {
            if let Some(reason) = &self.send_error {
                return Err(WalletError::SendFailed(reason.clone()));
            }
            Ok(SendReceipt {
                tx_hash: "A1B2C3D4".to_string(),
                height: 42,
                gas_used: 78_000,
                gas_wanted: 100_000,
            })
        }
    }

    #[async_trait]
    impl ClientConnector for ScriptedConnector {
        async fn connect(
            &self,
            endpoint: &str,
            _config: &NetworkConfig,
        ) -> Result<Box<dyn ChainClient>, WalletError> {
            let attempt = {
                let mut dialed = self.dialed.lock().expect("mock lock");
                dialed.push(endpoint.to_string());
                dialed.len()
            };
            let refused =
                attempt <= self.failures || self.fail_after.is_some_and(|after| attempt > after);
            if refused {
                return Err(WalletError::EndpointConnect {
                    endpoint: endpoint.to_string(),
                    reason: "connection refused".to_string(),
                });
            }
            Ok(Box::new(MockClient {
                send_error: self.send_error.clone(),
            }))
        }
    }

    fn manager(signer: MockSigner, connector: ScriptedConnector) -> SessionManager {
        let config = SessionConfig {
            endpoint_timeout: Duration::from_millis(200),
            ..SessionConfig::default()
        };
        SessionManager::new(Arc::new(signer), Arc::new(connector), config)
    }

    #[tokio::test]
    async fn connect_uses_first_endpoint_that_succeeds() {
        let connector = Arc::new(ScriptedConnector::failing_first(2));
        let mut manager = SessionManager::new(
            Arc::new(MockSigner::with_account()),
            connector.clone(),
            SessionConfig::default(),
        );

        let session = manager.connect(NetworkId::Mainnet).await.expect("connects");
        assert_eq!(session.network, NetworkId::Mainnet);
        assert_eq!(session.chain_id, "celestia");

        let expected: Vec<String> = network_config(NetworkId::Mainnet).rpc_endpoints[..3]
            .iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(connector.dialed(), expected);
    }

    #[tokio::test]
    async fn connect_reports_last_error_when_every_endpoint_fails() {
        let mut manager = manager(MockSigner::with_account(), ScriptedConnector::failing_first(usize::MAX));

        let error = manager.connect(NetworkId::Mocha).await.unwrap_err();
        match error {
            WalletError::AllEndpointsUnreachable { attempts, last } => {
                assert_eq!(attempts, 5);
                assert!(last.contains("connection refused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(manager.session().is_none());
    }

    #[tokio::test]
    async fn connect_fails_without_signer() {
        let signer = MockSigner {
            available: false,
            accounts: Vec::new(),
            suggest_fails: false,
        };
        let mut manager = manager(signer, ScriptedConnector::failing_first(0));

        let error = manager.connect(NetworkId::Mainnet).await.unwrap_err();
        assert!(matches!(error, WalletError::SignerUnavailable));
    }

    #[tokio::test]
    async fn connect_fails_without_accounts() {
        let signer = MockSigner {
            available: true,
            accounts: Vec::new(),
            suggest_fails: false,
        };
        let mut manager = manager(signer, ScriptedConnector::failing_first(0));

        let error = manager.connect(NetworkId::Mainnet).await.unwrap_err();
        assert!(matches!(error, WalletError::NoAccounts));
    }

    #[tokio::test]
    async fn suggest_chain_failure_is_non_fatal() {
        let signer = MockSigner {
            suggest_fails: true,
            ..MockSigner::with_account()
        };
        let mut manager = manager(signer, ScriptedConnector::failing_first(0));

        assert!(manager.connect(NetworkId::Mainnet).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_network_name_is_unsupported() {
        let mut manager = manager(MockSigner::with_account(), ScriptedConnector::failing_first(0));

        let error = manager.connect_named("dymension").await.unwrap_err();
        assert!(matches!(error, WalletError::UnsupportedNetwork(name) if name == "dymension"));
    }

    #[tokio::test]
    async fn operations_require_a_session() {
        let manager = manager(MockSigner::with_account(), ScriptedConnector::failing_first(0));

        assert!(matches!(
            manager.balance("utia").await.unwrap_err(),
            WalletError::NotConnected
        ));
        assert!(matches!(
            manager
                .send_tokens(RECEIVER, dec!(1), "TIA", "")
                .await
                .unwrap_err(),
            WalletError::NotConnected
        ));
    }

    #[tokio::test]
    async fn send_normalizes_floor_boundary_to_one_base_unit() {
        let mut manager = manager(MockSigner::with_account(), ScriptedConnector::failing_first(0));
        manager.connect(NetworkId::Mainnet).await.expect("connects");

        let receipt = manager
            .send_tokens(RECEIVER, dec!(0.000001), "TIA", "memo")
            .await
            .expect("sends");
        assert_eq!(receipt.tx_hash, "A1B2C3D4");
        assert_eq!(receipt.gas_wanted, 100_000);
    }

    #[tokio::test]
    async fn send_failure_maps_to_send_failed() {
        let connector = ScriptedConnector {
            send_error: Some("insufficient funds".to_string()),
            ..ScriptedConnector::failing_first(0)
        };
        let mut manager = manager(MockSigner::with_account(), connector);
        manager.connect(NetworkId::Mainnet).await.expect("connects");

        let error = manager
            .send_tokens(RECEIVER, dec!(1), "TIA", "")
            .await
            .unwrap_err();
        assert!(matches!(error, WalletError::SendFailed(reason) if reason == "insufficient funds"));
    }

    #[tokio::test]
    async fn switch_chain_failure_leaves_manager_disconnected() {
        // First dial succeeds, everything after it is refused.
        let connector = ScriptedConnector {
            fail_after: Some(1),
            ..ScriptedConnector::failing_first(0)
        };
        let mut manager = manager(MockSigner::with_account(), connector);

        manager.connect(NetworkId::Mainnet).await.expect("connects");
        assert!(manager.wallet_info().connected);

        let error = manager.switch_chain(NetworkId::Mocha).await.unwrap_err();
        assert!(matches!(error, WalletError::AllEndpointsUnreachable { .. }));
        assert!(!manager.wallet_info().connected);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let mut manager = manager(MockSigner::with_account(), ScriptedConnector::failing_first(0));
        manager.connect(NetworkId::Mocha).await.expect("connects");

        manager.disconnect();
        manager.disconnect();
        assert_eq!(
            manager.wallet_info(),
            WalletInfo {
                connected: false,
                address: None,
                network: None,
            }
        );
    }
}
