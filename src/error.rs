//! Error types for the assistant.

use uuid::Uuid;

/// Top-level error type for the assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Wallet session and network errors.
///
/// Dialogue-level problems (incomplete parses, rejected addresses) never
/// become error values: the dialogue machine re-prompts instead. Everything
/// here propagates to the orchestrator, which surfaces `user_message()` and
/// reverts any in-flight transfer record.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("signer extension is not available")]
    SignerUnavailable,

    #[error("network '{0}' is not supported")]
    UnsupportedNetwork(String),

    #[error("no accounts available in the signer")]
    NoAccounts,

    #[error("all {attempts} RPC endpoints failed, last error: {last}")]
    AllEndpointsUnreachable { attempts: usize, last: String },

    #[error("wallet is not connected")]
    NotConnected,

    #[error("endpoint '{endpoint}' rejected the connection: {reason}")]
    EndpointConnect { endpoint: String, reason: String },

    #[error("RPC query failed: {0}")]
    Query(String),

    #[error("token send failed: {0}")]
    SendFailed(String),
}

impl WalletError {
    /// Operator-facing message in the product locale.
    pub fn user_message(&self) -> String {
        match self {
            Self::SignerUnavailable => {
                "Keplr wallet no está instalado. Instala Keplr desde https://wallet.keplr.app/ y recarga la página.".to_string()
            }
            Self::UnsupportedNetwork(name) => {
                format!("La red '{name}' no está soportada.")
            }
            Self::NoAccounts => "No se encontraron cuentas en Keplr.".to_string(),
            Self::AllEndpointsUnreachable { .. } => {
                "No se pudo conectar a la red Celestia. Verifica tu conexión a internet e intenta de nuevo en unos segundos.".to_string()
            }
            Self::NotConnected => "El wallet no está conectado.".to_string(),
            Self::SendFailed(detail) => format!("Error enviando tokens: {detail}"),
            other => format!("Error desconocido: {other}"),
        }
    }
}

/// Persistence errors for the external transfer store.
///
/// Isolated from the send path: a failed write never blocks the on-chain
/// transfer itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to persist transfer record: {0}")]
    Insert(String),

    #[error("failed to update transfer record {id}: {reason}")]
    Update { id: Uuid, reason: String },

    #[error("transfer record {id} not found")]
    NotFound { id: Uuid },

    #[error("failed to query transfer records: {0}")]
    Query(String),
}

/// Result type alias for the assistant.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signer_unavailable_maps_to_install_hint() {
        let message = WalletError::SignerUnavailable.user_message();
        assert!(message.contains("Keplr"));
        assert!(message.contains("https://wallet.keplr.app/"));
    }

    #[test]
    fn unknown_errors_fall_back_to_generic_message() {
        let error = WalletError::Query("balance lookup refused".to_string());
        let message = error.user_message();
        assert!(message.starts_with("Error desconocido"));
        assert!(message.contains("balance lookup refused"));
    }

    #[test]
    fn wallet_error_converts_into_top_level_error() {
        let error = Error::from(WalletError::NotConnected);
        assert!(matches!(error, Error::Wallet(WalletError::NotConnected)));
    }
}
