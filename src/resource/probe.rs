//! Credential Probe
//!
//! One cheap authenticated call that decides whether the resource queries
//! are worth running at all.

use crate::aws::{ComputeApi, ProviderError};
use serde::Serialize;

/// Whether the dashboard can talk to AWS
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    /// No credentials were configured or found
    CredentialsMissing,
    /// Credentials were sent and AWS rejected the call
    ClientError(String),
    /// Anything else: network failure, unreadable response
    UnexpectedError(String),
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    /// Short machine-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::CredentialsMissing => "credentials_missing",
            ConnectionStatus::ClientError(_) => "client_error",
            ConnectionStatus::UnexpectedError(_) => "unexpected_error",
        }
    }

    /// Error text for the guidance page; `None` when connected
    pub fn error_message(&self) -> Option<String> {
        match self {
            ConnectionStatus::Connected => None,
            ConnectionStatus::CredentialsMissing => Some(
                "AWS credentials not found. Please set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY environment variables."
                    .to_string(),
            ),
            ConnectionStatus::ClientError(message) => Some(format!("AWS Client Error: {}", message)),
            ConnectionStatus::UnexpectedError(message) => {
                Some(format!("Unexpected AWS error: {}", message))
            }
        }
    }
}

impl From<ProviderError> for ConnectionStatus {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::CredentialsMissing => ConnectionStatus::CredentialsMissing,
            client @ ProviderError::Client { .. } => ConnectionStatus::ClientError(client.to_string()),
            ProviderError::Unexpected(message) => ConnectionStatus::UnexpectedError(message),
        }
    }
}

/// Verify that `api` can authenticate against `region`
pub async fn probe_credentials(api: &dyn ComputeApi, region: &str) -> ConnectionStatus {
    match api.verify_region(region).await {
        Ok(()) => {
            tracing::info!("AWS connection established successfully");
            ConnectionStatus::Connected
        }
        Err(e) => {
            let status = ConnectionStatus::from(e);
            match &status {
                ConnectionStatus::CredentialsMissing => tracing::error!("AWS credentials not found"),
                ConnectionStatus::ClientError(m) => tracing::error!("AWS client error: {}", m),
                ConnectionStatus::UnexpectedError(m) => {
                    tracing::error!("Unexpected AWS error: {}", m)
                }
                ConnectionStatus::Connected => {}
            }
            status
        }
    }
}
