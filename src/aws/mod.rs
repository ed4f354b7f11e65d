//! AWS API interaction module
//!
//! This module provides the provider side of the dashboard: credential
//! resolution, SigV4 request signing, the Query-protocol HTTP client, and the
//! typed records returned by EC2 and ELBv2.
//!
//! # Module Structure
//!
//! - [`auth`] - Credential chain (explicit keys, shared credentials file)
//! - [`signing`] - AWS Signature Version 4
//! - [`http`] - HTTP utilities for signed Query API calls
//! - [`client`] - [`client::AwsClient`], the [`ComputeApi`] implementation
//! - [`model`] - Records decoded from EC2 / ELBv2 XML responses
//!
//! # Example
//!
//! ```ignore
//! use awsdash::aws::{client::AwsClient, ComputeApi};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = AwsClient::new(None, "us-east-1", None)?;
//!     let vpcs = client.describe_vpcs().await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod model;
pub mod signing;

use async_trait::async_trait;
use model::{Image, ImageQuery, LoadBalancer, Reservation, Vpc};
use thiserror::Error;

/// Result alias for provider calls
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Failure of a single provider call.
///
/// The three variants drive different user-facing guidance, so callers match
/// on them rather than on message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No credentials could be resolved; no request was sent.
    #[error("AWS credentials not found")]
    CredentialsMissing,

    /// AWS answered with an error response.
    #[error("{code}: {message} (HTTP {status})")]
    Client {
        code: String,
        message: String,
        status: u16,
    },

    /// Transport failure, undecodable response, or anything else.
    #[error("{0}")]
    Unexpected(String),
}

impl ProviderError {
    pub fn client(code: &str, message: &str, status: u16) -> Self {
        Self::Client {
            code: code.to_string(),
            message: message.to_string(),
            status,
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

/// The read-only compute capabilities the dashboard consumes.
///
/// [`client::AwsClient`] talks to AWS; tests substitute in-process fakes.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Cheap authenticated call confirming the region is reachable.
    async fn verify_region(&self, region: &str) -> ProviderResult<()>;

    /// EC2 reservations, each holding one or more instances.
    async fn describe_instances(&self) -> ProviderResult<Vec<Reservation>>;

    async fn describe_vpcs(&self) -> ProviderResult<Vec<Vpc>>;

    /// ELBv2 load balancers.
    async fn describe_load_balancers(&self) -> ProviderResult<Vec<LoadBalancer>>;

    async fn describe_images(&self, query: &ImageQuery) -> ProviderResult<Vec<Image>>;
}
