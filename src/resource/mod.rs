//! Resource aggregation
//!
//! Turns provider calls into what the dashboard shows.
//!
//! # Architecture
//!
//! - [`probe`] - Credential probe deciding whether queries run at all
//! - [`registry`] - The four resource kinds and their column sets
//! - [`fetcher`] - Runs the queries with per-kind error isolation
//! - [`rows`] - Normalizes provider records into flat rows
//! - [`view`] - Section view model with counts and error rows
//!
//! # Example
//!
//! ```ignore
//! use awsdash::resource::{load_dashboard, Dashboard};
//!
//! async fn show(api: &dyn awsdash::aws::ComputeApi) {
//!     match load_dashboard(api, "us-east-1").await {
//!         Dashboard::Ready(result) => println!("{:?}", result.failed_kinds()),
//!         Dashboard::Disconnected(status) => println!("{:?}", status.error_message()),
//!     }
//! }
//! ```

pub mod fetcher;
pub mod probe;
pub mod registry;
pub mod rows;
pub mod view;

pub use fetcher::{aggregate, fetch_kind, AggregateResult, QueryOutcome, ResourceSection};
pub use probe::{probe_credentials, ConnectionStatus};
pub use registry::{ColumnDef, ResourceKind};
pub use rows::{RowRecord, NOT_AVAILABLE};
pub use view::{build_view, SectionView};

use crate::aws::ComputeApi;

/// What one dashboard request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dashboard {
    /// The probe failed; no resource query was issued
    Disconnected(ConnectionStatus),
    Ready(AggregateResult),
}

impl Dashboard {
    pub fn status(&self) -> ConnectionStatus {
        match self {
            Dashboard::Disconnected(status) => status.clone(),
            Dashboard::Ready(_) => ConnectionStatus::Connected,
        }
    }
}

/// Probe, then aggregate only when connected
pub async fn load_dashboard(api: &dyn ComputeApi, region: &str) -> Dashboard {
    let status = probe_credentials(api, region).await;
    if !status.is_connected() {
        return Dashboard::Disconnected(status);
    }
    Dashboard::Ready(aggregate(api).await)
}
