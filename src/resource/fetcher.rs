//! Resource Fetcher
//!
//! Runs the four resource queries in display order. Every query is isolated:
//! its failure is recorded against its own kind and the remaining queries
//! still run.

use super::registry::ResourceKind;
use super::rows::{self, RowRecord};
use crate::aws::http::format_aws_error;
use crate::aws::model::{ImageQuery, FALLBACK_IMAGE_LIMIT};
use crate::aws::{ComputeApi, ProviderResult};

/// Outcome of one resource query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The query succeeded; possibly with no records
    Rows(Vec<RowRecord>),
    /// The query failed; `reason` is safe to show to users
    Failed { reason: String },
}

impl QueryOutcome {
    /// Number of real resources (0 for a failed query)
    pub fn count(&self) -> usize {
        match self {
            QueryOutcome::Rows(rows) => rows.len(),
            QueryOutcome::Failed { .. } => 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, QueryOutcome::Failed { .. })
    }
}

/// Result of one query, tagged with its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSection {
    pub kind: ResourceKind,
    pub outcome: QueryOutcome,
}

impl ResourceSection {
    /// Rows to render: the real rows, or the single synthetic error row
    pub fn display_rows(&self) -> Vec<RowRecord> {
        match &self.outcome {
            QueryOutcome::Rows(rows) => rows.clone(),
            QueryOutcome::Failed { reason } => vec![rows::error_row(self.kind, reason)],
        }
    }
}

/// Everything one dashboard load produced.
///
/// Always holds exactly one section per [`ResourceKind`], in
/// [`ResourceKind::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    sections: Vec<ResourceSection>,
}

impl AggregateResult {
    pub fn sections(&self) -> &[ResourceSection] {
        &self.sections
    }

    pub fn section(&self, kind: ResourceKind) -> Option<&ResourceSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.section(kind).map_or(0, |s| s.outcome.count())
    }

    pub fn failed_kinds(&self) -> Vec<ResourceKind> {
        self.sections
            .iter()
            .filter(|s| s.outcome.is_failed())
            .map(|s| s.kind)
            .collect()
    }
}

/// Run all four queries, strictly one after another
pub async fn aggregate(api: &dyn ComputeApi) -> AggregateResult {
    let mut sections = Vec::with_capacity(ResourceKind::ALL.len());

    for kind in ResourceKind::ALL {
        tracing::info!("Fetching {}...", kind.display_name());
        let outcome = match fetch_kind(api, kind).await {
            Ok(rows) => QueryOutcome::Rows(rows),
            Err(e) => {
                tracing::warn!("Error fetching {}: {}", kind.display_name(), e);
                QueryOutcome::Failed {
                    reason: format_aws_error(&e),
                }
            }
        };
        sections.push(ResourceSection { kind, outcome });
    }

    let result = AggregateResult { sections };
    tracing::info!(
        "Found {} instances, {} VPCs, {} load balancers, {} AMIs",
        result.count(ResourceKind::Instances),
        result.count(ResourceKind::Networks),
        result.count(ResourceKind::LoadBalancers),
        result.count(ResourceKind::Images),
    );
    result
}

/// Run the query for one kind and normalize its records
pub async fn fetch_kind(api: &dyn ComputeApi, kind: ResourceKind) -> ProviderResult<Vec<RowRecord>> {
    match kind {
        ResourceKind::Instances => Ok(rows::instance_rows(&api.describe_instances().await?)),
        ResourceKind::Networks => Ok(rows::network_rows(&api.describe_vpcs().await?)),
        ResourceKind::LoadBalancers => Ok(rows::load_balancer_rows(
            &api.describe_load_balancers().await?,
        )),
        ResourceKind::Images => fetch_images(api).await,
    }
}

/// Images owned by the account, or a few public Amazon Linux images when
/// the account owns none
async fn fetch_images(api: &dyn ComputeApi) -> ProviderResult<Vec<RowRecord>> {
    let owned = api.describe_images(&ImageQuery::owned_by_self()).await?;
    if !owned.is_empty() {
        return Ok(rows::image_rows(&owned));
    }

    tracing::info!("No owned AMIs found, fetching recent Amazon Linux AMIs...");
    let mut public = api.describe_images(&ImageQuery::public_fallback()).await?;
    public.truncate(FALLBACK_IMAGE_LIMIT);
    Ok(rows::image_rows(&public))
}
