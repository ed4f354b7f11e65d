//! View model
//!
//! Per-section data the HTML page and the JSON API render from.

use super::fetcher::{AggregateResult, QueryOutcome};
use super::registry::ResourceKind;
use super::rows::RowRecord;
use serde::Serialize;

/// One dashboard section, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub kind: ResourceKind,
    pub title: &'static str,
    pub icon: &'static str,
    pub headers: Vec<&'static str>,
    /// Real resources found; 0 when the query failed
    pub count: usize,
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub rows: Vec<RowRecord>,
    pub empty_message: &'static str,
}

impl SectionView {
    /// Count as shown in the section heading
    pub fn count_label(&self) -> String {
        if self.failed {
            "error".to_string()
        } else {
            self.count.to_string()
        }
    }

    /// Succeeded with nothing to show
    pub fn is_empty(&self) -> bool {
        !self.failed && self.rows.is_empty()
    }
}

pub fn build_view(result: &AggregateResult) -> Vec<SectionView> {
    result
        .sections()
        .iter()
        .map(|section| {
            let kind = section.kind;
            let error = match &section.outcome {
                QueryOutcome::Failed { reason } => Some(reason.clone()),
                QueryOutcome::Rows(_) => None,
            };
            SectionView {
                kind,
                title: kind.display_name(),
                icon: kind.icon(),
                headers: kind.columns().iter().map(|c| c.header).collect(),
                count: section.outcome.count(),
                failed: section.outcome.is_failed(),
                error,
                rows: section.display_rows(),
                empty_message: kind.empty_message(),
            }
        })
        .collect()
}

/// Total number of real resources across all sections
pub fn total_count(views: &[SectionView]) -> usize {
    views.iter().map(|v| v.count).sum()
}
