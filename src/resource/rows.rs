//! Row normalization
//!
//! Flattens provider records into [`RowRecord`]s with the fixed column set of
//! their [`ResourceKind`].

use super::registry::ResourceKind;
use crate::aws::model::{Image, LoadBalancer, Reservation, Vpc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Placeholder for optional fields the provider left out
pub const NOT_AVAILABLE: &str = "N/A";

/// One table row: a value for every column of its kind, in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    kind: ResourceKind,
    values: Vec<String>,
}

impl RowRecord {
    fn new(kind: ResourceKind, values: Vec<String>) -> Self {
        debug_assert_eq!(values.len(), kind.columns().len());
        Self { kind, values }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Value of a named field, e.g. `row.get("Public IP")`
    pub fn get(&self, field: &str) -> Option<&str> {
        self.kind
            .columns()
            .iter()
            .position(|c| c.key == field)
            .map(|i| self.values[i].as_str())
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// `(field, value)` pairs in column order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.kind
            .columns()
            .iter()
            .zip(&self.values)
            .map(|(c, v)| (c.key, v.as_str()))
    }
}

// Serialized as a JSON object keyed by field name, in column order
impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in self.fields() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One row per instance across all reservations
pub fn instance_rows(reservations: &[Reservation]) -> Vec<RowRecord> {
    reservations
        .iter()
        .flat_map(|r| &r.instances)
        .map(|instance| {
            RowRecord::new(
                ResourceKind::Instances,
                vec![
                    instance.instance_id.clone(),
                    instance.state.name.clone(),
                    instance.instance_type.clone(),
                    instance
                        .public_ip_address
                        .clone()
                        .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                ],
            )
        })
        .collect()
}

pub fn network_rows(vpcs: &[Vpc]) -> Vec<RowRecord> {
    vpcs.iter()
        .map(|vpc| {
            RowRecord::new(
                ResourceKind::Networks,
                vec![vpc.vpc_id.clone(), vpc.cidr_block.clone()],
            )
        })
        .collect()
}

pub fn load_balancer_rows(load_balancers: &[LoadBalancer]) -> Vec<RowRecord> {
    load_balancers
        .iter()
        .map(|lb| {
            RowRecord::new(
                ResourceKind::LoadBalancers,
                vec![load_balancer_display_name(lb), lb.dns_name.clone()],
            )
        })
        .collect()
}

pub fn image_rows(images: &[Image]) -> Vec<RowRecord> {
    images
        .iter()
        .map(|image| {
            RowRecord::new(
                ResourceKind::Images,
                vec![
                    image.image_id.clone(),
                    image
                        .name
                        .clone()
                        .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                ],
            )
        })
        .collect()
}

/// The synthetic row shown in place of a failed query's records.
///
/// First column carries the kind's error label, second the reason, any
/// further columns are blank.
pub fn error_row(kind: ResourceKind, reason: &str) -> RowRecord {
    let mut values = vec![kind.error_label().to_string(), reason.to_string()];
    values.resize(kind.columns().len(), String::new());
    RowRecord::new(kind, values)
}

/// Name of a load balancer, or the last path segment of its ARN when the
/// record carries no name
pub fn load_balancer_display_name(lb: &LoadBalancer) -> String {
    match lb.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ if lb.arn.is_empty() => NOT_AVAILABLE.to_string(),
        _ => extract_short_name(&lb.arn),
    }
}

/// Extract the trailing `/` segment of an identifier
/// e.g., "arn:aws:elasticloadbalancing:us-east-1:123:loadbalancer/app/web/50dc6c" -> "50dc6c"
pub fn extract_short_name(id: &str) -> String {
    id.rsplit('/').next().unwrap_or(id).to_string()
}
