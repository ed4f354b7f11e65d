//! Resource Registry
//!
//! The four resource kinds shown on the dashboard, in display order, with
//! their fixed column sets.

use serde::Serialize;

/// Column definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Field name in a [`super::RowRecord`]
    pub key: &'static str,
    /// Table header
    pub header: &'static str,
}

const fn col(key: &'static str, header: &'static str) -> ColumnDef {
    ColumnDef { key, header }
}

const INSTANCE_COLUMNS: &[ColumnDef] = &[
    col("ID", "Instance ID"),
    col("State", "State"),
    col("Type", "Type"),
    col("Public IP", "Public IP"),
];

const NETWORK_COLUMNS: &[ColumnDef] = &[col("VPC ID", "VPC ID"), col("CIDR", "CIDR Block")];

const LOAD_BALANCER_COLUMNS: &[ColumnDef] = &[
    col("LB Name", "Load Balancer Name"),
    col("DNS Name", "DNS Name"),
];

const IMAGE_COLUMNS: &[ColumnDef] = &[col("AMI ID", "AMI ID"), col("Name", "Name")];

/// One kind of resource query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Instances,
    Networks,
    LoadBalancers,
    Images,
}

impl ResourceKind {
    /// Every kind, in query and display order
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Instances,
        ResourceKind::Networks,
        ResourceKind::LoadBalancers,
        ResourceKind::Images,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ResourceKind::Instances => "instances",
            ResourceKind::Networks => "networks",
            ResourceKind::LoadBalancers => "load_balancers",
            ResourceKind::Images => "images",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ResourceKind::Instances => "EC2 Instances",
            ResourceKind::Networks => "VPCs",
            ResourceKind::LoadBalancers => "Load Balancers",
            ResourceKind::Images => "AMIs",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ResourceKind::Instances => "🖥️",
            ResourceKind::Networks => "🌐",
            ResourceKind::LoadBalancers => "⚖️",
            ResourceKind::Images => "💿",
        }
    }

    pub fn columns(self) -> &'static [ColumnDef] {
        match self {
            ResourceKind::Instances => INSTANCE_COLUMNS,
            ResourceKind::Networks => NETWORK_COLUMNS,
            ResourceKind::LoadBalancers => LOAD_BALANCER_COLUMNS,
            ResourceKind::Images => IMAGE_COLUMNS,
        }
    }

    /// Shown instead of a table when a query succeeded with no records
    pub fn empty_message(self) -> &'static str {
        match self {
            ResourceKind::Instances => "No EC2 instances found in this region.",
            ResourceKind::Networks => "No VPCs found in this region.",
            ResourceKind::LoadBalancers => "No load balancers found in this region.",
            ResourceKind::Images => "No AMIs found.",
        }
    }

    /// First-column text of the synthetic error row
    pub fn error_label(self) -> &'static str {
        match self {
            ResourceKind::Instances => "Error fetching instances",
            ResourceKind::Networks => "Error fetching VPCs",
            ResourceKind::LoadBalancers => "Error fetching LBs",
            ResourceKind::Images => "Error fetching AMIs",
        }
    }
}
