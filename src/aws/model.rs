//! Records decoded from EC2 and ELBv2 Query API responses
//!
//! EC2 wraps lists in `<fooSet><item>..</item></fooSet>`, ELBv2 in
//! `<Foo><member>..</member></Foo>`. Both are flattened to `Vec` on decode.

use serde::{Deserialize, Deserializer};

/// EC2 API version used for every EC2 action
pub const EC2_API_VERSION: &str = "2016-11-15";

/// ELBv2 API version
pub const ELBV2_API_VERSION: &str = "2015-12-01";

/// Name prefix of the public images shown when the account owns none
pub const FALLBACK_IMAGE_NAME_PREFIX: &str = "amzn2-ami-hvm-*";

/// Number of public images requested by the fallback query
pub const FALLBACK_IMAGE_LIMIT: usize = 5;

// =============================================================================
// List wrappers
// =============================================================================

struct ItemSet<T> {
    items: Vec<T>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ItemSet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw<T> {
            #[serde(rename = "item", default = "Vec::new")]
            item: Vec<T>,
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(Self { items: raw.item })
    }
}

struct MemberList<T> {
    members: Vec<T>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for MemberList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw<T> {
            #[serde(rename = "member", default = "Vec::new")]
            member: Vec<T>,
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(Self { members: raw.member })
    }
}

fn item_set<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(ItemSet::deserialize(deserializer)?.items)
}

fn member_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(MemberList::deserialize(deserializer)?.members)
}

// =============================================================================
// EC2
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstanceState {
    pub code: String,
    pub name: String,
}

/// EC2 instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Instance {
    pub instance_id: String,
    pub instance_type: String,
    #[serde(rename = "instanceState")]
    pub state: InstanceState,
    /// Absent for instances without a public address
    #[serde(rename = "ipAddress")]
    pub public_ip_address: Option<String>,
    pub private_ip_address: Option<String>,
    pub image_id: Option<String>,
    pub launch_time: Option<String>,
}

impl Instance {
    /// Convenience constructor used by fakes and tests
    pub fn new(instance_id: &str, state: &str, instance_type: &str, public_ip: Option<&str>) -> Self {
        Self {
            instance_id: instance_id.to_string(),
            instance_type: instance_type.to_string(),
            state: InstanceState {
                code: String::new(),
                name: state.to_string(),
            },
            public_ip_address: public_ip.map(str::to_string),
            ..Self::default()
        }
    }
}

/// A reservation groups the instances launched by one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reservation {
    pub reservation_id: String,
    pub owner_id: Option<String>,
    #[serde(rename = "instancesSet", deserialize_with = "item_set")]
    pub instances: Vec<Instance>,
}

impl Reservation {
    pub fn new(reservation_id: &str, instances: Vec<Instance>) -> Self {
        Self {
            reservation_id: reservation_id.to_string(),
            owner_id: None,
            instances,
        }
    }
}

/// Virtual private cloud
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Vpc {
    pub vpc_id: String,
    pub cidr_block: String,
    pub state: Option<String>,
    pub is_default: bool,
}

impl Vpc {
    pub fn new(vpc_id: &str, cidr_block: &str) -> Self {
        Self {
            vpc_id: vpc_id.to_string(),
            cidr_block: cidr_block.to_string(),
            ..Self::default()
        }
    }
}

/// Machine image (AMI)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
    pub image_id: String,
    pub name: Option<String>,
    pub image_state: Option<String>,
    pub architecture: Option<String>,
    pub creation_date: Option<String>,
}

impl Image {
    pub fn new(image_id: &str, name: Option<&str>) -> Self {
        Self {
            image_id: image_id.to_string(),
            name: name.map(str::to_string),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegionInfo {
    pub region_name: String,
    pub region_endpoint: Option<String>,
}

// =============================================================================
// ELBv2
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LoadBalancerState {
    pub code: String,
}

/// Application / network / gateway load balancer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LoadBalancer {
    #[serde(rename = "LoadBalancerArn")]
    pub arn: String,
    /// Some record variants omit the name; derive it from the ARN instead
    #[serde(rename = "LoadBalancerName")]
    pub name: Option<String>,
    #[serde(rename = "DNSName")]
    pub dns_name: String,
    #[serde(rename = "Type")]
    pub lb_type: Option<String>,
    pub scheme: Option<String>,
    pub state: Option<LoadBalancerState>,
}

impl LoadBalancer {
    pub fn new(arn: &str, name: Option<&str>, dns_name: &str) -> Self {
        Self {
            arn: arn.to_string(),
            name: name.map(str::to_string),
            dns_name: dns_name.to_string(),
            ..Self::default()
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

/// EC2 `Filter.N` parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub name: String,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Parameters of a `DescribeImages` call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageQuery {
    pub owners: Vec<String>,
    pub filters: Vec<Filter>,
    pub max_results: Option<usize>,
}

impl ImageQuery {
    /// Images owned by the calling account
    pub fn owned_by_self() -> Self {
        Self {
            owners: vec!["self".to_string()],
            ..Self::default()
        }
    }

    /// A handful of current Amazon Linux 2 images, shown on accounts that
    /// own no images of their own
    pub fn public_fallback() -> Self {
        Self {
            owners: vec!["amazon".to_string()],
            filters: vec![
                Filter::new("name", &[FALLBACK_IMAGE_NAME_PREFIX]),
                Filter::new("state", &["available"]),
                Filter::new("architecture", &["x86_64"]),
            ],
            max_results: Some(FALLBACK_IMAGE_LIMIT),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.owners.iter().any(|o| o != "self")
    }
}

// =============================================================================
// Response envelopes
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct DescribeRegionsResponse {
    #[serde(deserialize_with = "item_set")]
    pub region_info: Vec<RegionInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct DescribeInstancesResponse {
    #[serde(deserialize_with = "item_set")]
    pub reservation_set: Vec<Reservation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct DescribeVpcsResponse {
    #[serde(deserialize_with = "item_set")]
    pub vpc_set: Vec<Vpc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct DescribeImagesResponse {
    #[serde(deserialize_with = "item_set")]
    pub images_set: Vec<Image>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct DescribeLoadBalancersResult {
    #[serde(deserialize_with = "member_list")]
    pub load_balancers: Vec<LoadBalancer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DescribeLoadBalancersResponse {
    #[serde(rename = "DescribeLoadBalancersResult")]
    pub result: DescribeLoadBalancersResult,
}

/// `<Code>` / `<Message>` pair shared by EC2 and ELBv2 error bodies
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorList {
    #[serde(rename = "Error")]
    pub errors: Vec<ErrorDetail>,
}

/// EC2 answers `<Response><Errors><Error>`, ELBv2 `<ErrorResponse><Error>`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorResponse {
    #[serde(rename = "Errors")]
    pub errors: Option<ErrorList>,
    #[serde(rename = "Error")]
    pub error: Option<ErrorDetail>,
}

impl ErrorResponse {
    pub fn into_detail(self) -> Option<ErrorDetail> {
        self.error
            .or_else(|| self.errors.and_then(|list| list.errors.into_iter().next()))
    }
}
