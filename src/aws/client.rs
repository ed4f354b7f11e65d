//! AWS Client
//!
//! Main client for the EC2 and ELBv2 Query APIs, combining credentials,
//! SigV4 signing and the HTTP client.

use super::auth::Credentials;
use super::http::AwsHttpClient;
use super::model::{
    DescribeImagesResponse, DescribeInstancesResponse, DescribeLoadBalancersResponse,
    DescribeRegionsResponse, DescribeVpcsResponse, Filter, Image, ImageQuery, LoadBalancer,
    Reservation, Vpc, EC2_API_VERSION, ELBV2_API_VERSION,
};
use super::signing::{encode_params, SigV4Signer};
use super::{ComputeApi, ProviderError, ProviderResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Signing name and endpoint prefix of EC2
const EC2_SERVICE: &str = "ec2";

/// Signing name and endpoint prefix of ELBv2
const ELB_SERVICE: &str = "elasticloadbalancing";

/// Main AWS client.
///
/// Immutable once built; clone or share it behind an `Arc`.
#[derive(Clone)]
pub struct AwsClient {
    credentials: Option<Credentials>,
    http: AwsHttpClient,
    region: String,
    endpoint_override: Option<String>,
}

impl AwsClient {
    /// Create a new AWS client.
    ///
    /// Missing credentials are not an error here: every call then fails with
    /// [`ProviderError::CredentialsMissing`] without touching the network.
    pub fn new(
        credentials: Option<Credentials>,
        region: &str,
        endpoint_override: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            credentials,
            http: AwsHttpClient::new()?,
            region: region.to_string(),
            endpoint_override: endpoint_override.map(|e| e.trim_end_matches('/').to_string()),
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Build the Query API endpoint for a service
    pub fn endpoint(&self, service: &str) -> String {
        if let Some(url) = &self.endpoint_override {
            return format!("{}/", url);
        }
        if self.region.starts_with("cn-") {
            format!("https://{}.{}.amazonaws.com.cn/", service, self.region)
        } else {
            format!("https://{}.{}.amazonaws.com/", service, self.region)
        }
    }

    /// Send one signed Query API action and decode its XML response
    async fn query<T: DeserializeOwned>(
        &self,
        service: &str,
        version: &str,
        action: &str,
        mut params: BTreeMap<String, String>,
    ) -> ProviderResult<T> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ProviderError::CredentialsMissing)?;

        params.insert("Action".to_string(), action.to_string());
        params.insert("Version".to_string(), version.to_string());
        let body = encode_params(&params);

        let url = self.endpoint(service);
        let parsed = url::Url::parse(&url)
            .map_err(|e| ProviderError::unexpected(format!("Invalid endpoint {}: {}", url, e)))?;
        let host = match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(ProviderError::unexpected(format!("Invalid endpoint {}", url))),
        };

        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), host);
        headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded; charset=utf-8".to_string(),
        );
        SigV4Signer::new(credentials, &self.region, service).sign(
            "POST",
            parsed.path(),
            "",
            &mut headers,
            &body,
            Utc::now(),
        );

        tracing::debug!("{} {} ({})", service, action, self.region);
        let response = self.http.post_form(&url, &headers, body).await?;

        quick_xml::de::from_str(&response).map_err(|e| {
            ProviderError::unexpected(format!("Failed to parse {} response: {}", action, e))
        })
    }

    async fn ec2<T: DeserializeOwned>(
        &self,
        action: &str,
        params: BTreeMap<String, String>,
    ) -> ProviderResult<T> {
        self.query(EC2_SERVICE, EC2_API_VERSION, action, params).await
    }
}

#[async_trait]
impl ComputeApi for AwsClient {
    async fn verify_region(&self, region: &str) -> ProviderResult<()> {
        let mut params = BTreeMap::new();
        params.insert("RegionName.1".to_string(), region.to_string());

        let response: DescribeRegionsResponse = self.ec2("DescribeRegions", params).await?;
        if response.region_info.iter().any(|r| r.region_name == region) {
            Ok(())
        } else {
            Err(ProviderError::client(
                "InvalidRegion",
                &format!("Region {} is not available to this account", region),
                400,
            ))
        }
    }

    async fn describe_instances(&self) -> ProviderResult<Vec<Reservation>> {
        let response: DescribeInstancesResponse =
            self.ec2("DescribeInstances", BTreeMap::new()).await?;
        Ok(response.reservation_set)
    }

    async fn describe_vpcs(&self) -> ProviderResult<Vec<Vpc>> {
        let response: DescribeVpcsResponse = self.ec2("DescribeVpcs", BTreeMap::new()).await?;
        Ok(response.vpc_set)
    }

    async fn describe_load_balancers(&self) -> ProviderResult<Vec<LoadBalancer>> {
        let response: DescribeLoadBalancersResponse = self
            .query(
                ELB_SERVICE,
                ELBV2_API_VERSION,
                "DescribeLoadBalancers",
                BTreeMap::new(),
            )
            .await?;
        Ok(response.result.load_balancers)
    }

    async fn describe_images(&self, query: &ImageQuery) -> ProviderResult<Vec<Image>> {
        let response: DescribeImagesResponse =
            self.ec2("DescribeImages", image_query_params(query)).await?;
        Ok(response.images_set)
    }
}

/// Query parameters of a `DescribeImages` call
pub fn image_query_params(query: &ImageQuery) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    for (i, owner) in query.owners.iter().enumerate() {
        params.insert(format!("Owner.{}", i + 1), owner.clone());
    }
    add_filters(&mut params, &query.filters);
    if let Some(max) = query.max_results {
        params.insert("MaxResults".to_string(), max.to_string());
    }
    params
}

/// Add `Filter.N.Name` / `Filter.N.Value.M` parameters
pub fn add_filters(params: &mut BTreeMap<String, String>, filters: &[Filter]) {
    for (i, filter) in filters.iter().enumerate() {
        params.insert(format!("Filter.{}.Name", i + 1), filter.name.clone());
        for (j, value) in filter.values.iter().enumerate() {
            params.insert(format!("Filter.{}.Value.{}", i + 1, j + 1), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regional_endpoint() {
        let client = AwsClient::new(None, "eu-west-1", None).unwrap();
        assert_eq!(client.endpoint("ec2"), "https://ec2.eu-west-1.amazonaws.com/");
        assert_eq!(
            client.endpoint("elasticloadbalancing"),
            "https://elasticloadbalancing.eu-west-1.amazonaws.com/"
        );
    }

    #[test]
    fn test_china_endpoint() {
        let client = AwsClient::new(None, "cn-north-1", None).unwrap();
        assert_eq!(client.endpoint("ec2"), "https://ec2.cn-north-1.amazonaws.com.cn/");
    }

    #[test]
    fn test_endpoint_override() {
        let client = AwsClient::new(None, "us-east-1", Some("http://localhost:4566/")).unwrap();
        assert_eq!(client.endpoint("ec2"), "http://localhost:4566/");
    }

    #[test]
    fn test_fallback_image_params() {
        let params = image_query_params(&ImageQuery::public_fallback());
        assert_eq!(params["Owner.1"], "amazon");
        assert_eq!(params["Filter.1.Name"], "name");
        assert_eq!(params["Filter.1.Value.1"], "amzn2-ami-hvm-*");
        assert_eq!(params["Filter.2.Name"], "state");
        assert_eq!(params["Filter.3.Value.1"], "x86_64");
        assert_eq!(params["MaxResults"], "5");
    }

    #[test]
    fn test_owned_image_params() {
        let params = image_query_params(&ImageQuery::owned_by_self());
        assert_eq!(params.len(), 1);
        assert_eq!(params["Owner.1"], "self");
    }

    #[tokio::test]
    async fn test_missing_credentials_short_circuit() {
        // Unroutable endpoint: the call must fail before any request is sent
        let client = AwsClient::new(None, "us-east-1", Some("http://192.0.2.1:9")).unwrap();
        assert_eq!(
            client.describe_vpcs().await,
            Err(ProviderError::CredentialsMissing)
        );
    }
}
