//! Integration tests for the AWS Query API client using wiremock
//!
//! The client is pointed at a mock server through its endpoint override, so
//! these tests exercise signing, form encoding, XML decoding and error
//! mapping end to end.

use awsdash::aws::auth::Credentials;
use awsdash::aws::client::AwsClient;
use awsdash::aws::model::ImageQuery;
use awsdash::aws::{ComputeApi, ProviderError};
use awsdash::resource::{aggregate, load_dashboard, ConnectionStatus, Dashboard, ResourceKind};
use wiremock::matchers::{body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INSTANCES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DescribeInstancesResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>req-1</requestId>
    <reservationSet>
        <item>
            <reservationId>r-1</reservationId>
            <instancesSet>
                <item>
                    <instanceId>i-12345678</instanceId>
                    <instanceState><code>16</code><name>running</name></instanceState>
                    <instanceType>t3.medium</instanceType>
                    <ipAddress>1.2.3.4</ipAddress>
                </item>
            </instancesSet>
        </item>
    </reservationSet>
</DescribeInstancesResponse>"#;

const VPCS_XML: &str = r#"<DescribeVpcsResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>req-2</requestId>
    <vpcSet>
        <item>
            <vpcId>vpc-12345678</vpcId>
            <state>available</state>
            <cidrBlock>10.0.0.0/16</cidrBlock>
            <isDefault>true</isDefault>
        </item>
    </vpcSet>
</DescribeVpcsResponse>"#;

const NO_LOAD_BALANCERS_XML: &str = r#"<DescribeLoadBalancersResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2015-12-01/">
    <DescribeLoadBalancersResult><LoadBalancers/></DescribeLoadBalancersResult>
    <ResponseMetadata><RequestId>req-3</RequestId></ResponseMetadata>
</DescribeLoadBalancersResponse>"#;

const NO_IMAGES_XML: &str = r#"<DescribeImagesResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>req-4</requestId>
    <imagesSet/>
</DescribeImagesResponse>"#;

const FALLBACK_IMAGES_XML: &str = r#"<DescribeImagesResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>req-5</requestId>
    <imagesSet>
        <item>
            <imageId>ami-0abcdef1234567890</imageId>
            <name>amzn2-ami-hvm-2.0.20240101.0-x86_64-gp2</name>
            <imageState>available</imageState>
            <architecture>x86_64</architecture>
        </item>
    </imagesSet>
</DescribeImagesResponse>"#;

const REGIONS_XML: &str = r#"<DescribeRegionsResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>req-6</requestId>
    <regionInfo>
        <item>
            <regionName>us-east-1</regionName>
            <regionEndpoint>ec2.us-east-1.amazonaws.com</regionEndpoint>
        </item>
    </regionInfo>
</DescribeRegionsResponse>"#;

const AUTH_FAILURE_XML: &str = r#"<Response><Errors><Error><Code>AuthFailure</Code><Message>AWS was not able to validate the provided access credentials</Message></Error></Errors><RequestID>req-7</RequestID></Response>"#;

fn test_client(server: &MockServer) -> AwsClient {
    let credentials = Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY", None);
    AwsClient::new(Some(credentials), "us-east-1", Some(&server.uri())).unwrap()
}

async fn mount_action(server: &MockServer, action: &str, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains(format!("Action={}", action)))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Test module for the signed Query API client
mod client_tests {
    use super::*;

    /// Requests are signed POSTs carrying the action and API version
    #[tokio::test]
    async fn test_describe_instances_signed_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header_exists("authorization"))
            .and(header_exists("x-amz-date"))
            .and(body_string_contains("Action=DescribeInstances"))
            .and(body_string_contains("Version=2016-11-15"))
            .respond_with(ResponseTemplate::new(200).set_body_string(INSTANCES_XML))
            .expect(1)
            .mount(&server)
            .await;

        let reservations = test_client(&server).describe_instances().await.unwrap();
        assert_eq!(reservations.len(), 1);
        assert_eq!(reservations[0].instances[0].instance_id, "i-12345678");
        assert_eq!(reservations[0].instances[0].instance_type, "t3.medium");
    }

    /// Load balancer calls use the ELBv2 API version
    #[tokio::test]
    async fn test_describe_load_balancers_version() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string_contains("Action=DescribeLoadBalancers"))
            .and(body_string_contains("Version=2015-12-01"))
            .respond_with(ResponseTemplate::new(200).set_body_string(NO_LOAD_BALANCERS_XML))
            .expect(1)
            .mount(&server)
            .await;

        let lbs = test_client(&server).describe_load_balancers().await.unwrap();
        assert!(lbs.is_empty());
    }

    /// Fallback image query carries owner and filter parameters
    #[tokio::test]
    async fn test_describe_images_fallback_params() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string_contains("Action=DescribeImages"))
            .and(body_string_contains("Owner.1=amazon"))
            .and(body_string_contains("Filter.1.Value.1=amzn2-ami-hvm-%2A"))
            .and(body_string_contains("MaxResults=5"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FALLBACK_IMAGES_XML))
            .expect(1)
            .mount(&server)
            .await;

        let images = test_client(&server)
            .describe_images(&ImageQuery::public_fallback())
            .await
            .unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].image_id, "ami-0abcdef1234567890");
    }

    /// Test 401 response maps to a client error with the AWS code
    #[tokio::test]
    async fn test_401_returns_client_error() {
        let server = MockServer::start().await;
        mount_action(&server, "DescribeVpcs", 401, AUTH_FAILURE_XML).await;

        let err = test_client(&server).describe_vpcs().await.unwrap_err();
        match err {
            ProviderError::Client { code, status, .. } => {
                assert_eq!(code, "AuthFailure");
                assert_eq!(status, 401);
            }
            other => panic!("expected client error, got {:?}", other),
        }
    }

    /// Test unparseable error body still yields a client error
    #[tokio::test]
    async fn test_500_with_html_body() {
        let server = MockServer::start().await;
        mount_action(&server, "DescribeVpcs", 500, "<html>oops</html>").await;

        let err = test_client(&server).describe_vpcs().await.unwrap_err();
        assert!(matches!(err, ProviderError::Client { status: 500, .. }));
    }

    /// Test malformed success body is an unexpected error
    #[tokio::test]
    async fn test_malformed_xml_is_unexpected() {
        let server = MockServer::start().await;
        mount_action(&server, "DescribeVpcs", 200, "<DescribeVpcsResponse><vpcSet><item>").await;

        let err = test_client(&server).describe_vpcs().await.unwrap_err();
        assert!(matches!(err, ProviderError::Unexpected(_)));
    }

    /// Test unreachable endpoint is an unexpected error
    #[tokio::test]
    async fn test_connection_refused_is_unexpected() {
        // Nothing listens on port 1
        let credentials = Credentials::new("AKIDEXAMPLE", "secret", None);
        let client =
            AwsClient::new(Some(credentials), "us-east-1", Some("http://127.0.0.1:1")).unwrap();
        let err = client.describe_vpcs().await.unwrap_err();
        assert!(matches!(err, ProviderError::Unexpected(_)));
    }
}

/// Full dashboard loads against the mock server
mod dashboard_tests {
    use super::*;

    async fn mount_happy_path(server: &MockServer) {
        mount_action(server, "DescribeRegions", 200, REGIONS_XML).await;
        mount_action(server, "DescribeVpcs", 200, VPCS_XML).await;
        mount_action(server, "DescribeLoadBalancers", 200, NO_LOAD_BALANCERS_XML).await;

        Mock::given(method("POST"))
            .and(body_string_contains("Action=DescribeImages"))
            .and(body_string_contains("Owner.1=self"))
            .respond_with(ResponseTemplate::new(200).set_body_string(NO_IMAGES_XML))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("Action=DescribeImages"))
            .and(body_string_contains("Owner.1=amazon"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FALLBACK_IMAGES_XML))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_full_dashboard_counts() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;
        mount_action(&server, "DescribeInstances", 200, INSTANCES_XML).await;

        let client = test_client(&server);
        let Dashboard::Ready(result) = load_dashboard(&client, "us-east-1").await else {
            panic!("expected a connected dashboard");
        };

        assert_eq!(result.count(ResourceKind::Instances), 1);
        assert_eq!(result.count(ResourceKind::Networks), 1);
        assert_eq!(result.count(ResourceKind::LoadBalancers), 0);
        assert_eq!(result.count(ResourceKind::Images), 1);
        assert!(result.failed_kinds().is_empty());

        let instance = &result.section(ResourceKind::Instances).unwrap().display_rows()[0];
        assert_eq!(instance.get("Public IP"), Some("1.2.3.4"));
        assert_eq!(instance.get("State"), Some("running"));
    }

    #[tokio::test]
    async fn test_instances_failure_isolated() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;
        mount_action(&server, "DescribeInstances", 403, AUTH_FAILURE_XML).await;

        let result = aggregate(&test_client(&server)).await;

        assert_eq!(result.sections().len(), 4);
        assert_eq!(result.failed_kinds(), vec![ResourceKind::Instances]);
        assert_eq!(result.count(ResourceKind::Networks), 1);
        assert_eq!(result.count(ResourceKind::Images), 1);

        let rows = result.section(ResourceKind::Instances).unwrap().display_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("ID"), Some("Error fetching instances"));
    }

    #[tokio::test]
    async fn test_probe_auth_failure_skips_queries() {
        let server = MockServer::start().await;
        mount_action(&server, "DescribeRegions", 401, AUTH_FAILURE_XML).await;

        Mock::given(method("POST"))
            .and(body_string_contains("Action=DescribeInstances"))
            .respond_with(ResponseTemplate::new(200).set_body_string(INSTANCES_XML))
            .expect(0)
            .mount(&server)
            .await;

        let dashboard = load_dashboard(&test_client(&server), "us-east-1").await;
        assert!(matches!(
            dashboard,
            Dashboard::Disconnected(ConnectionStatus::ClientError(_))
        ));
    }
}
