//! AWS Signature Version 4
//!
//! Only what the Query protocol needs: a POST with a form body to the service
//! root. See <https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_sigv-create-signed-request.html>.

use super::auth::Credentials;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Signs requests for one service in one region
#[derive(Clone)]
pub struct SigV4Signer<'a> {
    credentials: &'a Credentials,
    region: &'a str,
    service: &'a str,
}

impl<'a> SigV4Signer<'a> {
    pub fn new(credentials: &'a Credentials, region: &'a str, service: &'a str) -> Self {
        Self {
            credentials,
            region,
            service,
        }
    }

    /// Add `x-amz-date`, the optional security token and `authorization` to
    /// `headers`. `headers` must already contain `host`.
    pub fn sign(
        &self,
        method: &str,
        path: &str,
        query: &str,
        headers: &mut BTreeMap<String, String>,
        body: &str,
        timestamp: DateTime<Utc>,
    ) {
        let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = timestamp.format("%Y%m%d").to_string();

        headers.insert("x-amz-date".to_string(), amz_date.clone());
        if let Some(token) = &self.credentials.session_token {
            headers.insert("x-amz-security-token".to_string(), token.clone());
        }

        // BTreeMap keeps header names sorted; callers insert lowercase names
        let canonical_headers: String = headers
            .iter()
            .map(|(k, v)| format!("{}:{}\n", k, v.trim()))
            .collect();
        let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method,
            path,
            query,
            canonical_headers,
            signed_headers,
            sha256_hex(body.as_bytes())
        );

        let scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp, self.region, self.service
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            sha256_hex(canonical_request.as_bytes())
        );

        let signature = hex::encode(hmac_sha256(
            &self.signing_key(&date_stamp),
            string_to_sign.as_bytes(),
        ));

        headers.insert(
            "authorization".to_string(),
            format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.credentials.access_key_id, scope, signed_headers, signature
            ),
        );
    }

    fn signing_key(&self, date_stamp: &str) -> Vec<u8> {
        let secret = format!("AWS4{}", self.credentials.secret_access_key);
        let k_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes());
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, self.service.as_bytes());
        hmac_sha256(&k_service, b"aws4_request")
    }
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Encode parameters as `k=v&k=v`, sorted by key, RFC 3986 escaped.
///
/// The same string serves as form body and canonical query string.
pub fn encode_params(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn example_credentials() -> Credentials {
        Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            None,
        )
    }

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    // "get-vanilla" from the AWS SigV4 test suite
    #[test]
    fn test_get_vanilla_signature() {
        let credentials = example_credentials();
        let signer = SigV4Signer::new(&credentials, "us-east-1", "service");
        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), "example.amazonaws.com".to_string());

        let ts = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
        signer.sign("GET", "/", "", &mut headers, "", ts);

        assert_eq!(headers["x-amz-date"], "20150830T123600Z");
        assert_eq!(
            headers["authorization"],
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
    }

    #[test]
    fn test_session_token_is_signed() {
        let credentials = Credentials::new("ASIAEXAMPLE", "secret", Some("token123"));
        let signer = SigV4Signer::new(&credentials, "us-east-1", "ec2");
        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), "ec2.us-east-1.amazonaws.com".to_string());

        signer.sign("POST", "/", "", &mut headers, "Action=DescribeVpcs", Utc::now());

        assert_eq!(headers["x-amz-security-token"], "token123");
        assert!(headers["authorization"].contains("x-amz-security-token"));
    }

    #[test]
    fn test_encode_params_sorted_and_escaped() {
        let mut params = BTreeMap::new();
        params.insert("Version".to_string(), "2016-11-15".to_string());
        params.insert("Action".to_string(), "DescribeImages".to_string());
        params.insert("Filter.1.Value.1".to_string(), "amzn2-ami-hvm-*".to_string());

        assert_eq!(
            encode_params(&params),
            "Action=DescribeImages&Filter.1.Value.1=amzn2-ami-hvm-%2A&Version=2016-11-15"
        );
    }
}
