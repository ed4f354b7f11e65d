//! HTTP utilities for AWS Query API calls

use super::model::ErrorResponse;
use super::{ProviderError, ProviderResult};
use anyhow::{Context, Result};
use reqwest::Client;
use std::collections::BTreeMap;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for signed AWS calls
#[derive(Clone)]
pub struct AwsHttpClient {
    client: Client,
}

impl AwsHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("awsdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// POST an already signed Query API request and return the response body.
    ///
    /// `headers` are sent as-is; `host` is left to reqwest.
    pub async fn post_form(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: String,
    ) -> ProviderResult<String> {
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url).body(body);
        for (name, value) in headers.iter().filter(|(name, _)| name.as_str() != "host") {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::unexpected(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::unexpected(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(parse_error_response(status.as_u16(), &body));
        }

        Ok(body)
    }
}

/// Turn a non-2xx response into a [`ProviderError::Client`].
///
/// Bodies that are not an AWS error document still count as a service
/// answer, with the HTTP status as the only information.
pub fn parse_error_response(status: u16, body: &str) -> ProviderError {
    let detail = quick_xml::de::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(ErrorResponse::into_detail)
        .filter(|detail| !detail.code.is_empty());

    match detail {
        Some(detail) => ProviderError::client(&detail.code, &detail.message, status),
        None => ProviderError::client(
            "Unknown",
            &format!("API request failed: HTTP {}", status),
            status,
        ),
    }
}

/// Format a provider error for display
/// Security: Sanitizes error messages to avoid leaking API details
pub fn format_aws_error(error: &ProviderError) -> String {
    let (code, status) = match error {
        ProviderError::CredentialsMissing => {
            return "AWS credentials not found. Please set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY environment variables.".to_string();
        }
        ProviderError::Client { code, status, .. } => (code.as_str(), *status),
        ProviderError::Unexpected(message) => return truncate_message(message),
    };

    match (code, status) {
        ("AuthFailure" | "InvalidClientTokenId" | "SignatureDoesNotMatch", _) | (_, 401) => {
            "Authentication failed. Check AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY.".to_string()
        }
        ("UnauthorizedOperation" | "AccessDenied", _) | (_, 403) => {
            "Permission denied. Check the IAM permissions of these credentials.".to_string()
        }
        ("RequestExpired", _) => "Request expired. Check the system clock.".to_string(),
        ("InvalidParameterValue" | "InvalidRegion", _) | (_, 400) => {
            "Invalid request. Check the configured region.".to_string()
        }
        ("RequestLimitExceeded" | "Throttling", _) | (_, 429) => {
            "Rate limit exceeded. Please try again later.".to_string()
        }
        (_, 500..=599) => "AWS service temporarily unavailable. Please try again.".to_string(),
        _ => truncate_message(&error.to_string()),
    }
}

// Truncate long error messages and drop non-printable characters
fn truncate_message(message: &str) -> String {
    let sanitized = message
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(120)
        .collect::<String>();

    if sanitized.len() < message.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(200)));
        assert!(sanitized.ends_with("[truncated, 500 bytes total]"));
    }

    #[test]
    fn test_parse_error_response_without_xml() {
        let err = parse_error_response(502, "<html>bad gateway</html>");
        assert_eq!(
            err,
            ProviderError::client("Unknown", "API request failed: HTTP 502", 502)
        );
    }

    #[test]
    fn test_format_auth_failure() {
        let err = ProviderError::client("AuthFailure", "validation failed", 401);
        assert!(format_aws_error(&err).starts_with("Authentication failed"));
    }

    #[test]
    fn test_format_permission_denied() {
        let err = ProviderError::client("UnauthorizedOperation", "not allowed", 403);
        assert!(format_aws_error(&err).starts_with("Permission denied"));
    }

    #[test]
    fn test_format_unexpected_is_truncated() {
        let err = ProviderError::unexpected("e".repeat(300));
        let formatted = format_aws_error(&err);
        assert!(formatted.ends_with("..."));
        assert_eq!(formatted.len(), 123);
    }
}
