//! AWS Credentials
//!
//! Resolves credentials from explicitly configured keys first, then from the
//! shared credentials file (`~/.aws/credentials`).

use std::fmt;
use std::path::{Path, PathBuf};

/// Profile used when `AWS_PROFILE` is not set
pub const DEFAULT_PROFILE: &str = "default";

/// Static credentials used to sign requests
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(access_key_id: &str, secret_access_key: &str, session_token: Option<&str>) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: session_token.map(str::to_string),
        }
    }
}

// Secrets never reach logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &mask_key(&self.access_key_id))
            .field("secret_access_key", &"****")
            .field("session_token", &self.session_token.as_ref().map(|_| "****"))
            .finish()
    }
}

/// Keep the first four characters of an access key id, e.g. `AKIA****`
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}****", visible)
}

/// Where credentials may come from, in resolution order
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub profile: Option<String>,
    pub shared_credentials_file: Option<PathBuf>,
}

/// Where the resolved credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOrigin {
    Environment,
    SharedFile,
}

/// Resolve credentials, or `None` when nothing usable is configured.
///
/// A half-configured key pair (only one of the two keys) is not usable and
/// falls through to the shared credentials file.
pub fn resolve_credentials(sources: &CredentialSources) -> Option<(Credentials, CredentialOrigin)> {
    if let (Some(key), Some(secret)) = (&sources.access_key_id, &sources.secret_access_key) {
        return Some((
            Credentials::new(key, secret, sources.session_token.as_deref()),
            CredentialOrigin::Environment,
        ));
    }

    let path = sources
        .shared_credentials_file
        .clone()
        .or_else(default_credentials_path)?;
    let profile = sources.profile.as_deref().unwrap_or(DEFAULT_PROFILE);

    let credentials = read_credentials_file(&path, profile)?;
    tracing::debug!("Using credentials from profile '{}' in {:?}", profile, path);
    Some((credentials, CredentialOrigin::SharedFile))
}

/// `~/.aws/credentials`
pub fn default_credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".aws").join("credentials"))
}

fn read_credentials_file(path: &Path, profile: &str) -> Option<Credentials> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_credentials_file(&content, profile)
}

/// Parse an INI-style shared credentials file and return one profile.
pub fn parse_credentials_file(content: &str, profile: &str) -> Option<Credentials> {
    let mut in_profile = false;
    let mut access_key_id = None;
    let mut secret_access_key = None;
    let mut session_token = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_profile = line[1..line.len() - 1].trim() == profile;
            continue;
        }
        if !in_profile {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().to_string();
        if value.is_empty() {
            continue;
        }
        match key.trim() {
            "aws_access_key_id" => access_key_id = Some(value),
            "aws_secret_access_key" => secret_access_key = Some(value),
            "aws_session_token" => session_token = Some(value),
            _ => {}
        }
    }

    Some(Credentials {
        access_key_id: access_key_id?,
        secret_access_key: secret_access_key?,
        session_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "\
# comment
[default]
aws_access_key_id = AKIADEFAULT
aws_secret_access_key = defaultsecret

[staging]
aws_access_key_id=AKIASTAGING
aws_secret_access_key=stagingsecret
aws_session_token=token123
";

    #[test]
    fn test_parse_default_profile() {
        let creds = parse_credentials_file(FILE, "default").unwrap();
        assert_eq!(creds.access_key_id, "AKIADEFAULT");
        assert_eq!(creds.secret_access_key, "defaultsecret");
        assert_eq!(creds.session_token, None);
    }

    #[test]
    fn test_parse_named_profile_with_token() {
        let creds = parse_credentials_file(FILE, "staging").unwrap();
        assert_eq!(creds.access_key_id, "AKIASTAGING");
        assert_eq!(creds.session_token.as_deref(), Some("token123"));
    }

    #[test]
    fn test_parse_missing_profile() {
        assert!(parse_credentials_file(FILE, "prod").is_none());
    }

    #[test]
    fn test_parse_incomplete_profile() {
        let content = "[default]\naws_access_key_id = AKIAONLY\n";
        assert!(parse_credentials_file(content, "default").is_none());
    }

    #[test]
    fn test_explicit_keys_win() {
        let sources = CredentialSources {
            access_key_id: Some("AKIAENV".to_string()),
            secret_access_key: Some("envsecret".to_string()),
            shared_credentials_file: Some(PathBuf::from("/nonexistent/credentials")),
            ..Default::default()
        };
        let (creds, origin) = resolve_credentials(&sources).unwrap();
        assert_eq!(creds.access_key_id, "AKIAENV");
        assert_eq!(origin, CredentialOrigin::Environment);
    }

    #[test]
    fn test_half_configured_keys_fall_through() {
        let sources = CredentialSources {
            access_key_id: Some("AKIAENV".to_string()),
            shared_credentials_file: Some(PathBuf::from("/nonexistent/credentials")),
            ..Default::default()
        };
        assert!(resolve_credentials(&sources).is_none());
    }

    #[test]
    fn test_debug_masks_secrets() {
        let creds = Credentials::new("AKIASECRETKEY", "topsecret", Some("tok"));
        let debug = format!("{:?}", creds);
        assert!(debug.contains("AKIA****"));
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("tok\""));
    }
}
