use serde::{Deserialize, Serialize};

use crate::error::VcError;

/// Configuration for the DID resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Universal-resolver base URLs, tried in order on a cache miss, e.g.
    /// `https://resolver.example.org/1.0/identifiers`.
    pub endpoints: Vec<String>,
    /// Upper bound on a single resolution request, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["https://dev.uniresolver.io/1.0/identifiers".into()],
            request_timeout_ms: 10_000,
        }
    }
}

/// Where a revocation list credential is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishMethod {
    GitHub,
    Hosted,
}

impl Default for PublishMethod {
    fn default() -> Self {
        Self::Hosted
    }
}

/// Options for the GitHub publishing backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubOptions {
    pub token: String,
    pub owner: String,
    pub repo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Options for the hosted publishing backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedOptions {
    /// Identifier the hosted credential is filed under.
    pub credential_id: String,
}

/// Per-issuer revocation list configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationConfig {
    /// Identifier of this revocation list.
    pub id: String,
    #[serde(default)]
    pub publish_method: PublishMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_hub_options: Option<GitHubOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosted_options: Option<HostedOptions>,
    /// Public URL of the published list credential, set after first publish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Number of bits in the revocation list.
    pub list_size: i64,
}

impl RevocationConfig {
    /// Structural validation before any list is built or published.
    pub fn validate(&self) -> Result<(), VcError> {
        if self.id.is_empty() {
            return Err(VcError::InvalidRequest(
                "revocation config id is required".into(),
            ));
        }
        if self.list_size <= 0 {
            return Err(VcError::InvalidRequest(format!(
                "listSize must be a positive number, got {}",
                self.list_size
            )));
        }
        match self.publish_method {
            PublishMethod::GitHub if self.git_hub_options.is_none() => {
                Err(VcError::InvalidRequest(
                    "publishMethod is github but gitHubOptions is missing".into(),
                ))
            }
            PublishMethod::Hosted if self.hosted_options.is_none() => {
                Err(VcError::InvalidRequest(
                    "publishMethod is hosted but hostedOptions is missing".into(),
                ))
            }
            _ => Ok(()),
        }
    }

    pub fn list_size(&self) -> usize {
        self.list_size.max(0) as usize
    }
}
