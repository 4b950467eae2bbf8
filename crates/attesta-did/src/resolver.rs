use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use tracing::{debug, warn};

use attesta_core::{ResolverConfig, VcError};

use crate::document::DidDocument;

/// Read-only DID document lookup consulted before any network resolution.
///
/// Injected rather than global so tests can supply doubles and deployments
/// can refresh the cache at runtime.
pub trait DidCache: Send + Sync {
    fn get(&self, did: &str) -> Option<DidDocument>;
}

/// In-memory cache, typically seeded from a bundled document set.
#[derive(Default)]
pub struct StaticDidCache {
    documents: DashMap<String, DidDocument>,
}

impl StaticDidCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, document: DidDocument) {
        self.documents.insert(document.id.clone(), document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DidCache for StaticDidCache {
    fn get(&self, did: &str) -> Option<DidDocument> {
        self.documents.get(did).map(|entry| entry.clone())
    }
}

/// Splits a verification method URI into its DID part.
///
/// The URI must have the form `{did}#{key-fragment}` with both sides
/// non-empty; anything else fails fast as a request error before any
/// resolution or cryptographic work.
pub fn extract_did_from_verification_method(verification_method: &str) -> Result<&str, VcError> {
    match verification_method.split_once('#') {
        Some((did, fragment)) if !did.is_empty() && !fragment.is_empty() => Ok(did),
        _ => Err(VcError::InvalidRequest(format!(
            "Invalid verification method. Received: {} but expected something of the form {{identifier}}#{{key-id}}",
            verification_method
        ))),
    }
}

/// Cache-first DID resolver with a universal-resolver HTTP fallback.
pub struct Resolver {
    cache: Arc<dyn DidCache>,
    config: ResolverConfig,
    client: reqwest::Client,
}

impl Resolver {
    pub fn new(cache: Arc<dyn DidCache>, config: ResolverConfig) -> Self {
        Self {
            cache,
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Resolve a DID to its document: cached documents win, otherwise the
    /// configured endpoints are tried in order under a bounded timeout.
    /// The first endpoint returning a usable `didDocument` wins; failures
    /// are logged and the next endpoint is tried.
    pub async fn resolve(&self, did: &str) -> Result<DidDocument, VcError> {
        if let Some(document) = self.cache.get(did) {
            debug!(did = did, "resolved DID from cache");
            return Ok(document);
        }
        for endpoint in &self.config.endpoints {
            match self.fetch(endpoint, did).await {
                Ok(Some(document)) => {
                    debug!(did = did, endpoint = endpoint, "resolved DID from endpoint");
                    return Ok(document);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(did = did, endpoint = endpoint, error = %e, "endpoint resolution failed");
                }
            }
        }
        Err(VcError::ResourceNotFound(format!(
            "No did document could be found for {}",
            did
        )))
    }

    /// One endpoint round trip. A response without a usable `didDocument`
    /// is treated as not-found, not as an error.
    async fn fetch(&self, endpoint: &str, did: &str) -> Result<Option<DidDocument>, VcError> {
        let url = format!("{}/{}", endpoint, did);
        let timeout = Duration::from_millis(self.config.request_timeout_ms);

        let response = tokio::time::timeout(timeout, self.client.get(&url).send())
            .await
            .map_err(|_| VcError::ResourceNotFound(format!("DID resolution timed out: {}", did)))?
            .map_err(|e| VcError::ResourceNotFound(format!("DID resolution failed: {}", e)))?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| VcError::ResourceNotFound(format!("DID resolution failed: {}", e)))?;

        match body.get("didDocument") {
            Some(doc) if doc.is_object() => {
                let document: DidDocument = serde_json::from_value(doc.clone())?;
                Ok(Some(document))
            }
            _ => Ok(None),
        }
    }

    /// Validate that a DID authorizes the given assertion method.
    ///
    /// With no method requested there is nothing to check. The DID defaults
    /// to the one embedded in the method URI when not supplied.
    pub async fn validate_assertion_method(
        &self,
        assertion_method: Option<&str>,
        did: Option<&str>,
    ) -> Result<Option<String>, VcError> {
        let Some(method) = assertion_method else {
            return Ok(None);
        };
        let did_uri = match did {
            Some(did) => did,
            None => extract_did_from_verification_method(method)?,
        };
        let document = self.resolve(did_uri).await?;
        if document.assertion_method.is_empty() {
            return Err(VcError::InvalidRequest(format!(
                "DID has no authorized assertionMethod. Supplied DID: {}",
                did_uri
            )));
        }
        if !document.authorizes_assertion_method(method) {
            return Err(VcError::InvalidRequest(format!(
                "DID has not authorized assertionMethod. Supplied DID: {}",
                did_uri
            )));
        }
        Ok(Some(did_uri.to_string()))
    }
}
