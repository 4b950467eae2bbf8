//! Document loader: dereferences the URLs verification touches — JSON-LD
//! context URLs, `did:` URIs, and revocation-list credential URLs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use attesta_core::VcError;
use attesta_did::Resolver;

/// A dereferenced document plus the URLs it was loaded under.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Value,
    pub document_url: String,
    pub context_url: Option<String>,
}

#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<LoadedDocument, VcError>;
}

/// Default loader: bundled contexts first, then registered documents, then
/// DID resolution for `did:` URIs, then a bounded HTTPS fetch.
pub struct StaticDocumentLoader {
    contexts: HashMap<String, Value>,
    documents: DashMap<String, Value>,
    resolver: Option<Arc<Resolver>>,
    client: reqwest::Client,
    fetch_timeout: Duration,
    allow_network: bool,
}

impl StaticDocumentLoader {
    pub fn new() -> Self {
        Self {
            contexts: HashMap::new(),
            documents: DashMap::new(),
            resolver: None,
            client: reqwest::Client::new(),
            fetch_timeout: Duration::from_secs(10),
            allow_network: false,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Permit network fetches for unknown HTTPS URLs.
    pub fn with_network(mut self, timeout: Duration) -> Self {
        self.allow_network = true;
        self.fetch_timeout = timeout;
        self
    }

    /// Register a bundled JSON-LD context.
    pub fn register_context(&mut self, url: impl Into<String>, document: Value) {
        self.contexts.insert(url.into(), document);
    }

    /// Register a document under a URL, e.g. a published revocation list
    /// credential.
    pub fn insert_document(&self, url: impl Into<String>, document: Value) {
        self.documents.insert(url.into(), document);
    }

    pub fn get_document(&self, url: &str) -> Option<Value> {
        self.documents.get(url).map(|entry| entry.clone())
    }

    pub fn remove_document(&self, url: &str) -> Option<Value> {
        self.documents.remove(url).map(|(_, doc)| doc)
    }

    async fn fetch(&self, url: &str) -> Result<Value, VcError> {
        let response = tokio::time::timeout(self.fetch_timeout, self.client.get(url).send())
            .await
            .map_err(|_| VcError::ResourceNotFound(format!("document fetch timed out: {}", url)))?
            .map_err(|e| VcError::ResourceNotFound(format!("could not load {}: {}", url, e)))?;
        response
            .json()
            .await
            .map_err(|e| VcError::ResourceNotFound(format!("could not load {}: {}", url, e)))
    }
}

impl Default for StaticDocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentLoader for StaticDocumentLoader {
    async fn load(&self, url: &str) -> Result<LoadedDocument, VcError> {
        if let Some(context) = self.contexts.get(url) {
            return Ok(LoadedDocument {
                document: context.clone(),
                document_url: url.to_string(),
                context_url: Some(url.to_string()),
            });
        }
        if let Some(document) = self.get_document(url) {
            debug!(url = url, "loaded registered document");
            return Ok(LoadedDocument {
                document,
                document_url: url.to_string(),
                context_url: None,
            });
        }
        if url.starts_with("did:") {
            let resolver = self.resolver.as_ref().ok_or_else(|| {
                VcError::ResourceNotFound(format!("no resolver configured for {}", url))
            })?;
            let document = resolver.resolve(url).await?;
            return Ok(LoadedDocument {
                document: serde_json::to_value(document)?,
                document_url: url.to_string(),
                context_url: None,
            });
        }
        if self.allow_network && url.starts_with("https://") {
            let document = self.fetch(url).await?;
            return Ok(LoadedDocument {
                document,
                document_url: url.to_string(),
                context_url: None,
            });
        }
        Err(VcError::ResourceNotFound(format!(
            "could not load document: {}",
            url
        )))
    }
}
