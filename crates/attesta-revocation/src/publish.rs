//! Publishing backends for revocation list credentials.
//!
//! The publisher owns the persisted copy of the list credential. The
//! read-modify-write cycle on a given list (decode, flip bit, re-sign,
//! republish) is not atomic in this subsystem; the backing store must
//! serialize concurrent updates to the same list identifier.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use attesta_core::document::Credential;
use attesta_core::{HostedOptions, VcError};
use attesta_credentials::StaticDocumentLoader;

/// Swappable persistence backend, chosen by the configured publish method.
#[async_trait]
pub trait RevocationPublisher: Send + Sync {
    /// Persist the credential and return its public URL.
    async fn publish(&self, credential: &Credential) -> Result<String, VcError>;

    /// Fetch the currently published credential.
    async fn get_revocation_credential(&self) -> Result<Credential, VcError>;

    /// Reject configurations that would collide with an existing
    /// credential. Called once, at list-creation time.
    async fn validate(&self) -> Result<(), VcError>;
}

/// Publishes into the document store this host serves credentials from.
pub struct HostedPublisher {
    base_url: String,
    credential_id: String,
    store: Arc<StaticDocumentLoader>,
}

impl HostedPublisher {
    pub fn new(
        base_url: impl Into<String>,
        options: &HostedOptions,
        store: Arc<StaticDocumentLoader>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            credential_id: options.credential_id.clone(),
            store,
        }
    }

    pub fn url(&self) -> String {
        format!(
            "{}/services/credentials/{}/revocation-credential.jsonld",
            self.base_url, self.credential_id
        )
    }
}

#[async_trait]
impl RevocationPublisher for HostedPublisher {
    async fn publish(&self, credential: &Credential) -> Result<String, VcError> {
        let url = self.url();
        self.store.insert_document(&url, credential.to_value()?);
        info!(url = %url, "revocation credential published");
        Ok(url)
    }

    async fn get_revocation_credential(&self) -> Result<Credential, VcError> {
        let document = self.store.get_document(&self.url()).ok_or_else(|| {
            VcError::ResourceNotFound(format!(
                "Could not retrieve revocation credential with id: {}.",
                self.credential_id
            ))
        })?;
        Ok(serde_json::from_value(document)?)
    }

    async fn validate(&self) -> Result<(), VcError> {
        if self.credential_id.is_empty() {
            return Err(VcError::InvalidRequest(
                "No credentialId specified for hosted options.".into(),
            ));
        }
        if self.store.get_document(&self.url()).is_some() {
            return Err(VcError::ResourceConflict(format!(
                "Credential with id {} already exists.",
                self.credential_id
            )));
        }
        Ok(())
    }
}
