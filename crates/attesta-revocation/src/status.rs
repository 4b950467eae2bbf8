//! Revocation-status cross-check for status-bearing credentials.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use attesta_core::document::{Credential, ASSERTION_METHOD};
use attesta_core::VcError;
use attesta_credentials::{
    ldp, DocumentLoader, RevocationOutcome, StatusChecker, SuiteResolver,
};

use crate::engine::check_revocation_status;

/// Composite revocation check: the subject credential's proof and the list
/// credential's proof must both verify before the bit is consulted. There
/// is no partial-trust state; any failure in the chain fails the check, so
/// a forged status reference cannot short-circuit proof verification.
pub struct RevocationVerifier {
    suites: SuiteResolver,
    loader: Arc<dyn DocumentLoader>,
}

impl RevocationVerifier {
    pub fn new(suites: SuiteResolver, loader: Arc<dyn DocumentLoader>) -> Self {
        Self { suites, loader }
    }

    async fn verify_proof_of(&self, credential: &Credential) -> Result<(), VcError> {
        let proof = credential
            .first_proof()
            .ok_or_else(|| VcError::InvalidRequest("Invalid proof!".into()))?;
        let suite = self.suites.resolve_suite(proof).await?;
        let document = credential.to_value()?;
        ldp::verify_proof(&document, proof, &suite, ASSERTION_METHOD)
    }
}

#[async_trait]
impl StatusChecker for RevocationVerifier {
    async fn check(&self, credential: &Credential) -> Result<RevocationOutcome, VcError> {
        // The subject credential's proof is verified without trusting any
        // embedded status claim.
        self.verify_proof_of(credential).await?;

        let status = credential.credential_status.as_ref().ok_or_else(|| {
            VcError::InvalidRequest("credential has no credentialStatus".into())
        })?;
        let list_url = status.revocation_list_credential.as_deref().ok_or_else(|| {
            VcError::InvalidRequest(
                "credentialStatus has no revocationListCredential".into(),
            )
        })?;

        let loaded = self.loader.load(list_url).await?;
        let list_credential: Credential = serde_json::from_value(loaded.document)?;

        // An unsigned list is untrustworthy; it must never silently read
        // as "not revoked".
        if list_credential.first_proof().is_none() {
            return Err(VcError::CredentialLoad(format!(
                "revocation list credential at {} carries no proof",
                list_url
            )));
        }
        self.verify_proof_of(&list_credential).await?;

        let index = status.index()?;
        let revoked = check_revocation_status(&list_credential, index)?;
        debug!(
            credential_id = credential.id.as_deref().unwrap_or(""),
            list = list_url,
            index = index,
            revoked = revoked,
            "revocation status checked"
        );
        Ok(RevocationOutcome {
            verified: true,
            revocation: !revoked,
        })
    }
}
