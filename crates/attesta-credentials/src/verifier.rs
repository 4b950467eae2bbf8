//! Verification engine: orchestrates structural validation, suite
//! resolution, proof verification, and the revocation cross-check.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, info};

use attesta_core::document::{Credential, Presentation, ASSERTION_METHOD};
use attesta_core::VcError;

use crate::ldp;
use crate::structure::verify_credential_structure;
use crate::suites::SuiteResolver;

/// Aggregate result of a successful verification. `checks` names the
/// integrity dimensions that passed; `revocation` appears only when a
/// status was declared and cross-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationOutcome {
    pub checks: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl VerificationOutcome {
    fn passed(checks: Vec<String>) -> Self {
        Self {
            checks,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Outcome of a revocation-status cross-check. `revocation` is true only
/// when the list credential verified and the subject's bit is clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevocationOutcome {
    pub verified: bool,
    pub revocation: bool,
}

/// Capability that cross-checks a status-bearing credential against its
/// revocation list. Implemented by the revocation engine; injected here to
/// keep proof verification and status-list trust decoupled.
#[async_trait]
pub trait StatusChecker: Send + Sync {
    async fn check(&self, credential: &Credential) -> Result<RevocationOutcome, VcError>;
}

pub struct VerificationEngine {
    suites: SuiteResolver,
    status_checker: Option<Arc<dyn StatusChecker>>,
}

impl VerificationEngine {
    pub fn new(suites: SuiteResolver) -> Self {
        Self {
            suites,
            status_checker: None,
        }
    }

    pub fn with_status_checker(mut self, checker: Arc<dyn StatusChecker>) -> Self {
        self.status_checker = Some(checker);
        self
    }

    /// Verify a standalone credential.
    ///
    /// A declared `credentialStatus` routes the whole check through the
    /// revocation path; otherwise only the proof is verified, and
    /// `revocation` is never claimed as checked.
    pub async fn verify_credential(
        &self,
        credential: &Credential,
    ) -> Result<VerificationOutcome, VcError> {
        verify_credential_structure(Some(credential))?;

        if credential.credential_status.is_some() {
            let outcome = self.check_status(credential).await?;
            if !outcome.verified {
                return Err(VcError::InvalidProof("Invalid signature.".into()));
            }
            if !outcome.revocation {
                return Err(VcError::Verification(
                    "Credential has been revoked".into(),
                ));
            }
            info!(
                credential_id = credential.id.as_deref().unwrap_or(""),
                "credential verified with revocation"
            );
            return Ok(VerificationOutcome::passed(vec![
                "proof".into(),
                "revocation".into(),
            ]));
        }

        self.verify_credential_proof(credential).await?;
        info!(
            credential_id = credential.id.as_deref().unwrap_or(""),
            "credential verified"
        );
        Ok(VerificationOutcome::passed(vec!["proof".into()]))
    }

    /// Verify a presentation and every credential inside it.
    ///
    /// Per-credential proof and revocation checks are independent and run
    /// concurrently; the presentation proof is checked against the supplied
    /// challenge after the fan-in.
    pub async fn verify_presentation(
        &self,
        presentation: &Presentation,
        challenge: Option<&str>,
    ) -> Result<VerificationOutcome, VcError> {
        let proof = presentation
            .first_proof()
            .ok_or_else(|| VcError::InvalidRequest("Invalid proof!".into()))?;
        let Some(challenge) = challenge else {
            return Err(VcError::InvalidRequest(
                "A challenge is required to verify a presentation.".into(),
            ));
        };

        let credentials = presentation.credentials();
        let proof_checks = credentials
            .iter()
            .filter(|vc| vc.proof.is_some())
            .map(|vc| self.verify_credential_proof(vc));
        let status_checks = credentials
            .iter()
            .filter(|vc| vc.credential_status.is_some())
            .map(|vc| self.check_status(vc));
        let (_, revocations) = futures::try_join!(
            try_join_all(proof_checks),
            try_join_all(status_checks)
        )?;

        if proof.challenge.as_deref() != Some(challenge) {
            return Err(VcError::InvalidProof(
                "Presentation challenge does not match.".into(),
            ));
        }
        let suite = self.suites.resolve_suite(proof).await?;
        let document = presentation.to_value()?;
        ldp::verify_proof(&document, proof, &suite, "authentication")?;

        let mut checks = vec!["proof".to_string()];
        if !revocations.is_empty() {
            if revocations.iter().all(|r| r.verified && r.revocation) {
                checks.push("revocation".into());
            } else {
                return Err(VcError::Verification(
                    "One or more credentials in the presentation has been revoked".into(),
                ));
            }
        }
        info!(
            holder = presentation.holder.as_deref().unwrap_or(""),
            credentials = credentials.len(),
            "presentation verified"
        );
        Ok(VerificationOutcome::passed(checks))
    }

    async fn verify_credential_proof(&self, credential: &Credential) -> Result<(), VcError> {
        let proof = credential
            .first_proof()
            .ok_or_else(|| VcError::InvalidRequest("Invalid proof!".into()))?;
        let suite = self.suites.resolve_suite(proof).await?;
        let document = credential.to_value()?;
        ldp::verify_proof(&document, proof, &suite, ASSERTION_METHOD)?;
        debug!(
            credential_id = credential.id.as_deref().unwrap_or(""),
            suite = suite.suite_type(),
            "credential proof verified"
        );
        Ok(())
    }

    async fn check_status(&self, credential: &Credential) -> Result<RevocationOutcome, VcError> {
        let checker = self.status_checker.as_ref().ok_or_else(|| {
            VcError::Api("credential declares a status but no revocation checker is configured".into())
        })?;
        checker.check(credential).await
    }
}
