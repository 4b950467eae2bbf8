//! Pre-crypto structural rules for credentials.
//!
//! These checks run before any resolution or signature work, so malformed
//! documents are rejected without a single network or cryptographic call.

use attesta_core::classify::CONTEXT_ORDER_MESSAGE;
use attesta_core::document::{Credential, ASSERTION_METHOD, W3C_VC_CONTEXT};
use attesta_core::VcError;

/// Validate the shape of a credential submitted for verification.
pub fn verify_credential_structure(credential: Option<&Credential>) -> Result<(), VcError> {
    let Some(credential) = credential else {
        return Err(VcError::InvalidCredentialStructure(
            "No verifiableCredential in request.".into(),
        ));
    };
    let Some(proof) = credential.first_proof() else {
        return Err(VcError::InvalidCredentialStructure(
            "Verifiable credential requires proof.".into(),
        ));
    };
    if proof.verification_method.is_none() {
        return Err(VcError::InvalidCredentialStructure(
            "Credential proof verification method not found.".into(),
        ));
    }
    let Some(purpose) = proof.proof_purpose.as_ref() else {
        return Err(VcError::InvalidCredentialStructure(
            "Credential proof requires proof purpose field.".into(),
        ));
    };
    if purpose.id() != ASSERTION_METHOD {
        return Err(VcError::InvalidCredentialStructure(format!(
            "Expected proof.proofPurpose to be assertionMethod. Got: {}",
            purpose.id()
        )));
    }
    if proof.created.is_none() {
        return Err(VcError::InvalidCredentialStructure(
            "Proof must contain created field.".into(),
        ));
    }
    Ok(())
}

/// Validate the shape of an unsigned credential submitted for issuance.
///
/// Context ordering is an issuance-time-only rule: verification must
/// tolerate already-issued documents from other issuers.
pub fn assert_valid_issuance_credential(credential: Option<&Credential>) -> Result<(), VcError> {
    let Some(credential) = credential else {
        return Err(VcError::InvalidCredentialStructure(
            "Request must contain a credential".into(),
        ));
    };
    if credential.context.is_none() {
        return Err(VcError::InvalidCredentialStructure(
            "Credential must contain a context".into(),
        ));
    }
    if credential.issuer.is_none() {
        return Err(VcError::InvalidCredentialStructure(
            "Credential must have an issuer".into(),
        ));
    }
    if credential.first_context() != Some(W3C_VC_CONTEXT) {
        return Err(VcError::InvalidCredentialStructure(
            CONTEXT_ORDER_MESSAGE.into(),
        ));
    }
    Ok(())
}
