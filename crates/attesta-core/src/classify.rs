//! Normalizes raw library failures into the closed [`VcError`] taxonomy.
//!
//! Proof and JSON-LD libraries report failures as loosely shaped error
//! objects whose messages are not a stable contract. Everything crossing the
//! subsystem boundary is funneled through here; unrecognized shapes collapse
//! to [`VcError::Api`] with a generic message and a log line for taxonomy
//! review.

use tracing::warn;

use crate::error::VcError;

/// Exact ordering message produced when the VC v1 context is not the first
/// `@context` entry. Matched verbatim by the classifier.
pub const CONTEXT_ORDER_MESSAGE: &str =
    "https://www.w3.org/2018/credentials/v1 needs to be first in the list of contexts.";

const INVALID_SIGNATURE_MESSAGE: &str = "Invalid signature.";
const NO_MATCHING_PROOFS_MESSAGE: &str =
    "Could not verify any proofs; no proofs matched the required suite and purpose.";
const UNDEFINED_IN_CONTEXT_MARKER: &str = "in the input was not defined in the context.";
const MISSING_PROPERTY_MARKER: &str = "property is required.";
const ID_NOT_URL_MARKER: &str = "id must be a URL";

/// A raw failure as surfaced by a proof or JSON-LD library: a name, a
/// message, optionally a list of nested error messages (multi-error
/// wrappers), and an optional details code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFailure {
    pub name: Option<String>,
    pub message: Option<String>,
    pub errors: Vec<String>,
    pub details_code: Option<String>,
    classified: Option<VcError>,
}

impl RawFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_nested(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_details_code(mut self, code: impl Into<String>) -> Self {
        self.details_code = Some(code.into());
        self
    }
}

impl From<VcError> for RawFailure {
    /// Already-classified errors pass through both classifiers unchanged.
    fn from(err: VcError) -> Self {
        Self {
            classified: Some(err),
            ..Self::default()
        }
    }
}

/// Maps a raw issuance failure to a domain error.
pub fn classify_issuance_error(raw: RawFailure) -> VcError {
    if let Some(err) = raw.classified {
        return err;
    }
    if raw.message.as_deref() == Some(CONTEXT_ORDER_MESSAGE) {
        return VcError::InvalidRequest("invalid context".into());
    }
    if raw.name.as_deref() == Some("jsonld.InvalidUrl") {
        return VcError::InvalidRequest("invalid context".into());
    }
    if raw.details_code.as_deref() == Some("loading remote context failed") {
        return VcError::InvalidRequest("invalid context".into());
    }
    warn!(
        name = raw.name.as_deref().unwrap_or(""),
        message = raw.message.as_deref().unwrap_or(""),
        "unclassified issuance failure"
    );
    VcError::Api("could not issue credential".into())
}

/// Maps a raw verification failure to a domain error.
pub fn classify_verification_error(raw: RawFailure) -> VcError {
    if let Some(err) = raw.classified {
        return err;
    }
    if let Some(first) = raw.errors.first() {
        if first == INVALID_SIGNATURE_MESSAGE {
            return VcError::InvalidProof("Invalid signature.".into());
        }
        if first == NO_MATCHING_PROOFS_MESSAGE {
            return VcError::InvalidProof("Malformed proof.".into());
        }
        if first.contains(UNDEFINED_IN_CONTEXT_MARKER) {
            return VcError::InvalidProof("Malformed proof.".into());
        }
    }
    if let Some(message) = raw.message.as_deref() {
        if message.contains(MISSING_PROPERTY_MARKER) {
            return VcError::InvalidProof("Missing property.".into());
        }
        if message.contains(ID_NOT_URL_MARKER) {
            return VcError::InvalidProof("Property must be a url".into());
        }
    }
    warn!(
        name = raw.name.as_deref().unwrap_or(""),
        message = raw.message.as_deref().unwrap_or(""),
        nested = raw.errors.len(),
        "unclassified verification failure"
    );
    VcError::Api("could not verify credential".into())
}
