/// Closed taxonomy of externally visible errors.
///
/// Every failure that crosses the subsystem boundary is one of these kinds;
/// raw library errors are normalized through [`crate::classify`] first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VcError {
    /// Malformed input shape rejected before any cryptographic work.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Credential or presentation fails pre-crypto structural rules.
    #[error("invalid credential structure: {0}")]
    InvalidCredentialStructure(String),

    /// Requested issuer/proof-purpose/assertion-method combination is not
    /// permitted.
    #[error("invalid issuance options: {0}")]
    InvalidIssuanceOptions(String),

    /// Cryptographic or proof-shape failure.
    #[error("invalid proof: {0}")]
    InvalidProof(String),

    /// DID document, revocation config, or list credential cannot be located.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// Attempt to re-create an already-existing identifier.
    #[error("resource conflict: {0}")]
    ResourceConflict(String),

    /// A referenced credential resolves but is structurally unusable.
    #[error("credential load failed: {0}")]
    CredentialLoad(String),

    /// Composite verification failure not attributable to a single field.
    #[error("verification failed: {0}")]
    Verification(String),

    /// Unclassified fallback. Should be rare; logged for taxonomy review.
    #[error("internal error: {0}")]
    Api(String),
}

impl VcError {
    /// HTTP-like status code for this error kind.
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidRequest(_)
            | Self::InvalidCredentialStructure(_)
            | Self::InvalidIssuanceOptions(_)
            | Self::InvalidProof(_)
            | Self::Verification(_) => 400,
            Self::ResourceNotFound(_) => 404,
            Self::ResourceConflict(_) => 403,
            Self::CredentialLoad(_) | Self::Api(_) => 500,
        }
    }

    /// Stable kind name for logs and wire responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidCredentialStructure(_) => "invalid_credential_structure",
            Self::InvalidIssuanceOptions(_) => "invalid_issuance_options",
            Self::InvalidProof(_) => "invalid_proof",
            Self::ResourceNotFound(_) => "resource_not_found",
            Self::ResourceConflict(_) => "resource_conflict",
            Self::CredentialLoad(_) => "credential_load_error",
            Self::Verification(_) => "verification_error",
            Self::Api(_) => "api_error",
        }
    }
}

impl From<serde_json::Error> for VcError {
    fn from(e: serde_json::Error) -> Self {
        Self::Api(format!("serialization error: {}", e))
    }
}
