//! Attesta Credentials — issuance and verification of W3C Verifiable
//! Credentials: structural validation, signature suite selection,
//! linked-data proofs, the document loader, and the verification engine.

pub mod issuer;
pub mod ldp;
pub mod loader;
pub mod structure;
pub mod suites;
pub mod verifier;

pub use issuer::{
    construct_credential, CredentialIssuer, IssuanceOptions, IssuerConfig,
};
pub use ldp::{create_presentation, sign_presentation, sign_value, verify_proof};
pub use loader::{DocumentLoader, LoadedDocument, StaticDocumentLoader};
pub use structure::{assert_valid_issuance_credential, verify_credential_structure};
pub use suites::{suite_from_key, SignatureSuite, SuiteResolver};
pub use verifier::{
    RevocationOutcome, StatusChecker, VerificationEngine, VerificationOutcome,
};
