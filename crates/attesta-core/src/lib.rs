//! Attesta Core — Data model, error taxonomy, and configuration for the
//! Attesta verifiable-credential engine.

pub mod classify;
pub mod config;
pub mod document;
pub mod error;

pub use classify::{classify_issuance_error, classify_verification_error, RawFailure};
pub use config::{GitHubOptions, HostedOptions, PublishMethod, ResolverConfig, RevocationConfig};
pub use document::{
    Credential, CredentialStatus, ListIndex, OneOrMany, Presentation, Proof, UriOrObject,
};
pub use error::VcError;
