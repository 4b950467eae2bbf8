//! Attesta DID — DID document model and cache-first resolution.

pub mod document;
pub mod resolver;

pub use document::{DidDocument, KeyEntry, KeyInfo};
pub use resolver::{
    extract_did_from_verification_method, DidCache, Resolver, StaticDidCache,
};
