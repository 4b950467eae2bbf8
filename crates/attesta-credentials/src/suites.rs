//! Signature suite selection.
//!
//! The suite for a proof is chosen by the key type found in the issuer's
//! DID document: `RSAVerificationKey` routes to RsaSignature2018,
//! `ECDSASecp256k1VerificationKey` to EcdsaSecp256k1Signature2019, and
//! everything else falls back to Ed25519Signature2018.

use std::sync::Arc;

use tracing::debug;

use attesta_core::classify::{classify_verification_error, RawFailure};
use attesta_core::document::Proof;
use attesta_core::VcError;
use attesta_crypto::{
    DetachedJws, Ed25519PublicKey, JwsAlgorithm, RsaVerifier, Secp256k1Verifier,
};
use attesta_did::{extract_did_from_verification_method, KeyInfo, Resolver};

pub const KEY_TYPE_RSA: &str = "RSAVerificationKey";
pub const KEY_TYPE_ECDSA: &str = "ECDSASecp256k1VerificationKey";

pub const SUITE_ED25519: &str = "Ed25519Signature2018";
pub const SUITE_RSA: &str = "RsaSignature2018";
pub const SUITE_SECP256K1: &str = "EcdsaSecp256k1Signature2019";

/// A verification suite: key material bound to a verification method.
pub enum SignatureSuite {
    Ed25519 {
        verification_method: String,
        key: Ed25519PublicKey,
    },
    Rsa {
        verification_method: String,
        key: RsaVerifier,
    },
    Secp256k1 {
        verification_method: String,
        key: Secp256k1Verifier,
    },
}

impl SignatureSuite {
    pub fn suite_type(&self) -> &'static str {
        match self {
            Self::Ed25519 { .. } => SUITE_ED25519,
            Self::Rsa { .. } => SUITE_RSA,
            Self::Secp256k1 { .. } => SUITE_SECP256K1,
        }
    }

    pub fn verification_method(&self) -> &str {
        match self {
            Self::Ed25519 {
                verification_method,
                ..
            }
            | Self::Rsa {
                verification_method,
                ..
            }
            | Self::Secp256k1 {
                verification_method,
                ..
            } => verification_method,
        }
    }

    fn algorithm(&self) -> JwsAlgorithm {
        match self {
            Self::Ed25519 { .. } => JwsAlgorithm::EdDsa,
            Self::Rsa { .. } => JwsAlgorithm::Rs256,
            Self::Secp256k1 { .. } => JwsAlgorithm::Es256k,
        }
    }

    /// Verify a decoded detached JWS over the given signing input.
    pub fn verify(&self, signing_input: &[u8], jws: &DetachedJws) -> Result<(), VcError> {
        if jws.algorithm != self.algorithm() {
            return Err(classify_verification_error(
                RawFailure::new("Verification error").with_nested(vec![
                    "Could not verify any proofs; no proofs matched the required suite and purpose."
                        .into(),
                ]),
            ));
        }
        let verified = match self {
            Self::Ed25519 { key, .. } => key.verify(signing_input, &jws.signature),
            Self::Rsa { key, .. } => key.verify_rs256(signing_input, &jws.signature),
            Self::Secp256k1 { key, .. } => key.verify_es256k(signing_input, &jws.signature),
        };
        verified.map_err(|_| {
            classify_verification_error(
                RawFailure::new("Verification error")
                    .with_name("VerificationError")
                    .with_nested(vec!["Invalid signature.".into()]),
            )
        })
    }
}

/// Build the suite for a key object, dispatching on its `type` list.
pub fn suite_from_key(key: &KeyInfo) -> Result<SignatureSuite, VcError> {
    let verification_method = key
        .id
        .clone()
        .ok_or_else(|| VcError::InvalidRequest("Invalid proof!".into()))?;

    if key.has_type(KEY_TYPE_RSA) {
        let verifier = match (&key.public_key_pem, &key.public_key_base58) {
            (Some(pem), _) => RsaVerifier::from_pem(pem),
            (None, Some(b58)) => RsaVerifier::from_base58_der(b58),
            (None, None) => {
                return Err(VcError::CredentialLoad(format!(
                    "key {} has no public key material",
                    verification_method
                )))
            }
        }
        .map_err(|e| {
            VcError::CredentialLoad(format!("could not load key {}: {}", verification_method, e))
        })?;
        return Ok(SignatureSuite::Rsa {
            verification_method,
            key: verifier,
        });
    }

    if key.has_type(KEY_TYPE_ECDSA) {
        let encoded = key.public_key_base58.as_deref().ok_or_else(|| {
            VcError::CredentialLoad(format!(
                "key {} has no public key material",
                verification_method
            ))
        })?;
        let verifier = Secp256k1Verifier::from_base58(encoded).map_err(|e| {
            VcError::CredentialLoad(format!("could not load key {}: {}", verification_method, e))
        })?;
        return Ok(SignatureSuite::Secp256k1 {
            verification_method,
            key: verifier,
        });
    }

    // All other key types fall back to Ed25519; the 32-byte decode bounds
    // what the fallback will accept.
    let encoded = key.public_key_base58.as_deref().ok_or_else(|| {
        VcError::CredentialLoad(format!(
            "key {} has no public key material",
            verification_method
        ))
    })?;
    let verifier = Ed25519PublicKey::from_base58(encoded).map_err(|e| {
        VcError::CredentialLoad(format!("could not load key {}: {}", verification_method, e))
    })?;
    Ok(SignatureSuite::Ed25519 {
        verification_method,
        key: verifier,
    })
}

/// Resolves the suite for a proof by chasing its verification method
/// through DID resolution.
pub struct SuiteResolver {
    resolver: Arc<Resolver>,
}

impl SuiteResolver {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Self { resolver }
    }

    pub async fn resolve_suite(&self, proof: &Proof) -> Result<SignatureSuite, VcError> {
        let verification_method = proof.verification_method()?;
        let did = extract_did_from_verification_method(verification_method)?;
        let document = self.resolver.resolve(did).await?;
        let key = document.find_key(verification_method)?;
        let suite = suite_from_key(key)?;
        debug!(
            verification_method = verification_method,
            suite = suite.suite_type(),
            "resolved signature suite"
        );
        Ok(suite)
    }
}
