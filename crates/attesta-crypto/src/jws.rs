//! Detached JWS (RFC 7797, `b64: false`) encoding used by linked-data
//! signature suites.
//!
//! The serialized form is `BASE64URL(header)..BASE64URL(signature)` with the
//! payload detached; the signing input is
//! `BASE64URL(header) || '.' || payload-bytes`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::error::CryptoError;
use crate::keys::Ed25519KeyPair;

/// JWS algorithms the signature suites dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwsAlgorithm {
    EdDsa,
    Rs256,
    Es256k,
}

impl JwsAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EdDsa => "EdDSA",
            Self::Rs256 => "RS256",
            Self::Es256k => "ES256K",
        }
    }

    fn from_name(name: &str) -> Result<Self, CryptoError> {
        match name {
            "EdDSA" => Ok(Self::EdDsa),
            "RS256" => Ok(Self::Rs256),
            "ES256K" => Ok(Self::Es256k),
            other => Err(CryptoError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// The fixed protected header for this algorithm, serialized with the
    /// key order verifiers in the wild expect.
    fn header_json(&self) -> String {
        format!(r#"{{"alg":"{}","b64":false,"crit":["b64"]}}"#, self.name())
    }
}

#[derive(Deserialize)]
struct ProtectedHeader {
    alg: String,
    #[serde(default = "default_b64")]
    b64: bool,
    #[serde(default)]
    crit: Vec<String>,
}

fn default_b64() -> bool {
    true
}

/// A parsed detached JWS: algorithm, raw signature bytes, and the encoded
/// header needed to reconstruct the signing input.
#[derive(Debug, Clone)]
pub struct DetachedJws {
    pub algorithm: JwsAlgorithm,
    pub signature: Vec<u8>,
    pub protected: String,
}

impl DetachedJws {
    /// The bytes the signature was computed over, for the given payload.
    pub fn signing_input(&self, payload: &[u8]) -> Vec<u8> {
        signing_input(&self.protected, payload)
    }
}

fn signing_input(protected: &str, payload: &[u8]) -> Vec<u8> {
    let mut input = Vec::with_capacity(protected.len() + 1 + payload.len());
    input.extend_from_slice(protected.as_bytes());
    input.push(b'.');
    input.extend_from_slice(payload);
    input
}

/// Sign a detached payload with Ed25519, producing the compact
/// `header..signature` serialization.
pub fn sign_detached(payload: &[u8], keypair: &Ed25519KeyPair) -> String {
    let protected = URL_SAFE_NO_PAD.encode(JwsAlgorithm::EdDsa.header_json());
    let signature = keypair.sign(&signing_input(&protected, payload));
    format!("{}..{}", protected, URL_SAFE_NO_PAD.encode(signature))
}

/// Parse a compact detached JWS and validate its protected header.
pub fn decode_detached(jws: &str) -> Result<DetachedJws, CryptoError> {
    let (protected, rest) = jws
        .split_once('.')
        .ok_or_else(|| CryptoError::MalformedJws("expected three dot-separated parts".into()))?;
    let (payload_part, signature_part) = rest
        .split_once('.')
        .ok_or_else(|| CryptoError::MalformedJws("expected three dot-separated parts".into()))?;
    if !payload_part.is_empty() {
        return Err(CryptoError::MalformedJws(
            "payload must be detached".into(),
        ));
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(protected)
        .map_err(|e| CryptoError::MalformedJws(format!("invalid header encoding: {}", e)))?;
    let header: ProtectedHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| CryptoError::MalformedJws(format!("invalid header JSON: {}", e)))?;
    if header.b64 {
        return Err(CryptoError::MalformedJws(
            "detached JWS requires b64:false".into(),
        ));
    }
    if !header.crit.iter().any(|c| c == "b64") {
        return Err(CryptoError::MalformedJws(
            "b64 must be marked critical".into(),
        ));
    }

    let signature = URL_SAFE_NO_PAD
        .decode(signature_part)
        .map_err(|e| CryptoError::MalformedJws(format!("invalid signature encoding: {}", e)))?;

    Ok(DetachedJws {
        algorithm: JwsAlgorithm::from_name(&header.alg)?,
        signature,
        protected: protected.to_string(),
    })
}
