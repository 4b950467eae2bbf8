use k256::ecdsa::signature::Verifier;
use k256::ecdsa::{Signature, VerifyingKey};

use crate::error::CryptoError;

/// secp256k1 public key wrapper for ES256K verification.
#[derive(Debug, Clone)]
pub struct Secp256k1Verifier {
    key: VerifyingKey,
}

impl Secp256k1Verifier {
    /// Parse a SEC1-encoded point (compressed 33 bytes or uncompressed 65).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid secp256k1 point: {}", e)))?;
        Ok(Self { key })
    }

    /// Parse a base58-encoded SEC1 point, the `publicKeyBase58` form.
    pub fn from_base58(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| CryptoError::InvalidKey(format!("invalid base58: {}", e)))?;
        Self::from_sec1_bytes(&bytes)
    }

    /// Verify an ES256K signature (raw `r || s`, 64 bytes) over a message.
    /// The message is hashed with SHA-256 internally.
    pub fn verify_es256k(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let sig = Signature::from_slice(signature)
            .map_err(|e| CryptoError::InvalidSignature(format!("invalid ES256K signature: {}", e)))?;
        self.key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}
