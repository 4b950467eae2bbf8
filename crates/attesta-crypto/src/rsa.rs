use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::sha2::{Digest, Sha256};
use rsa::{Pkcs1v15Sign, RsaPublicKey};

use crate::error::CryptoError;

/// RSA public key wrapper for RS256 (PKCS#1 v1.5 + SHA-256) verification.
#[derive(Debug, Clone)]
pub struct RsaVerifier {
    key: RsaPublicKey,
}

impl RsaVerifier {
    /// Parse a PEM-encoded public key. Accepts both SPKI
    /// (`BEGIN PUBLIC KEY`) and PKCS#1 (`BEGIN RSA PUBLIC KEY`) framing,
    /// as DID documents in the wild carry either.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA PEM: {}", e)))?;
        Ok(Self { key })
    }

    /// Parse a base58-encoded DER public key.
    pub fn from_base58_der(encoded: &str) -> Result<Self, CryptoError> {
        let der = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| CryptoError::InvalidKey(format!("invalid base58: {}", e)))?;
        let key = RsaPublicKey::from_public_key_der(&der)
            .or_else(|_| RsaPublicKey::from_pkcs1_der(&der))
            .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA DER: {}", e)))?;
        Ok(Self { key })
    }

    /// Verify an RS256 signature over a message.
    pub fn verify_rs256(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let digest = Sha256::digest(message);
        self.key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}
