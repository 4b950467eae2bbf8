//! Attesta Crypto — signature primitives for linked-data proofs: Ed25519
//! key pairs, RSA (RS256) and secp256k1 (ES256K) verifiers, and the
//! detached-JWS codec they share.

pub mod error;
pub mod jws;
pub mod keys;
pub mod rsa;
pub mod secp256k1;

pub use error::CryptoError;
pub use jws::{decode_detached, sign_detached, DetachedJws, JwsAlgorithm};
pub use keys::{Ed25519KeyPair, Ed25519PublicKey};
pub use self::rsa::RsaVerifier;
pub use secp256k1::Secp256k1Verifier;
