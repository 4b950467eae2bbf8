//! Integration test: credential issue → verify flow across crates.

use std::sync::Arc;

use serde_json::json;

use attesta_core::document::OneOrMany;
use attesta_core::{ResolverConfig, VcError};
use attesta_credentials::{
    construct_credential, suite_from_key, CredentialIssuer, IssuanceOptions, IssuerConfig,
    SuiteResolver, VerificationEngine,
};
use attesta_crypto::Ed25519KeyPair;
use attesta_did::{DidDocument, KeyInfo, Resolver, StaticDidCache};

const ISSUER_DID: &str = "did:ex:issuer";
const ISSUER_KEY: &str = "did:ex:issuer#keys-1";

fn resolver_with_issuer(kp: &Ed25519KeyPair) -> Arc<Resolver> {
    let cache = Arc::new(StaticDidCache::new());
    let document: DidDocument = serde_json::from_value(json!({
        "id": ISSUER_DID,
        "publicKey": [{
            "id": ISSUER_KEY,
            "controller": ISSUER_DID,
            "type": ["Ed25519VerificationKey"],
            "publicKeyBase58": kp.public_key().to_base58()
        }],
        "assertionMethod": [ISSUER_KEY],
        "authentication": [ISSUER_KEY]
    }))
    .unwrap();
    cache.insert(document);
    Arc::new(Resolver::new(
        cache,
        ResolverConfig {
            endpoints: vec!["http://127.0.0.1:1".into()],
            request_timeout_ms: 50,
        },
    ))
}

fn issuer(kp: Ed25519KeyPair, resolver: Arc<Resolver>) -> CredentialIssuer {
    CredentialIssuer::new(
        ISSUER_DID.into(),
        ISSUER_KEY.into(),
        kp,
        vec![ISSUER_DID.into()],
        resolver,
    )
}

fn degree_config() -> IssuerConfig {
    IssuerConfig {
        id: "degree-v1".into(),
        context: vec!["https://ex.org/contexts/degree/v1".into()],
        credential_type: vec!["DegreeCredential".into()],
        revocation_list_credential: None,
    }
    .fill_defaults()
}

#[tokio::test]
async fn test_issue_then_verify() {
    let kp = Ed25519KeyPair::generate();
    let resolver = resolver_with_issuer(&kp);
    let issuer = issuer(kp, resolver.clone());
    let engine = VerificationEngine::new(SuiteResolver::new(resolver));

    let unsigned = construct_credential(
        json!({"id": "did:ex:subject", "degree": "BSc Computer Science"}),
        None,
        ISSUER_DID,
        &degree_config(),
    );
    let vc = issuer.issue(unsigned).expect("issuance should succeed");

    assert!(vc.id.as_deref().unwrap().starts_with("urn:uuid:"));
    let outcome = engine.verify_credential(&vc).await.unwrap();
    assert_eq!(outcome.checks, vec!["proof".to_string()]);
    assert!(outcome.warnings.is_empty());
    assert!(outcome.errors.is_empty());
}

#[tokio::test]
async fn test_round_trip_through_json_still_verifies() {
    let kp = Ed25519KeyPair::generate();
    let resolver = resolver_with_issuer(&kp);
    let issuer = issuer(kp, resolver.clone());
    let engine = VerificationEngine::new(SuiteResolver::new(resolver));

    let vc = issuer
        .issue(construct_credential(
            json!({"id": "did:ex:subject"}),
            None,
            ISSUER_DID,
            &degree_config(),
        ))
        .unwrap();

    // Simulate the wire: serialize, reparse, verify.
    let wire = serde_json::to_string(&vc).unwrap();
    let parsed = serde_json::from_str(&wire).unwrap();
    assert!(engine.verify_credential(&parsed).await.is_ok());
}

#[tokio::test]
async fn test_tampered_signature_is_invalid_proof() {
    let kp = Ed25519KeyPair::generate();
    let resolver = resolver_with_issuer(&kp);
    let issuer = issuer(kp, resolver.clone());
    let engine = VerificationEngine::new(SuiteResolver::new(resolver));

    let mut vc = issuer
        .issue(construct_credential(
            json!({"id": "did:ex:subject"}),
            None,
            ISSUER_DID,
            &degree_config(),
        ))
        .unwrap();
    if let Some(OneOrMany::One(proof)) = vc.proof.as_mut() {
        proof.jws = proof.jws.take().map(|jws| format!("{}dGFtcGVy", jws));
    }
    assert!(matches!(
        engine.verify_credential(&vc).await,
        Err(VcError::InvalidProof(_))
    ));
}

#[tokio::test]
async fn test_tampered_claims_are_invalid_proof() {
    let kp = Ed25519KeyPair::generate();
    let resolver = resolver_with_issuer(&kp);
    let issuer = issuer(kp, resolver.clone());
    let engine = VerificationEngine::new(SuiteResolver::new(resolver));

    let mut vc = issuer
        .issue(construct_credential(
            json!({"id": "did:ex:subject", "degree": "BSc"}),
            None,
            ISSUER_DID,
            &degree_config(),
        ))
        .unwrap();
    vc.credential_subject = Some(json!({"id": "did:ex:subject", "degree": "PhD"}));
    assert_eq!(
        engine.verify_credential(&vc).await,
        Err(VcError::InvalidProof("Invalid signature.".into()))
    );
}

#[tokio::test]
async fn test_structural_failures_short_circuit() {
    let kp = Ed25519KeyPair::generate();
    let resolver = resolver_with_issuer(&kp);
    let issuer = issuer(kp, resolver.clone());
    // Engine with an empty cache: any resolution would fail, so passing
    // structural errors proves no resolution was attempted.
    let empty = Arc::new(Resolver::new(
        Arc::new(StaticDidCache::new()),
        ResolverConfig {
            endpoints: vec!["http://127.0.0.1:1".into()],
            request_timeout_ms: 50,
        },
    ));
    let engine = VerificationEngine::new(SuiteResolver::new(empty));

    let signed = issuer
        .issue(construct_credential(
            json!({"id": "did:ex:subject"}),
            None,
            ISSUER_DID,
            &degree_config(),
        ))
        .unwrap();

    for strip in ["created", "verificationMethod", "proofPurpose"] {
        let mut vc = signed.clone();
        if let Some(OneOrMany::One(proof)) = vc.proof.as_mut() {
            match strip {
                "created" => proof.created = None,
                "verificationMethod" => proof.verification_method = None,
                _ => proof.proof_purpose = None,
            }
        }
        assert!(
            matches!(
                engine.verify_credential(&vc).await,
                Err(VcError::InvalidCredentialStructure(_))
            ),
            "stripping {} should fail structurally",
            strip
        );
    }

    let mut vc = signed;
    vc.proof = None;
    assert!(matches!(
        engine.verify_credential(&vc).await,
        Err(VcError::InvalidCredentialStructure(_))
    ));
}

#[tokio::test]
async fn test_issuance_options_flow() {
    let kp = Ed25519KeyPair::generate();
    let resolver = resolver_with_issuer(&kp);
    let issuer = issuer(kp, resolver);

    assert_eq!(issuer.requested_issuer(None).await.unwrap(), ISSUER_DID);

    let options = IssuanceOptions {
        issuer: Some(ISSUER_DID.into()),
        assertion_method: Some(ISSUER_KEY.into()),
        ..Default::default()
    };
    assert_eq!(
        issuer.requested_issuer(Some(&options)).await.unwrap(),
        ISSUER_DID
    );

    let options = IssuanceOptions {
        proof_purpose: Some("capabilityInvocation".into()),
        ..Default::default()
    };
    assert!(matches!(
        issuer.requested_issuer(Some(&options)).await,
        Err(VcError::InvalidIssuanceOptions(_))
    ));
}

#[test]
fn test_key_type_routing() {
    use rand_source::*;
    // RSAVerificationKey routes to the RSA suite.
    let rsa_key: KeyInfo = serde_json::from_value(json!({
        "id": "did:ex:a#rsa",
        "type": ["RSAVerificationKey"],
        "publicKeyPem": rsa_pem()
    }))
    .unwrap();
    let suite = suite_from_key(&rsa_key).unwrap();
    assert_eq!(suite.suite_type(), "RsaSignature2018");
    assert_eq!(suite.verification_method(), "did:ex:a#rsa");

    // ECDSASecp256k1VerificationKey routes to the JWS secp256k1 suite.
    let ec_key: KeyInfo = serde_json::from_value(json!({
        "id": "did:ex:a#ec",
        "type": ["ECDSASecp256k1VerificationKey"],
        "publicKeyBase58": secp256k1_base58()
    }))
    .unwrap();
    assert_eq!(
        suite_from_key(&ec_key).unwrap().suite_type(),
        "EcdsaSecp256k1Signature2019"
    );

    // Any other type falls back to Ed25519.
    let kp = Ed25519KeyPair::generate();
    let ed_key: KeyInfo = serde_json::from_value(json!({
        "id": "did:ex:a#ed",
        "type": ["SomeFutureKeyType"],
        "publicKeyBase58": kp.public_key().to_base58()
    }))
    .unwrap();
    assert_eq!(
        suite_from_key(&ed_key).unwrap().suite_type(),
        "Ed25519Signature2018"
    );
}

mod rand_source {
    pub fn rsa_pem() -> String {
        use rsa::pkcs8::EncodePublicKey;
        let private = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
        private
            .to_public_key()
            .to_public_key_pem(Default::default())
            .unwrap()
    }

    pub fn secp256k1_base58() -> String {
        let signing = k256::ecdsa::SigningKey::random(&mut rand::thread_rng());
        bs58::encode(signing.verifying_key().to_sec1_bytes()).into_string()
    }
}
