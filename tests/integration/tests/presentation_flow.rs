//! Integration test: presentation verification — challenge binding and
//! per-credential fan-out, including revocation.

use std::sync::Arc;

use serde_json::json;

use attesta_core::{HostedOptions, ResolverConfig, VcError};
use attesta_credentials::{
    construct_credential, create_presentation, sign_presentation, CredentialIssuer, IssuerConfig,
    StaticDocumentLoader, SuiteResolver, VerificationEngine,
};
use attesta_crypto::Ed25519KeyPair;
use attesta_did::{Resolver, StaticDidCache};
use attesta_revocation::{
    create_revocation_credential, update_revocation_credential, HostedPublisher,
    RevocationPublisher, RevocationVerifier,
};

const ISSUER_DID: &str = "did:ex:issuer";
const ISSUER_KEY: &str = "did:ex:issuer#keys-1";
const HOLDER_DID: &str = "did:ex:holder";
const HOLDER_KEY: &str = "did:ex:holder#keys-1";

struct Harness {
    issuer: CredentialIssuer,
    holder_keypair: Ed25519KeyPair,
    loader: Arc<StaticDocumentLoader>,
    resolver: Arc<Resolver>,
    publisher: HostedPublisher,
}

impl Harness {
    fn new() -> Self {
        let issuer_kp = Ed25519KeyPair::generate();
        let holder_kp = Ed25519KeyPair::generate();
        let cache = Arc::new(StaticDidCache::new());
        cache.insert(
            serde_json::from_value(json!({
                "id": ISSUER_DID,
                "publicKey": [{
                    "id": ISSUER_KEY,
                    "controller": ISSUER_DID,
                    "type": ["Ed25519VerificationKey"],
                    "publicKeyBase58": issuer_kp.public_key().to_base58()
                }],
                "assertionMethod": [ISSUER_KEY]
            }))
            .unwrap(),
        );
        cache.insert(
            serde_json::from_value(json!({
                "id": HOLDER_DID,
                "publicKey": [{
                    "id": HOLDER_KEY,
                    "controller": HOLDER_DID,
                    "type": ["Ed25519VerificationKey"],
                    "publicKeyBase58": holder_kp.public_key().to_base58()
                }],
                "authentication": [HOLDER_KEY]
            }))
            .unwrap(),
        );
        let resolver = Arc::new(Resolver::new(
            cache,
            ResolverConfig {
                endpoints: vec!["http://127.0.0.1:1".into()],
                request_timeout_ms: 50,
            },
        ));
        let issuer = CredentialIssuer::new(
            ISSUER_DID.into(),
            ISSUER_KEY.into(),
            issuer_kp,
            vec![ISSUER_DID.into()],
            resolver.clone(),
        );
        let loader = Arc::new(StaticDocumentLoader::new());
        let publisher = HostedPublisher::new(
            "https://ex.org",
            &HostedOptions {
                credential_id: "rl-1".into(),
            },
            loader.clone(),
        );
        Self {
            issuer,
            holder_keypair: holder_kp,
            loader,
            resolver,
            publisher,
        }
    }

    fn engine(&self) -> VerificationEngine {
        let checker = RevocationVerifier::new(
            SuiteResolver::new(self.resolver.clone()),
            self.loader.clone(),
        );
        VerificationEngine::new(SuiteResolver::new(self.resolver.clone()))
            .with_status_checker(Arc::new(checker))
    }

    fn issued(&self, list_url: Option<&str>, index: Option<usize>) -> attesta_core::Credential {
        let config = IssuerConfig {
            id: "degree-v1".into(),
            context: vec![],
            credential_type: vec![],
            revocation_list_credential: list_url.map(str::to_string),
        }
        .fill_defaults();
        let vc = construct_credential(
            json!({"id": HOLDER_DID, "degree": "BSc"}),
            index,
            ISSUER_DID,
            &config,
        );
        self.issuer.issue(vc).unwrap()
    }

    fn presentation(
        &self,
        credentials: Vec<attesta_core::Credential>,
        challenge: &str,
    ) -> attesta_core::Presentation {
        sign_presentation(
            create_presentation(credentials, Some(HOLDER_DID)),
            &self.holder_keypair,
            HOLDER_KEY,
            challenge,
            None,
        )
        .unwrap()
    }
}

#[tokio::test]
async fn test_presentation_with_matching_challenge() {
    let harness = Harness::new();
    let vp = harness.presentation(vec![harness.issued(None, None)], "nonce-1");
    let outcome = harness
        .engine()
        .verify_presentation(&vp, Some("nonce-1"))
        .await
        .unwrap();
    assert_eq!(outcome.checks, vec!["proof".to_string()]);
}

#[tokio::test]
async fn test_presentation_with_multiple_credentials() {
    let harness = Harness::new();
    let vp = harness.presentation(
        vec![harness.issued(None, None), harness.issued(None, None)],
        "nonce-2",
    );
    assert!(harness
        .engine()
        .verify_presentation(&vp, Some("nonce-2"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_missing_challenge_is_invalid_request() {
    let harness = Harness::new();
    let vp = harness.presentation(vec![harness.issued(None, None)], "nonce-1");
    assert!(matches!(
        harness.engine().verify_presentation(&vp, None).await,
        Err(VcError::InvalidRequest(_))
    ));
}

#[tokio::test]
async fn test_challenge_mismatch_is_invalid_proof() {
    let harness = Harness::new();
    let vp = harness.presentation(vec![harness.issued(None, None)], "nonce-1");
    assert!(matches!(
        harness
            .engine()
            .verify_presentation(&vp, Some("nonce-other"))
            .await,
        Err(VcError::InvalidProof(_))
    ));
}

#[tokio::test]
async fn test_tampered_embedded_credential_fails() {
    let harness = Harness::new();
    let mut vc = harness.issued(None, None);
    vc.credential_subject = Some(json!({"id": HOLDER_DID, "degree": "PhD"}));
    let vp = harness.presentation(vec![vc], "nonce-3");
    assert!(matches!(
        harness
            .engine()
            .verify_presentation(&vp, Some("nonce-3"))
            .await,
        Err(VcError::InvalidProof(_))
    ));
}

#[tokio::test]
async fn test_presentation_with_revoked_credential_fails() {
    let harness = Harness::new();
    harness.publisher.validate().await.unwrap();
    let mut list = create_revocation_credential(32, ISSUER_DID).unwrap();
    list.id = Some(harness.publisher.url());
    let signed_list = harness.issuer.issue(list).unwrap();
    let list_url = harness.publisher.publish(&signed_list).await.unwrap();

    let good = harness.issued(Some(&list_url), Some(1));
    let doomed = harness.issued(Some(&list_url), Some(2));

    // Revoke index 2 and republish.
    let current = harness.publisher.get_revocation_credential().await.unwrap();
    let updated = update_revocation_credential(&current, 2, true).unwrap();
    let resigned = harness.issuer.issue(updated).unwrap();
    harness.publisher.publish(&resigned).await.unwrap();

    let vp = harness.presentation(vec![good.clone(), doomed], "nonce-4");
    assert!(matches!(
        harness
            .engine()
            .verify_presentation(&vp, Some("nonce-4"))
            .await,
        Err(VcError::Verification(_))
    ));

    // The same presentation without the revoked credential passes, and
    // claims the revocation check.
    let vp = harness.presentation(vec![good], "nonce-5");
    let outcome = harness
        .engine()
        .verify_presentation(&vp, Some("nonce-5"))
        .await
        .unwrap();
    assert_eq!(
        outcome.checks,
        vec!["proof".to_string(), "revocation".to_string()]
    );
}
