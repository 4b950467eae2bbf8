//! Integration test: revocation list lifecycle — create, publish, issue
//! with status, revoke, re-verify.

use std::sync::Arc;

use serde_json::json;

use attesta_core::{HostedOptions, PublishMethod, ResolverConfig, RevocationConfig, VcError};
use attesta_credentials::{
    construct_credential, CredentialIssuer, IssuerConfig, StaticDocumentLoader, SuiteResolver,
    VerificationEngine,
};
use attesta_crypto::Ed25519KeyPair;
use attesta_did::{DidDocument, Resolver, StaticDidCache};
use attesta_revocation::{
    create_revocation_credential, update_revocation_credential, HostedPublisher,
    RevocationPublisher, RevocationVerifier,
};

const ISSUER_DID: &str = "did:ex:issuer";
const ISSUER_KEY: &str = "did:ex:issuer#keys-1";
const BASE_URL: &str = "https://ex.org";

struct Harness {
    issuer: CredentialIssuer,
    loader: Arc<StaticDocumentLoader>,
    resolver: Arc<Resolver>,
    publisher: HostedPublisher,
}

impl Harness {
    fn new() -> Self {
        let kp = Ed25519KeyPair::generate();
        let cache = Arc::new(StaticDidCache::new());
        let document: DidDocument = serde_json::from_value(json!({
            "id": ISSUER_DID,
            "publicKey": [{
                "id": ISSUER_KEY,
                "controller": ISSUER_DID,
                "type": ["Ed25519VerificationKey"],
                "publicKeyBase58": kp.public_key().to_base58()
            }],
            "assertionMethod": [ISSUER_KEY]
        }))
        .unwrap();
        cache.insert(document);
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
            kp,
            vec![ISSUER_DID.into()],
            resolver.clone(),
        );
        let loader = Arc::new(StaticDocumentLoader::new());
        let publisher = HostedPublisher::new(
            BASE_URL,
            &HostedOptions {
                credential_id: "rl-1".into(),
            },
            loader.clone(),
        );
        Self {
            issuer,
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

    /// Create, sign, and publish a fresh list; returns its URL.
    async fn initialize_list(&self, list_size: usize) -> String {
        self.publisher.validate().await.unwrap();
        let mut list = create_revocation_credential(list_size, ISSUER_DID).unwrap();
        list.id = Some(self.publisher.url());
        let signed = self.issuer.issue(list).unwrap();
        self.publisher.publish(&signed).await.unwrap()
    }

    fn subject_credential(&self, list_url: &str, index: usize) -> attesta_core::Credential {
        let config = IssuerConfig {
            id: "degree-v1".into(),
            context: vec!["https://ex.org/contexts/degree/v1".into()],
            credential_type: vec!["DegreeCredential".into()],
            revocation_list_credential: Some(list_url.to_string()),
        }
        .fill_defaults();
        let vc = construct_credential(
            json!({"id": "did:ex:subject"}),
            Some(index),
            ISSUER_DID,
            &config,
        );
        self.issuer.issue(vc).unwrap()
    }

    /// Flip a bit in the published list and republish the re-signed body.
    async fn revoke(&self, index: usize) {
        let current = self.publisher.get_revocation_credential().await.unwrap();
        let updated = update_revocation_credential(&current, index, true).unwrap();
        let signed = self.issuer.issue(updated).unwrap();
        self.publisher.publish(&signed).await.unwrap();
    }
}

#[test]
fn test_config_validation() {
    let config = RevocationConfig {
        id: "rl-1".into(),
        publish_method: PublishMethod::Hosted,
        git_hub_options: None,
        hosted_options: Some(HostedOptions {
            credential_id: "rl-1".into(),
        }),
        url: None,
        list_size: 100_000,
    };
    assert!(config.validate().is_ok());

    let bad = RevocationConfig {
        list_size: 0,
        ..config
    };
    assert!(matches!(bad.validate(), Err(VcError::InvalidRequest(_))));
}

#[tokio::test]
async fn test_unrevoked_credential_verifies_with_revocation_check() {
    let harness = Harness::new();
    let list_url = harness.initialize_list(32).await;
    let vc = harness.subject_credential(&list_url, 4);

    let outcome = harness.engine().verify_credential(&vc).await.unwrap();
    assert_eq!(
        outcome.checks,
        vec!["proof".to_string(), "revocation".to_string()]
    );
}

#[tokio::test]
async fn test_revoked_credential_fails_verification() {
    let harness = Harness::new();
    let list_url = harness.initialize_list(32).await;
    let vc = harness.subject_credential(&list_url, 4);

    // Verifies before revocation.
    assert!(harness.engine().verify_credential(&vc).await.is_ok());

    harness.revoke(4).await;
    assert!(matches!(
        harness.engine().verify_credential(&vc).await,
        Err(VcError::Verification(_))
    ));
}

#[tokio::test]
async fn test_revocation_is_per_index() {
    let harness = Harness::new();
    let list_url = harness.initialize_list(32).await;
    let revoked = harness.subject_credential(&list_url, 7);
    let untouched = harness.subject_credential(&list_url, 8);

    harness.revoke(7).await;
    assert!(harness.engine().verify_credential(&revoked).await.is_err());
    assert!(harness
        .engine()
        .verify_credential(&untouched)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_unsigned_published_list_is_credential_load_error() {
    let harness = Harness::new();
    // Publish the list without signing it.
    let list = create_revocation_credential(32, ISSUER_DID).unwrap();
    let list_url = harness.publisher.publish(&list).await.unwrap();
    let vc = harness.subject_credential(&list_url, 0);

    assert!(matches!(
        harness.engine().verify_credential(&vc).await,
        Err(VcError::CredentialLoad(_))
    ));
}

#[tokio::test]
async fn test_reinitializing_published_list_conflicts() {
    let harness = Harness::new();
    harness.initialize_list(32).await;
    assert!(matches!(
        harness.publisher.validate().await,
        Err(VcError::ResourceConflict(_))
    ));
}

#[tokio::test]
async fn test_credential_without_status_never_claims_revocation() {
    let harness = Harness::new();
    harness.initialize_list(32).await;

    let config = IssuerConfig {
        id: "degree-v1".into(),
        context: vec![],
        credential_type: vec![],
        revocation_list_credential: None,
    }
    .fill_defaults();
    let vc = harness
        .issuer
        .issue(construct_credential(
            json!({"id": "did:ex:subject"}),
            None,
            ISSUER_DID,
            &config,
        ))
        .unwrap();

    let outcome = harness.engine().verify_credential(&vc).await.unwrap();
    assert_eq!(outcome.checks, vec!["proof".to_string()]);
}

#[tokio::test]
async fn test_out_of_range_status_index_is_invalid_request() {
    let harness = Harness::new();
    let list_url = harness.initialize_list(8).await;
    let vc = harness.subject_credential(&list_url, 8);

    assert!(matches!(
        harness.engine().verify_credential(&vc).await,
        Err(VcError::InvalidRequest(_))
    ));
}
