//! Credential issuance: issuer configuration, credential construction, and
//! Ed25519 proof attachment.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use attesta_core::document::{
    Credential, CredentialStatus, ListIndex, OneOrMany, Proof, UriOrObject, ASSERTION_METHOD,
    REVOCATION_LIST_CONTEXT, REVOCATION_STATUS_TYPE, W3C_VC_CONTEXT, W3C_VC_TYPE,
};
use attesta_core::VcError;
use attesta_crypto::Ed25519KeyPair;
use attesta_did::Resolver;

use crate::ldp;
use crate::structure::assert_valid_issuance_credential;
use crate::suites::SUITE_ED25519;

/// Per-issuer credential template configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerConfig {
    pub id: String,
    pub context: Vec<String>,
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_list_credential: Option<String>,
}

impl IssuerConfig {
    pub fn validate(&self) -> Result<(), VcError> {
        if self.id.is_empty() {
            return Err(VcError::InvalidIssuanceOptions(
                "Issuer config must contain an id.".into(),
            ));
        }
        Ok(())
    }

    /// Fill in the defaults every issued credential carries: the VC v1
    /// context first, the revocation context when a list is configured, and
    /// the `VerifiableCredential` type first.
    pub fn fill_defaults(mut self) -> Self {
        if !self.context.iter().any(|c| c == W3C_VC_CONTEXT) {
            self.context.insert(0, W3C_VC_CONTEXT.into());
        }
        if self.revocation_list_credential.is_some()
            && !self.context.iter().any(|c| c == REVOCATION_LIST_CONTEXT)
        {
            self.context.push(REVOCATION_LIST_CONTEXT.into());
        }
        if !self.credential_type.iter().any(|t| t == W3C_VC_TYPE) {
            self.credential_type.insert(0, W3C_VC_TYPE.into());
        }
        self
    }
}

/// Build an unsigned credential from a subject and an issuer config.
///
/// A `credentialStatus` is attached only when both a list index and a
/// configured list URL are present.
pub fn construct_credential(
    credential_subject: Value,
    revocation_list_index: Option<usize>,
    did: &str,
    config: &IssuerConfig,
) -> Credential {
    let credential_status = match (revocation_list_index, &config.revocation_list_credential) {
        (Some(index), Some(list_url)) => Some(CredentialStatus {
            id: Some(format!("{}#{}", list_url, index)),
            status_type: Some(REVOCATION_STATUS_TYPE.into()),
            revocation_list_index: Some(ListIndex::Text(index.to_string())),
            revocation_list_credential: Some(list_url.clone()),
            extra: Default::default(),
        }),
        _ => None,
    };
    Credential {
        context: Some(json!(config.context)),
        credential_type: Some(OneOrMany::Many(config.credential_type.clone())),
        issuer: Some(Value::String(did.to_string())),
        issuance_date: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        credential_subject: Some(credential_subject),
        credential_status,
        ..Credential::default()
    }
}

/// Options a caller may supply when requesting issuance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceOptions {
    pub issuer: Option<String>,
    pub proof_purpose: Option<String>,
    pub assertion_method: Option<String>,
}

/// Issues credentials signed with the issuer's Ed25519 key.
pub struct CredentialIssuer {
    did: String,
    verification_method: String,
    keypair: Ed25519KeyPair,
    allowed_issuers: Vec<String>,
    resolver: Arc<Resolver>,
}

impl CredentialIssuer {
    pub fn new(
        did: String,
        verification_method: String,
        keypair: Ed25519KeyPair,
        allowed_issuers: Vec<String>,
        resolver: Arc<Resolver>,
    ) -> Self {
        Self {
            did,
            verification_method,
            keypair,
            allowed_issuers,
            resolver,
        }
    }

    pub fn did(&self) -> &str {
        &self.did
    }

    /// Decide which issuer DID an issuance request runs under.
    ///
    /// No options means the default issuer. A proof purpose other than
    /// `assertionMethod` is rejected outright; an explicit issuer must be
    /// on the allow-list; an assertion method must be authorized by the
    /// issuer's DID document.
    pub async fn requested_issuer(
        &self,
        options: Option<&IssuanceOptions>,
    ) -> Result<String, VcError> {
        let Some(options) = options else {
            return Ok(self.did.clone());
        };
        if let Some(purpose) = options.proof_purpose.as_deref() {
            if purpose != ASSERTION_METHOD {
                return Err(VcError::InvalidIssuanceOptions(format!(
                    "Proof purpose not supported. Expected one of {} but got: {}",
                    ASSERTION_METHOD, purpose
                )));
            }
        }
        if let Some(issuer) = options.issuer.as_deref() {
            if self.allowed_issuers.iter().any(|allowed| allowed == issuer) {
                if let Some(method) = options.assertion_method.as_deref() {
                    let validated = self
                        .resolver
                        .validate_assertion_method(Some(method), Some(issuer))
                        .await?;
                    return Ok(validated.unwrap_or_else(|| issuer.to_string()));
                }
                return Ok(issuer.to_string());
            }
        }
        if let Some(method) = options.assertion_method.as_deref() {
            if let Some(did) = self
                .resolver
                .validate_assertion_method(Some(method), None)
                .await?
            {
                return Ok(did);
            }
        }
        Err(VcError::InvalidIssuanceOptions("Invalid options".into()))
    }

    /// Sign a credential, attaching an Ed25519 detached-JWS proof.
    pub fn issue(&self, mut credential: Credential) -> Result<Credential, VcError> {
        assert_valid_issuance_credential(Some(&credential))?;
        if credential.id.is_none() {
            credential.id = Some(format!("urn:uuid:{}", Uuid::now_v7()));
        }

        let options = Proof {
            proof_type: Some(SUITE_ED25519.into()),
            created: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            verification_method: Some(UriOrObject::Uri(self.verification_method.clone())),
            proof_purpose: Some(UriOrObject::Uri(ASSERTION_METHOD.into())),
            ..Proof::default()
        };
        let document = credential.to_value()?;
        let proof = ldp::sign_value(&document, options, &self.keypair)?;
        credential.proof = Some(OneOrMany::One(proof));

        info!(
            issuer = %self.did,
            credential_id = credential.id.as_deref().unwrap_or(""),
            "credential issued"
        );
        Ok(credential)
    }
}
