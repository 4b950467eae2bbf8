//! Revocation list credential lifecycle: create, update, and check.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::info;

use attesta_core::document::{
    Credential, OneOrMany, REVOCATION_LIST_CONTEXT, REVOCATION_LIST_CREDENTIAL_TYPE,
    REVOCATION_LIST_SUBJECT_TYPE, W3C_VC_CONTEXT, W3C_VC_TYPE,
};
use attesta_core::VcError;

use crate::list::RevocationList;

/// Build an unsigned revocation list credential over a zero-initialized
/// bitstring of exactly `list_size` bits.
///
/// `list_size` must already be validated as positive by the config layer.
pub fn create_revocation_credential(
    list_size: usize,
    issuer: &str,
) -> Result<Credential, VcError> {
    let encoded_list = RevocationList::new(list_size).encode()?;
    Ok(Credential {
        context: Some(json!([W3C_VC_CONTEXT, REVOCATION_LIST_CONTEXT])),
        credential_type: Some(OneOrMany::Many(vec![
            W3C_VC_TYPE.into(),
            REVOCATION_LIST_CREDENTIAL_TYPE.into(),
        ])),
        issuer: Some(Value::String(issuer.to_string())),
        issuance_date: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        credential_subject: Some(json!({
            "type": REVOCATION_LIST_SUBJECT_TYPE,
            "encodedList": encoded_list,
        })),
        ..Credential::default()
    })
}

/// Rebuild a list credential with the bit at `index` set to `revoked`.
///
/// The result is a fresh unsigned body with a new `issuanceDate`; the
/// caller re-signs and republishes it. The previous signature cannot be
/// carried over because the payload changes.
pub fn update_revocation_credential(
    list_credential: &Credential,
    index: usize,
    revoked: bool,
) -> Result<Credential, VcError> {
    if !list_credential.has_context(REVOCATION_LIST_CONTEXT) {
        return Err(VcError::InvalidRequest(format!(
            "revocation list credential is missing the {} context",
            REVOCATION_LIST_CONTEXT
        )));
    }
    let mut list = RevocationList::decode(encoded_list_of(list_credential)?)?;
    list.set(index, revoked)?;
    let encoded_list = list.encode()?;

    let mut subject = list_credential
        .credential_subject
        .clone()
        .unwrap_or_else(|| json!({}));
    subject["encodedList"] = Value::String(encoded_list);

    let updated = Credential {
        issuance_date: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        credential_subject: Some(subject),
        proof: None,
        ..list_credential.clone()
    };
    info!(
        credential_id = updated.id.as_deref().unwrap_or(""),
        index = index,
        revoked = revoked,
        "revocation list updated"
    );
    Ok(updated)
}

/// Read the revoked bit at `index` from a list credential.
pub fn check_revocation_status(
    list_credential: &Credential,
    index: usize,
) -> Result<bool, VcError> {
    let list = RevocationList::decode(encoded_list_of(list_credential)?)?;
    list.get(index)
}

fn encoded_list_of(credential: &Credential) -> Result<&str, VcError> {
    credential
        .credential_subject
        .as_ref()
        .and_then(|subject| subject.get("encodedList"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            VcError::CredentialLoad("revocation list credential has no encodedList".into())
        })
}
