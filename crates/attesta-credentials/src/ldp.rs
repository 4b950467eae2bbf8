//! Linked-data proof construction and verification.
//!
//! The signing payload is the canonical (JCS, RFC 8785) serialization of
//! the document with its `proof` replaced by the proof options minus the
//! `jws` entry. Issuance and verification both derive the payload the same
//! way, so a signature produced here verifies here regardless of key order
//! in the incoming JSON.

use serde_json::Value;

use attesta_core::classify::{classify_verification_error, RawFailure};
use attesta_core::document::Proof;
use attesta_core::VcError;
use attesta_crypto::{decode_detached, sign_detached, Ed25519KeyPair};

use crate::suites::SignatureSuite;

/// Canonical signing payload for a document and proof options.
pub fn signing_payload(document: &Value, proof_options: &Proof) -> Result<Vec<u8>, VcError> {
    let mut doc = document.clone();
    if let Some(obj) = doc.as_object_mut() {
        obj.remove("proof");
        let mut options = proof_options.clone();
        options.jws = None;
        obj.insert("proof".into(), serde_json::to_value(options)?);
    }
    serde_jcs::to_vec(&doc).map_err(|e| VcError::Api(format!("canonicalization failed: {}", e)))
}

/// Sign a document with Ed25519, returning the completed proof.
pub fn sign_value(
    document: &Value,
    mut options: Proof,
    keypair: &Ed25519KeyPair,
) -> Result<Proof, VcError> {
    let payload = signing_payload(document, &options)?;
    options.jws = Some(sign_detached(&payload, keypair));
    Ok(options)
}

/// Verify one proof on a document against a resolved suite.
///
/// `expected_purpose` is `assertionMethod` for credentials and
/// `authentication` for presentations.
pub fn verify_proof(
    document: &Value,
    proof: &Proof,
    suite: &SignatureSuite,
    expected_purpose: &str,
) -> Result<(), VcError> {
    let purpose_matches = proof
        .proof_purpose
        .as_ref()
        .map(|p| p.id() == expected_purpose)
        .unwrap_or(false);
    let type_matches = proof.proof_type.as_deref() == Some(suite.suite_type());
    if !purpose_matches || !type_matches {
        return Err(classify_verification_error(no_matching_proofs()));
    }

    let Some(jws) = proof.jws.as_deref() else {
        return Err(classify_verification_error(no_matching_proofs()));
    };
    let decoded = decode_detached(jws).map_err(|e| {
        classify_verification_error(
            RawFailure::new(e.to_string()).with_nested(vec![
                "The property \"jws\" in the input was not defined in the context.".into(),
            ]),
        )
    })?;

    let payload = signing_payload(document, proof)?;
    let input = decoded.signing_input(&payload);
    suite.verify(&input, &decoded)
}

/// Wrap credentials in an unsigned presentation.
pub fn create_presentation(
    credentials: Vec<attesta_core::document::Credential>,
    holder: Option<&str>,
) -> attesta_core::Presentation {
    use attesta_core::document::{OneOrMany, Presentation};
    Presentation {
        context: Some(serde_json::json!([
            attesta_core::document::W3C_VC_CONTEXT
        ])),
        presentation_type: Some(OneOrMany::Many(vec!["VerifiablePresentation".into()])),
        holder: holder.map(str::to_string),
        verifiable_credential: if credentials.is_empty() {
            None
        } else {
            Some(OneOrMany::Many(credentials))
        },
        ..Presentation::default()
    }
}

/// Sign a presentation with an `authentication` proof bound to a challenge.
pub fn sign_presentation(
    mut presentation: attesta_core::Presentation,
    keypair: &Ed25519KeyPair,
    verification_method: &str,
    challenge: &str,
    domain: Option<&str>,
) -> Result<attesta_core::Presentation, VcError> {
    use attesta_core::document::{OneOrMany, UriOrObject};
    let options = Proof {
        proof_type: Some(crate::suites::SUITE_ED25519.into()),
        created: Some(
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        ),
        verification_method: Some(UriOrObject::Uri(verification_method.to_string())),
        proof_purpose: Some(UriOrObject::Uri("authentication".into())),
        challenge: Some(challenge.to_string()),
        domain: domain.map(str::to_string),
        ..Proof::default()
    };
    let document = presentation.to_value()?;
    let proof = sign_value(&document, options, keypair)?;
    presentation.proof = Some(OneOrMany::One(proof));
    Ok(presentation)
}

fn no_matching_proofs() -> RawFailure {
    RawFailure::new("Verification error").with_nested(vec![
        "Could not verify any proofs; no proofs matched the required suite and purpose.".into(),
    ])
}
