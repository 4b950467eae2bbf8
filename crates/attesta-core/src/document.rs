use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::VcError;

/// W3C Verifiable Credentials v1 context URI. Must be first in `@context`
/// for credentials issued by this system.
pub const W3C_VC_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
/// RevocationList2020 context URI.
pub const REVOCATION_LIST_CONTEXT: &str = "https://w3id.org/vc-revocation-list-2020/v1";
pub const W3C_VC_TYPE: &str = "VerifiableCredential";
pub const REVOCATION_LIST_CREDENTIAL_TYPE: &str = "RevocationList2020Credential";
pub const REVOCATION_LIST_SUBJECT_TYPE: &str = "RevocationList2020";
pub const REVOCATION_STATUS_TYPE: &str = "RevocationList2020Status";
pub const ASSERTION_METHOD: &str = "assertionMethod";

/// JSON-LD-expanded forms of proof keys, accepted alongside the compact ones.
pub const VERIFICATION_METHOD_EXPANDED: &str = "https://w3id.org/security#verificationMethod";
pub const PROOF_PURPOSE_EXPANDED: &str = "https://w3id.org/security#proofPurpose";

/// One value or a list of values, as JSON-LD allows for most terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            Self::One(v) => Some(v),
            Self::Many(vs) => vs.first(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(vs) => vs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Self::One(v) => std::slice::from_ref(v).iter(),
            Self::Many(vs) => vs.iter(),
        }
    }
}

impl<T: PartialEq> OneOrMany<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| v == value)
    }
}

/// A URI-valued term that may appear as a bare string or as an object
/// carrying an `id` (the JSON-LD-expanded form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UriOrObject {
    Uri(String),
    Object {
        id: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl UriOrObject {
    pub fn id(&self) -> &str {
        match self {
            Self::Uri(uri) => uri,
            Self::Object { id, .. } => id,
        }
    }
}

/// Proof block attached to a credential or presentation.
///
/// Compact and JSON-LD-expanded key forms are both accepted on input; the
/// compact form is emitted on output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub proof_type: Option<String>,
    #[serde(
        alias = "https://w3id.org/security#verificationMethod",
        skip_serializing_if = "Option::is_none"
    )]
    pub verification_method: Option<UriOrObject>,
    #[serde(
        alias = "https://w3id.org/security#proofPurpose",
        skip_serializing_if = "Option::is_none"
    )]
    pub proof_purpose: Option<UriOrObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jws: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Proof {
    /// The verification method URI, unwrapping the object form to its id.
    pub fn verification_method(&self) -> Result<&str, VcError> {
        self.verification_method
            .as_ref()
            .map(UriOrObject::id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| VcError::InvalidRequest("Invalid proof!".into()))
    }
}

/// Index of a credential within a revocation list; serialized as a string
/// by the RevocationList2020 vocabulary, but numbers are tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListIndex {
    Number(u64),
    Text(String),
}

impl ListIndex {
    pub fn as_usize(&self) -> Result<usize, VcError> {
        match self {
            Self::Number(n) => Ok(*n as usize),
            Self::Text(s) => s.parse::<usize>().map_err(|_| {
                VcError::InvalidRequest(format!(
                    "could not parse revocation list index: {}",
                    s
                ))
            }),
        }
    }
}

/// `credentialStatus` entry referencing a revocation list credential.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub status_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_list_index: Option<ListIndex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_list_credential: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CredentialStatus {
    pub fn index(&self) -> Result<usize, VcError> {
        self.revocation_list_index
            .as_ref()
            .ok_or_else(|| {
                VcError::InvalidRequest("credentialStatus has no revocationListIndex".into())
            })?
            .as_usize()
    }
}

/// A W3C Verifiable Credential.
///
/// Unknown terms are preserved in `extra` so externally issued documents
/// survive a parse/serialize round trip intact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<OneOrMany<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuance_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_subject: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<CredentialStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<OneOrMany<Proof>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credential {
    /// The first attached proof, if any.
    pub fn first_proof(&self) -> Option<&Proof> {
        self.proof.as_ref().and_then(OneOrMany::first)
    }

    /// Issuer identifier, whether expressed as a string or an object.
    pub fn issuer_id(&self) -> Option<&str> {
        match self.issuer.as_ref()? {
            Value::String(s) => Some(s),
            Value::Object(obj) => obj.get("id").and_then(Value::as_str),
            _ => None,
        }
    }

    /// First entry of `@context`, whether the context is a string or array.
    pub fn first_context(&self) -> Option<&str> {
        match self.context.as_ref()? {
            Value::String(s) => Some(s),
            Value::Array(entries) => entries.first().and_then(Value::as_str),
            _ => None,
        }
    }

    /// Whether `@context` contains the given URI.
    pub fn has_context(&self, uri: &str) -> bool {
        match self.context.as_ref() {
            Some(Value::String(s)) => s == uri,
            Some(Value::Array(entries)) => {
                entries.iter().any(|e| e.as_str() == Some(uri))
            }
            _ => false,
        }
    }

    /// Whether `type` contains the given name.
    pub fn has_type(&self, name: &str) -> bool {
        self.credential_type
            .as_ref()
            .map(|t| t.iter().any(|s| s == name))
            .unwrap_or(false)
    }

    /// JSON form of the whole credential, proofs included.
    pub fn to_value(&self) -> Result<Value, VcError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// A W3C Verifiable Presentation wrapping zero or more credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub presentation_type: Option<OneOrMany<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verifiable_credential: Option<OneOrMany<Credential>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<OneOrMany<Proof>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Presentation {
    /// The embedded credentials, empty when none are present.
    pub fn credentials(&self) -> Vec<&Credential> {
        self.verifiable_credential
            .as_ref()
            .map(|vcs| vcs.iter().collect())
            .unwrap_or_default()
    }

    pub fn first_proof(&self) -> Option<&Proof> {
        self.proof.as_ref().and_then(OneOrMany::first)
    }

    pub fn to_value(&self) -> Result<Value, VcError> {
        Ok(serde_json::to_value(self)?)
    }
}
