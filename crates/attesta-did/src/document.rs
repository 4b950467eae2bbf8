use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use attesta_core::document::OneOrMany;
use attesta_core::VcError;

/// A key object inside a DID document.
///
/// Key material is read-only: it is sourced from resolved or cached DID
/// documents and never mutated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub key_type: Option<OneOrMany<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_base58: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_pem: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KeyInfo {
    /// Whether `type` names the given key type, in either the single-string
    /// or array form.
    pub fn has_type(&self, name: &str) -> bool {
        self.key_type
            .as_ref()
            .map(|t| t.iter().any(|s| s == name))
            .unwrap_or(false)
    }
}

/// Entry in a purpose list: an inline key object or a reference by id into
/// the document's key set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyEntry {
    Reference(String),
    Key(KeyInfo),
}

impl KeyEntry {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Reference(id) => Some(id),
            Self::Key(key) => key.id.as_deref(),
        }
    }
}

/// A resolved DID document: a key set plus purpose lists whose entries are
/// inline keys or references into the key set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub public_key: Vec<KeyInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertion_method: Vec<KeyEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<KeyEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DidDocument {
    /// Locate the key object for a verification method URI.
    ///
    /// Purpose lists are searched in order: `publicKey`, then
    /// `assertionMethod`, then `authentication`. References are chased into
    /// the `publicKey` set. A method absent from all lists is unauthorized.
    pub fn find_key(&self, verification_method: &str) -> Result<&KeyInfo, VcError> {
        if let Some(key) = self.key_by_id(verification_method) {
            return Ok(key);
        }
        for entry in self.assertion_method.iter().chain(&self.authentication) {
            match entry {
                KeyEntry::Key(key) if key.id.as_deref() == Some(verification_method) => {
                    return Ok(key)
                }
                KeyEntry::Reference(id) if id == verification_method => {
                    if let Some(key) = self.key_by_id(id) {
                        return Ok(key);
                    }
                }
                _ => {}
            }
        }
        Err(VcError::InvalidRequest(
            "Could not find verification method in DID document".into(),
        ))
    }

    fn key_by_id(&self, id: &str) -> Option<&KeyInfo> {
        self.public_key
            .iter()
            .find(|key| key.id.as_deref() == Some(id))
    }

    /// Whether the `assertionMethod` list authorizes the given method, by
    /// string reference or inline key id.
    pub fn authorizes_assertion_method(&self, verification_method: &str) -> bool {
        self.assertion_method
            .iter()
            .any(|entry| entry.id() == Some(verification_method))
    }
}
