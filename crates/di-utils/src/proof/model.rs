use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::crypto::SIGNATURE_LENGTH;

/// Errors raised while reading a proof out of a secured document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProofError {
    #[error("document has no proof")]
    MissingProof,
    #[error("proof is not a single JSON object")]
    NotAnObject,
    #[error("proof is malformed: {0}")]
    Malformed(String),
    #[error("proof has no proofValue")]
    MissingProofValue,
    #[error("proofValue is not multibase encoded")]
    InvalidMultibase,
    #[error("proofValue must be base58btc encoded, found {0:?}")]
    NotBase58Btc(multibase::Base),
    #[error("proofValue decodes to {0} bytes, expected {SIGNATURE_LENGTH}")]
    InvalidSignatureLength(usize),
}

/// An Ed25519Signature2020 proof as found in a secured document.
///
/// Fields are kept optional and `created` is kept verbatim: the suite reads
/// proofs produced by implementations under test and reports on their shape
/// instead of refusing to parse them.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    // See https://www.w3.org/TR/vc-data-integrity/#dfn-proof-type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub proof_type: Option<String>,

    // XMLSCHEMA-11 dateTime, validated by the inspector
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    // See https://www.w3.org/TR/vc-data-integrity/#dfn-verification-method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<String>,

    // See https://www.w3.org/TR/vc-data-integrity/#dfn-proof-purpose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,

    // Multibase base58btc encoding of the 64-byte Ed25519 signature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_value: Option<String>,

    // === Properties Map===
    #[serde(flatten)]
    pub additional_properties: BTreeMap<String, Value>,
}

impl Proof {
    /// Reads the single proof attached to `document`.
    pub fn from_document(document: &Value) -> Result<Proof, ProofError> {
        match document.get("proof") {
            None => Err(ProofError::MissingProof),
            Some(proof @ Value::Object(_)) => {
                serde_json::from_value(proof.clone()).map_err(|e| ProofError::Malformed(e.to_string()))
            }
            Some(_) => Err(ProofError::NotAnObject),
        }
    }

    /// Decodes `proofValue` into the raw signature bytes.
    pub fn signature_bytes(&self) -> Result<Vec<u8>, ProofError> {
        let proof_value = self.proof_value.as_deref().ok_or(ProofError::MissingProofValue)?;
        decode_proof_value(proof_value)
    }
}

/// Decodes a `proofValue`, enforcing the base58btc multibase header and the
/// RFC8032 signature length.
pub fn decode_proof_value(proof_value: &str) -> Result<Vec<u8>, ProofError> {
    let (base, bytes) = multibase::decode(proof_value).map_err(|_| ProofError::InvalidMultibase)?;

    if base != multibase::Base::Base58Btc {
        return Err(ProofError::NotBase58Btc(base));
    }

    if bytes.len() != SIGNATURE_LENGTH {
        return Err(ProofError::InvalidSignatureLength(bytes.len()));
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use multibase::Base;
    use serde_json::json;

    use super::*;

    fn secured(proof: Value) -> Value {
        json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiableCredential"],
            "proof": proof,
        })
    }

    #[test]
    fn test_from_document_reads_camel_case_fields() {
        let signature = multibase::encode(Base::Base58Btc, [9u8; 64]);
        let doc = secured(json!({
            "type": "Ed25519Signature2020",
            "created": "2022-12-24T23:59:59Z",
            "verificationMethod": "did:key:z6Mk#z6Mk",
            "proofPurpose": "assertionMethod",
            "proofValue": signature,
            "domain": "example.org",
        }));

        let proof = Proof::from_document(&doc).unwrap();
        assert_eq!(proof.proof_type.as_deref(), Some("Ed25519Signature2020"));
        assert_eq!(proof.created.as_deref(), Some("2022-12-24T23:59:59Z"));
        assert_eq!(proof.proof_purpose.as_deref(), Some("assertionMethod"));
        assert_eq!(proof.additional_properties.get("domain"), Some(&json!("example.org")));
        assert_eq!(proof.signature_bytes().unwrap(), vec![9u8; 64]);

        // unknown members survive serialization
        assert_eq!(serde_json::to_value(&proof).unwrap(), doc["proof"]);
    }

    #[test]
    fn test_from_document_rejects_missing_or_non_object_proof() {
        let doc = json!({"type": ["VerifiableCredential"]});
        assert_eq!(Proof::from_document(&doc), Err(ProofError::MissingProof));

        let doc = secured(json!([{"type": "Ed25519Signature2020"}]));
        assert_eq!(Proof::from_document(&doc), Err(ProofError::NotAnObject));

        let doc = secured(json!({"type": 42}));
        assert!(matches!(Proof::from_document(&doc), Err(ProofError::Malformed(_))));
    }

    #[test]
    fn test_signature_bytes_enforces_encoding_and_length() {
        let proof = |value: String| Proof {
            proof_value: Some(value),
            ..Proof::from_document(&secured(json!({}))).unwrap()
        };

        assert_eq!(
            proof(multibase::encode(Base::Base64Url, [1u8; 64])).signature_bytes(),
            Err(ProofError::NotBase58Btc(Base::Base64Url))
        );
        assert_eq!(
            proof(multibase::encode(Base::Base58Btc, [1u8; 56])).signature_bytes(),
            Err(ProofError::InvalidSignatureLength(56))
        );
        assert_eq!(proof("not multibase!".to_string()).signature_bytes(), Err(ProofError::InvalidMultibase));
    }
}
