//! Negative fixtures derived from a valid secured credential.

use di_utils::{
    crypto::{CoreSign, Ed25519KeyPair, Error as CryptoError, Generate},
    proof::{Proof, ProofError, ED25519_2020_CONTEXT},
};
use multibase::Base;
use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("credential is not a JSON object")]
    NotAnObject,
    #[error("credential has no `{0}` to mutate")]
    MissingField(&'static str),
    #[error(transparent)]
    Proof(#[from] ProofError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// A named alteration of a secured credential that verifiers must reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    ProofMissing,
    ProofNotObject,
    ProofTypeMissing,
    ProofTypeWrong,
    CreatedMissing,
    CreatedInvalid,
    VerificationMethodMissing,
    VerificationMethodInvalid,
    ProofPurposeMissing,
    ProofPurposeMismatch,
    ProofValueMissing,
    ProofValueNotBase58Btc,
    ProofValueTruncated,
    ProofValueForeignSignature,
    CredentialTampered,
    ContextMissingSuite,
}

impl Mutation {
    pub const ALL: [Mutation; 16] = [
        Mutation::ProofMissing,
        Mutation::ProofNotObject,
        Mutation::ProofTypeMissing,
        Mutation::ProofTypeWrong,
        Mutation::CreatedMissing,
        Mutation::CreatedInvalid,
        Mutation::VerificationMethodMissing,
        Mutation::VerificationMethodInvalid,
        Mutation::ProofPurposeMissing,
        Mutation::ProofPurposeMismatch,
        Mutation::ProofValueMissing,
        Mutation::ProofValueNotBase58Btc,
        Mutation::ProofValueTruncated,
        Mutation::ProofValueForeignSignature,
        Mutation::CredentialTampered,
        Mutation::ContextMissingSuite,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Mutation::ProofMissing => "proof-missing",
            Mutation::ProofNotObject => "proof-not-object",
            Mutation::ProofTypeMissing => "proof-type-missing",
            Mutation::ProofTypeWrong => "proof-type-wrong",
            Mutation::CreatedMissing => "created-missing",
            Mutation::CreatedInvalid => "created-invalid",
            Mutation::VerificationMethodMissing => "vm-missing",
            Mutation::VerificationMethodInvalid => "vm-invalid",
            Mutation::ProofPurposeMissing => "purpose-missing",
            Mutation::ProofPurposeMismatch => "purpose-mismatch",
            Mutation::ProofValueMissing => "proof-value-missing",
            Mutation::ProofValueNotBase58Btc => "proof-value-not-base58btc",
            Mutation::ProofValueTruncated => "proof-value-truncated",
            Mutation::ProofValueForeignSignature => "proof-value-foreign-signature",
            Mutation::CredentialTampered => "credential-tampered",
            Mutation::ContextMissingSuite => "context-missing-suite",
        }
    }

    /// Statement of the requirement the mutation exercises, used as report row name.
    pub fn description(&self) -> &'static str {
        match self {
            Mutation::ProofMissing => "If the `proof` field is missing, an error MUST be raised",
            Mutation::ProofNotObject => "If the `proof` field is not a single object, an error MUST be raised",
            Mutation::ProofTypeMissing => "If the `proof.type` field is missing, an error MUST be raised",
            Mutation::ProofTypeWrong => "If the `proof.type` field is not `Ed25519Signature2020`, an error MUST be raised",
            Mutation::CreatedMissing => "If the `proof.created` field is missing, an error MUST be raised",
            Mutation::CreatedInvalid => {
                "If the `proof.created` field is not a valid XMLSCHEMA-11 dateTime, an error MUST be raised"
            }
            Mutation::VerificationMethodMissing => {
                "If the `proof.verificationMethod` field is missing, an error MUST be raised"
            }
            Mutation::VerificationMethodInvalid => {
                "If the `proof.verificationMethod` field is not a URL, an error MUST be raised"
            }
            Mutation::ProofPurposeMissing => "If the `proof.proofPurpose` field is missing, an error MUST be raised",
            Mutation::ProofPurposeMismatch => {
                "If the `proof.proofPurpose` field does not match the expected purpose, an error MUST be raised"
            }
            Mutation::ProofValueMissing => "If the `proof.proofValue` field is missing, an error MUST be raised",
            Mutation::ProofValueNotBase58Btc => {
                "If the `proof.proofValue` field is not multibase base58-btc encoded, an error MUST be raised"
            }
            Mutation::ProofValueTruncated => {
                "If the `proof.proofValue` field does not decode to 64 bytes, an error MUST be raised"
            }
            Mutation::ProofValueForeignSignature => {
                "If the `proof.proofValue` signature was produced by another key, an error MUST be raised"
            }
            Mutation::CredentialTampered => {
                "If the credential was modified after signing, an error MUST be raised"
            }
            Mutation::ContextMissingSuite => {
                "If `@context` does not include the Ed25519Signature2020 context, an error MUST be raised"
            }
        }
    }

    /// Produces the mutated copy of `credential`.
    pub fn apply(&self, credential: &Value) -> Result<Value, MutationError> {
        let mut doc = credential.clone();
        let root = doc.as_object_mut().ok_or(MutationError::NotAnObject)?;

        match self {
            Mutation::ProofMissing => {
                root.remove("proof").ok_or(MutationError::MissingField("proof"))?;
            }
            Mutation::ProofNotObject => {
                let proof = root.get_mut("proof").ok_or(MutationError::MissingField("proof"))?;
                *proof = json!("not-an-object");
            }
            Mutation::ProofTypeMissing => remove(proof_mut(root)?, "type")?,
            Mutation::ProofTypeWrong => replace(proof_mut(root)?, "type", json!("Ed25519Signature2018"))?,
            Mutation::CreatedMissing => remove(proof_mut(root)?, "created")?,
            Mutation::CreatedInvalid => replace(proof_mut(root)?, "created", json!("not-a-date"))?,
            Mutation::VerificationMethodMissing => remove(proof_mut(root)?, "verificationMethod")?,
            Mutation::VerificationMethodInvalid => {
                replace(proof_mut(root)?, "verificationMethod", json!("not-a-url"))?
            }
            Mutation::ProofPurposeMissing => remove(proof_mut(root)?, "proofPurpose")?,
            Mutation::ProofPurposeMismatch => replace(proof_mut(root)?, "proofPurpose", json!("authentication"))?,
            Mutation::ProofValueMissing => remove(proof_mut(root)?, "proofValue")?,
            Mutation::ProofValueNotBase58Btc => {
                let signature = Proof::from_document(credential)?.signature_bytes()?;
                replace(
                    proof_mut(root)?,
                    "proofValue",
                    json!(multibase::encode(Base::Base64Url, signature)),
                )?
            }
            Mutation::ProofValueTruncated => {
                let signature = Proof::from_document(credential)?.signature_bytes()?;
                let truncated = &signature[..signature.len() - 8];
                replace(
                    proof_mut(root)?,
                    "proofValue",
                    json!(multibase::encode(Base::Base58Btc, truncated)),
                )?
            }
            Mutation::ProofValueForeignSignature => {
                // Well-formed signature over the same bytes, from an unrelated key.
                let payload = serde_json::to_vec(credential).map_err(|e| ProofError::Malformed(e.to_string()))?;
                let signature = Ed25519KeyPair::new()?.sign(&payload)?;
                replace(
                    proof_mut(root)?,
                    "proofValue",
                    json!(multibase::encode(Base::Base58Btc, signature)),
                )?
            }
            Mutation::CredentialTampered => {
                // several subjects: alter the first
                let subject = match root.get_mut("credentialSubject") {
                    Some(Value::Array(subjects)) => subjects.first_mut().and_then(Value::as_object_mut),
                    Some(subject) => subject.as_object_mut(),
                    None => None,
                }
                .ok_or(MutationError::MissingField("credentialSubject"))?;
                subject.insert("id".to_string(), json!("did:example:tampered"));
            }
            Mutation::ContextMissingSuite => {
                let in_document = root.get_mut("@context").map(strip_suite_context).unwrap_or(false);
                let in_proof = root
                    .get_mut("proof")
                    .and_then(|p| p.get_mut("@context"))
                    .map(strip_suite_context)
                    .unwrap_or(false);
                if !in_document && !in_proof {
                    return Err(MutationError::MissingField("@context"));
                }
            }
        }

        Ok(doc)
    }
}

fn proof_mut(root: &mut Map<String, Value>) -> Result<&mut Map<String, Value>, MutationError> {
    match root.get_mut("proof") {
        Some(Value::Object(proof)) => Ok(proof),
        Some(_) => Err(ProofError::NotAnObject.into()),
        None => Err(ProofError::MissingProof.into()),
    }
}

fn remove(proof: &mut Map<String, Value>, field: &'static str) -> Result<(), MutationError> {
    proof.remove(field).map(|_| ()).ok_or(MutationError::MissingField(field))
}

fn replace(proof: &mut Map<String, Value>, field: &'static str, value: Value) -> Result<(), MutationError> {
    match proof.get_mut(field) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(MutationError::MissingField(field)),
    }
}

// Removes the suite context; a context that was only the suite URL becomes an empty list.
fn strip_suite_context(context: &mut Value) -> bool {
    if context.as_str() == Some(ED25519_2020_CONTEXT) {
        *context = json!([]);
        return true;
    }

    match context.as_array_mut() {
        Some(contexts) => {
            let before = contexts.len();
            contexts.retain(|c| c.as_str() != Some(ED25519_2020_CONTEXT));
            contexts.len() != before
        }
        None => false,
    }
}
