use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use url::Url;

use crate::methods::DIDKeyMethod;

use super::{
    model::{decode_proof_value, ProofError},
    ASSERTION_METHOD, ED25519_2020_CONTEXT, ED25519_SIGNATURE_2020,
};

lazy_static! {
    // XMLSCHEMA-11 dateTime lexical space
    static ref XSD_DATETIME: Regex = Regex::new(
        r"^-?([1-9][0-9]{3,}|0[0-9]{3})-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])T(([01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9](\.[0-9]+)?|(24:00:00(\.0+)?))(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00))?$"
    )
    .unwrap();
}

/// A single structural requirement placed on Ed25519Signature2020 proofs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProofRule {
    ProofPresent,
    ProofType,
    Created,
    VerificationMethod,
    ProofPurpose,
    ProofValue,
    SuiteContext,
    VerificationKey,
}

impl ProofRule {
    pub const ALL: [ProofRule; 8] = [
        ProofRule::ProofPresent,
        ProofRule::ProofType,
        ProofRule::Created,
        ProofRule::VerificationMethod,
        ProofRule::ProofPurpose,
        ProofRule::ProofValue,
        ProofRule::SuiteContext,
        ProofRule::VerificationKey,
    ];

    /// Human readable statement of the rule, used as report row name.
    pub fn description(&self) -> &'static str {
        match self {
            ProofRule::ProofPresent => "`proof` field MUST exist at top-level of data object and be a single object",
            ProofRule::ProofType => "`proof.type` field MUST exist and be `Ed25519Signature2020`",
            ProofRule::Created => "`proof.created` field MUST exist and be a valid XMLSCHEMA-11 dateTime value",
            ProofRule::VerificationMethod => "`proof.verificationMethod` field MUST exist and be a valid URL",
            ProofRule::ProofPurpose => "`proof.proofPurpose` field MUST exist and match the expected purpose",
            ProofRule::ProofValue => {
                "`proof.proofValue` field MUST exist and be a multibase base58-btc encoded 64-byte Ed25519 signature"
            }
            ProofRule::SuiteContext => "`@context` MUST include the Ed25519Signature2020 context",
            ProofRule::VerificationKey => "`did:key` verification methods MUST encode an Ed25519 public key",
        }
    }
}

/// A rule that a secured document fails, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofViolation {
    pub rule: ProofRule,
    pub message: String,
}

impl std::fmt::Display for ProofViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.rule, self.message)
    }
}

/// Outcome of a rule that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofCheck {
    Satisfied,
    /// The rule could not be evaluated locally, e.g. a non `did:key`
    /// verification method.
    NotApplicable(String),
}

/// Checks secured documents against the structural rules of Ed25519Signature2020.
#[derive(Debug, Clone)]
pub struct ProofInspector {
    expected_purpose: String,
}

impl Default for ProofInspector {
    fn default() -> Self {
        Self::new(ASSERTION_METHOD)
    }
}

impl ProofInspector {
    pub fn new(expected_purpose: impl Into<String>) -> Self {
        Self {
            expected_purpose: expected_purpose.into(),
        }
    }

    /// Evaluates every rule and collects the violations.
    pub fn inspect(&self, document: &Value) -> Vec<ProofViolation> {
        ProofRule::ALL
            .iter()
            .filter_map(|rule| self.check(*rule, document).err())
            .collect()
    }

    /// Evaluates a single rule against `document`.
    ///
    /// Each rule reads only the fields it is about, so a malformed field
    /// violates its own rule and no other.
    pub fn check(&self, rule: ProofRule, document: &Value) -> Result<ProofCheck, ProofViolation> {
        let violation = |message: String| ProofViolation { rule, message };
        let proof = || proof_object(document).map_err(|e| violation(e.to_string()));

        match rule {
            ProofRule::ProofPresent => proof().map(|_| ProofCheck::Satisfied),
            ProofRule::ProofType => match text(proof()?, "type").map_err(violation)? {
                ED25519_SIGNATURE_2020 => Ok(ProofCheck::Satisfied),
                other => Err(violation(format!("unexpected proof type `{other}`"))),
            },
            ProofRule::Created => match text(proof()?, "created").map_err(violation)? {
                created if XSD_DATETIME.is_match(created) => Ok(ProofCheck::Satisfied),
                created => Err(violation(format!("`{created}` is not an XMLSCHEMA-11 dateTime"))),
            },
            ProofRule::VerificationMethod => {
                let vm = text(proof()?, "verificationMethod").map_err(violation)?;
                Url::parse(vm)
                    .map(|_| ProofCheck::Satisfied)
                    .map_err(|e| violation(format!("`{vm}` is not a URL: {e}")))
            }
            ProofRule::ProofPurpose => match text(proof()?, "proofPurpose").map_err(violation)? {
                purpose if purpose == self.expected_purpose => Ok(ProofCheck::Satisfied),
                purpose => Err(violation(format!(
                    "expected `{}`, found `{purpose}`",
                    self.expected_purpose
                ))),
            },
            ProofRule::ProofValue => decode_proof_value(text(proof()?, "proofValue").map_err(violation)?)
                .map(|_| ProofCheck::Satisfied)
                .map_err(|e| violation(e.to_string())),
            ProofRule::SuiteContext => {
                let in_document = includes_context(document.get("@context"));
                let in_proof = includes_context(document.get("proof").and_then(|p| p.get("@context")));
                if in_document || in_proof {
                    Ok(ProofCheck::Satisfied)
                } else {
                    Err(violation(format!("`{ED25519_2020_CONTEXT}` not found")))
                }
            }
            ProofRule::VerificationKey => match text(proof()?, "verificationMethod").map_err(violation)? {
                vm if vm.starts_with(DIDKeyMethod::name()) => DIDKeyMethod::ed25519_verification_key(vm)
                    .map(|_| ProofCheck::Satisfied)
                    .map_err(|e| violation(e.to_string())),
                vm => Ok(ProofCheck::NotApplicable(format!("`{vm}` is not resolvable locally"))),
            },
        }
    }
}

fn proof_object(document: &Value) -> Result<&Map<String, Value>, ProofError> {
    match document.get("proof") {
        Some(Value::Object(proof)) => Ok(proof),
        Some(_) => Err(ProofError::NotAnObject),
        None => Err(ProofError::MissingProof),
    }
}

fn text<'a>(proof: &'a Map<String, Value>, field: &str) -> Result<&'a str, String> {
    match proof.get(field) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(format!("`{field}` must be a string, found `{other}`")),
        None => Err(format!("missing `{field}`")),
    }
}

fn includes_context(context: Option<&Value>) -> bool {
    match context {
        Some(Value::String(c)) => c == ED25519_2020_CONTEXT,
        Some(Value::Array(contexts)) => contexts.iter().any(|c| c.as_str() == Some(ED25519_2020_CONTEXT)),
        _ => false,
    }
}
