use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::proof::ED25519_2020_CONTEXT;

/// The base context of VC Data Model 1.1 credentials.
pub const CREDENTIALS_V1_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Subject identifier used by the fixtures, taken from the VC Data Model examples.
pub const SUBJECT_ID: &str = "did:example:ebfeb1f712ebc6f1c276e12ec21";

/// Builds the unsigned credential an issuer is asked to secure.
///
/// Each call yields a fresh `urn:uuid` identifier and an `issuanceDate`
/// truncated to whole seconds.
pub fn credential_template(issuer_id: &str) -> Value {
    json!({
        "@context": [CREDENTIALS_V1_CONTEXT, ED25519_2020_CONTEXT],
        "type": ["VerifiableCredential"],
        "id": format!("urn:uuid:{}", Uuid::new_v4()),
        "issuer": issuer_id,
        "issuanceDate": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "credentialSubject": {
            "id": SUBJECT_ID
        }
    })
}
