//! The three suites of a run: proof creation by issuers, verification of
//! valid and malformed credentials by verifiers, and issuer x verifier
//! interoperability.

pub mod create;
pub mod interop;
pub mod verify;

use di_utils::vc::credential_template;
use futures::{stream, StreamExt};
use implementations::{ClientError, LabelledEndpoint, VcApiClient, VerifyResponse};
use interop_report::Outcome;
use serde_json::Value;
use tracing::{info, warn};

const MAX_REASON_BODY: usize = 200;

/// A credential secured by one issuer, or the reason issuance failed.
#[derive(Debug, Clone)]
pub struct Issued {
    pub label: String,
    pub implementation: String,
    pub credential: Result<Value, String>,
}

/// Asks every issuer to secure a fresh credential template.
///
/// Results keep the order of `issuers`.
pub async fn issue_all(client: &VcApiClient, issuers: &[LabelledEndpoint<'_>], concurrency: usize) -> Vec<Issued> {
    stream::iter(issuers)
        .map(|issuer| async move {
            let LabelledEndpoint {
                label,
                implementation,
                endpoint,
            } = issuer;

            let credential = match &endpoint.id {
                Some(issuer_id) => client
                    .issue(endpoint, &credential_template(issuer_id))
                    .await
                    .map_err(|e| e.to_string()),
                None => Err("issuer manifest has no `id`".to_string()),
            };

            match &credential {
                Ok(_) => info!("{label} issued a credential"),
                Err(reason) => warn!("{label} failed to issue: {reason}"),
            }

            Issued {
                label: label.clone(),
                implementation: implementation.to_string(),
                credential,
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// Picks the credential the verify suite mutates.
///
/// With a preferred implementation, only its issuers are considered; otherwise
/// the first successful issuance wins.
pub fn reference_credential<'a>(issued: &'a [Issued], preferred: Option<&str>) -> Option<&'a Issued> {
    issued
        .iter()
        .filter(|i| preferred.map_or(true, |name| i.implementation == name))
        .find(|i| i.credential.is_ok())
}

/// What a verifier is expected to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Accept,
    Reject,
}

/// Turns a verifier answer into an outcome.
///
/// Rejections must be client errors (4xx): a server error is not a
/// conformant way of refusing a credential.
pub fn judge(expectation: Expectation, response: Result<VerifyResponse, ClientError>) -> Outcome {
    let response = match response {
        Ok(response) => response,
        Err(e) => return Outcome::failed(e),
    };

    match expectation {
        Expectation::Accept if response.is_success() => Outcome::Passed,
        Expectation::Accept => Outcome::failed(format!(
            "expected the credential to verify, got status {}: {}",
            response.status,
            brief(&response.body)
        )),
        Expectation::Reject if response.is_client_error() => Outcome::Passed,
        Expectation::Reject if response.is_success() => Outcome::failed(format!(
            "invalid credential was accepted (status {})",
            response.status
        )),
        Expectation::Reject => Outcome::failed(format!(
            "expected a 4xx error, got status {}: {}",
            response.status,
            brief(&response.body)
        )),
    }
}

fn brief(body: &Value) -> String {
    let text = match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match text.char_indices().nth(MAX_REASON_BODY) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text,
    }
}
