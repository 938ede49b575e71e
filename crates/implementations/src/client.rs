use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    errors::ClientError,
    model::Endpoint,
    retry::{retry_async, RetryOptions},
};

const MAX_BODY_EXCERPT: usize = 512;

/// Raw outcome of a verification request.
///
/// Whether the status is the expected one depends on the test case, so the
/// client does not judge it.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyResponse {
    pub status: u16,
    pub body: Value,
}

impl VerifyResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }
}

/// HTTP client for the VC-API issue and verify operations.
#[derive(Debug, Clone)]
pub struct VcApiClient {
    http: reqwest::Client,
    retry: RetryOptions,
}

impl VcApiClient {
    pub fn new(timeout: Duration, retry: RetryOptions) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self { http, retry })
    }

    /// Asks an issuer to secure `credential` and returns the secured credential.
    pub async fn issue(&self, endpoint: &Endpoint, credential: &Value) -> Result<Value, ClientError> {
        let body = json!({
            "credential": credential,
            "options": endpoint.options.clone().unwrap_or_else(|| json!({})),
        });

        let (status, response) = self.post(endpoint, &body).await?;
        if status != 200 && status != 201 {
            return Err(ClientError::UnexpectedStatus {
                endpoint: endpoint.endpoint.to_string(),
                status,
                body: excerpt(&response),
            });
        }

        match response {
            Value::Object(mut map) => match map.remove("verifiableCredential") {
                Some(vc @ Value::Object(_)) => Ok(vc),
                Some(other) => Err(ClientError::InvalidResponse {
                    endpoint: endpoint.endpoint.to_string(),
                    reason: format!("`verifiableCredential` is not an object: {}", excerpt(&other)),
                }),
                None if map.contains_key("proof") => Ok(Value::Object(map)),
                None => Err(ClientError::InvalidResponse {
                    endpoint: endpoint.endpoint.to_string(),
                    reason: "neither `verifiableCredential` nor `proof` found".to_string(),
                }),
            },
            other => Err(ClientError::InvalidResponse {
                endpoint: endpoint.endpoint.to_string(),
                reason: format!("expected a JSON object, got {}", excerpt(&other)),
            }),
        }
    }

    /// Submits `credential` to a verifier, asking for the proof check.
    pub async fn verify(&self, endpoint: &Endpoint, credential: &Value) -> Result<VerifyResponse, ClientError> {
        let body = json!({
            "verifiableCredential": credential,
            "options": {"checks": ["proof"]},
        });

        let (status, body) = self.post(endpoint, &body).await?;
        Ok(VerifyResponse { status, body })
    }

    async fn post(&self, endpoint: &Endpoint, body: &Value) -> Result<(u16, Value), ClientError> {
        let headers = headers(endpoint)?;
        let url = endpoint.endpoint.clone();

        let response = retry_async(
            || {
                self.http
                    .post(url.clone())
                    .headers(headers.clone())
                    .json(body)
                    .send()
            },
            |e: &reqwest::Error| {
                let retry = e.is_connect() || e.is_timeout();
                if retry {
                    warn!("transient failure on {url}: {e}");
                }
                retry
            },
            &self.retry,
        )
        .await
        .map_err(|source| ClientError::Transport {
            endpoint: url.to_string(),
            source,
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|source| ClientError::Transport {
            endpoint: url.to_string(),
            source,
        })?;
        debug!("POST {url} -> {status}");

        // Non-JSON bodies are kept as strings for diagnostics.
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok((status, body))
    }
}

fn headers(endpoint: &Endpoint) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &endpoint.headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| ClientError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader(name.to_string()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn excerpt(body: &Value) -> String {
    let text = match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match text.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use mockito::{Matcher, Server};
    use tokio::net::TcpListener;

    use super::*;

    // Accepts connections and counts them; `hold` keeps them open without
    // answering, otherwise they are closed right away.
    async fn raw_listener(hold: bool) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/credentials/verify", listener.local_addr().unwrap());
        let accepted = Arc::new(AtomicUsize::new(0));

        let counter = accepted.clone();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                if hold {
                    open.push(socket);
                }
            }
        });

        (url, accepted)
    }

    fn endpoint(url: String) -> Endpoint {
        serde_json::from_value(json!({
            "id": "did:example:issuer",
            "endpoint": url,
            "tags": ["Ed25519Signature2020"],
            "headers": {"Authorization": "Bearer secret"}
        }))
        .unwrap()
    }

    fn client() -> VcApiClient {
        let retry = RetryOptions::new().retries(1).fixed_backoff(Duration::from_millis(1));
        VcApiClient::new(Duration::from_secs(5), retry).unwrap()
    }

    #[tokio::test]
    async fn test_issue_unwraps_verifiable_credential() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/credentials/issue")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::PartialJson(json!({"credential": {"issuer": "did:example:issuer"}, "options": {}})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"verifiableCredential": {"issuer": "did:example:issuer", "proof": {}}}"#)
            .create_async()
            .await;

        let vc = client()
            .issue(
                &endpoint(format!("{}/credentials/issue", server.url())),
                &json!({"issuer": "did:example:issuer"}),
            )
            .await
            .unwrap();

        assert_eq!(vc, json!({"issuer": "did:example:issuer", "proof": {}}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_issue_accepts_bare_credential_and_rejects_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/bare")
            .with_status(200)
            .with_body(r#"{"issuer": "did:example:issuer", "proof": {"type": "Ed25519Signature2020"}}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/broken")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;
        server
            .mock("POST", "/empty")
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        let client = client();
        let credential = json!({"issuer": "did:example:issuer"});

        let vc = client
            .issue(&endpoint(format!("{}/bare", server.url())), &credential)
            .await
            .unwrap();
        assert_eq!(vc["proof"]["type"], "Ed25519Signature2020");

        let err = client
            .issue(&endpoint(format!("{}/broken", server.url())), &credential)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedStatus { status: 500, ref body, .. } if body == "internal error"));

        let err = client
            .issue(&endpoint(format!("{}/empty", server.url())), &credential)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_verify_reports_status_without_judging() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/credentials/verify")
            .match_body(Matcher::PartialJson(json!({"options": {"checks": ["proof"]}})))
            .with_status(400)
            .with_body(r#"{"verified": false}"#)
            .expect(1)
            .create_async()
            .await;

        let response = client()
            .verify(&endpoint(format!("{}/credentials/verify", server.url())), &json!({}))
            .await
            .unwrap();

        assert_eq!(response.status, 400);
        assert!(response.is_client_error());
        assert!(!response.is_success());
        assert_eq!(response.body, json!({"verified": false}));
        // http failures are answers, never retried
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_transport_error() {
        let err = client()
            .verify(&endpoint("http://127.0.0.1:1/verify".to_string()), &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_timeouts_are_retried() {
        let (url, accepted) = raw_listener(true).await;
        let retry = RetryOptions::new().retries(1).fixed_backoff(Duration::from_millis(1));
        let client = VcApiClient::new(Duration::from_millis(100), retry).unwrap();

        let err = client.verify(&endpoint(url), &json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { ref source, .. } if source.is_timeout()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(accepted.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dropped_connections_are_not_retried() {
        let (url, accepted) = raw_listener(false).await;

        let err = client().verify(&endpoint(url), &json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { ref source, .. } if !source.is_timeout() && !source.is_connect()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(accepted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let mut endpoint = endpoint("https://verifier.example/verify".to_string());
        endpoint.headers.insert("bad header".to_string(), "x".to_string());
        assert!(matches!(headers(&endpoint), Err(ClientError::InvalidHeader(name)) if name == "bad header"));
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let long = Value::String("x".repeat(MAX_BODY_EXCERPT + 10));
        assert_eq!(excerpt(&long).len(), MAX_BODY_EXCERPT + 3);
        assert_eq!(excerpt(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
