use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// The side of the VC-API an endpoint implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Issuer,
    Verifier,
}

/// A vendor manifest.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Implementation {
    pub name: String,

    // Free form description of the implementation, e.g. "vc-api"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,

    #[serde(default)]
    pub issuers: Vec<Endpoint>,

    #[serde(default)]
    pub verifiers: Vec<Endpoint>,
}

/// A single VC-API endpoint.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    // Issuer identifier (usually a DID) placed in the credential template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub endpoint: Url,

    #[serde(default)]
    pub tags: Vec<String>,

    // Passed verbatim as `options` of issue requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,

    // Extra request headers, e.g. an authorization token.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

/// An endpoint with the implementation exposing it and its report label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledEndpoint<'a> {
    pub label: String,
    pub implementation: &'a str,
    pub endpoint: &'a Endpoint,
}

impl Endpoint {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl Implementation {
    pub fn endpoints(&self, role: Role) -> &[Endpoint] {
        match role {
            Role::Issuer => &self.issuers,
            Role::Verifier => &self.verifiers,
        }
    }

    /// Keeps only the endpoints carrying `tag`. Returns `None` when nothing is left.
    pub fn retain_tag(&self, tag: &str) -> Option<Implementation> {
        let issuers: Vec<Endpoint> = self.issuers.iter().filter(|e| e.has_tag(tag)).cloned().collect();
        let verifiers: Vec<Endpoint> = self.verifiers.iter().filter(|e| e.has_tag(tag)).cloned().collect();

        if issuers.is_empty() && verifiers.is_empty() {
            return None;
        }

        Some(Implementation {
            issuers,
            verifiers,
            ..self.clone()
        })
    }
}
