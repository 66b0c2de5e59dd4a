//! Authenticated JSON query executor for the upstream case-management
//! registers.
//!
//! One client serves all registers; the per-register credential and auth
//! scheme are selected by [`ServiceKind`]. Callers get `serde_json::Value`
//! back through the dyn-compatible [`ZgwExecutor`] seam and deserialize
//! with [`get_typed`] / [`from_value`], so tests can substitute an
//! in-memory executor.

pub mod error;

pub use error::{Result, ZgwError};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Which upstream register a request is addressed to. Determines the
/// credential and auth header scheme used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    OpenZaak,
    OpenKlant,
    Objecten,
    Besluiten,
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceKind::OpenZaak => write!(f, "openzaak"),
            ServiceKind::OpenKlant => write!(f, "openklant"),
            ServiceKind::Objecten => write!(f, "objecten"),
            ServiceKind::Besluiten => write!(f, "besluiten"),
        }
    }
}

/// Per-register credentials. Token acquisition (JWT minting, rotation) is
/// an external concern; this layer only attaches the header.
#[derive(Debug, Clone)]
pub struct ZgwCredentials {
    pub openzaak_token: String,
    pub openklant_token: String,
    pub objecten_token: String,
    pub besluiten_token: String,
}

/// Executes a single authenticated request and hands back the JSON body.
#[async_trait]
pub trait ZgwExecutor: Send + Sync {
    async fn get_json(&self, kind: ServiceKind, url: &Url) -> Result<Value>;

    async fn post_json(&self, kind: ServiceKind, url: &Url, body: Value) -> Result<Value>;

    async fn patch_json(&self, kind: ServiceKind, url: &Url, body: Value) -> Result<Value>;
}

/// GET and deserialize into a typed record.
pub async fn get_typed<T: DeserializeOwned>(
    executor: &dyn ZgwExecutor,
    kind: ServiceKind,
    url: &Url,
) -> Result<T> {
    let value = executor.get_json(kind, url).await?;
    from_value(url, value)
}

/// Deserialize an already-fetched JSON body, mapping shape mismatches to a
/// typed parse error that names the source URL.
pub fn from_value<T: DeserializeOwned>(url: &Url, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ZgwError::Parse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Production executor backed by reqwest.
pub struct ZgwClient {
    http: reqwest::Client,
    credentials: ZgwCredentials,
}

impl ZgwClient {
    pub fn new(credentials: ZgwCredentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
        }
    }

    pub fn with_http(http: reqwest::Client, credentials: ZgwCredentials) -> Self {
        Self { http, credentials }
    }

    fn apply_auth(&self, kind: ServiceKind, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        // The case and decision registers take a bearer token; the party and
        // object registers use the `Token` scheme.
        match kind {
            ServiceKind::OpenZaak => req.bearer_auth(&self.credentials.openzaak_token),
            ServiceKind::Besluiten => req.bearer_auth(&self.credentials.besluiten_token),
            ServiceKind::OpenKlant => req.header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", self.credentials.openklant_token),
            ),
            ServiceKind::Objecten => req.header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", self.credentials.objecten_token),
            ),
        }
    }

    async fn execute(&self, url: &Url, req: reqwest::RequestBuilder) -> Result<Value> {
        let resp = req.send().await.map_err(|e| ZgwError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ZgwError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let body = resp.text().await.map_err(|e| ZgwError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| ZgwError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ZgwExecutor for ZgwClient {
    async fn get_json(&self, kind: ServiceKind, url: &Url) -> Result<Value> {
        tracing::debug!(service = %kind, url = %url, "GET");
        let req = self.apply_auth(kind, self.http.get(url.clone()));
        self.execute(url, req).await
    }

    async fn post_json(&self, kind: ServiceKind, url: &Url, body: Value) -> Result<Value> {
        tracing::debug!(service = %kind, url = %url, "POST");
        let req = self.apply_auth(kind, self.http.post(url.clone()).json(&body));
        self.execute(url, req).await
    }

    async fn patch_json(&self, kind: ServiceKind, url: &Url, body: Value) -> Result<Value> {
        tracing::debug!(service = %kind, url = %url, "PATCH");
        let req = self.apply_auth(kind, self.http.patch(url.clone()).json(&body));
        self.execute(url, req).await
    }
}
