//! HTTP client for the FinSync REST API.
//!
//! Every resource lives under its own base path and speaks the same verbs:
//! `GET base`, `POST base`, `PUT base/{id}`, `PATCH base/{id}` and
//! `DELETE base/{id}`. Any non-2xx status is a failure; the body's `error`
//! field, when present, is kept as the user-facing message.

use reqwest::{header, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::config::ApiConfig;
use crate::models::{RecordId, ResourceKind};

/// Which requests carry the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialPolicy {
    /// Only profit-goal requests are authenticated. Matches the deployed API,
    /// where the other collections are public.
    #[default]
    ProfitGoalsOnly,
    AllResources,
}

impl CredentialPolicy {
    fn applies_to(self, kind: ResourceKind) -> bool {
        match self {
            CredentialPolicy::ProfitGoalsOnly => kind == ResourceKind::ProfitGoals,
            CredentialPolicy::AllResources => true,
        }
    }
}

/// Client for the FinSync API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    policy: CredentialPolicy,
}

impl ApiClient {
    /// Creates a client with explicit parameters.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.filter(|t| !t.is_empty()),
            policy: CredentialPolicy::default(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        let policy = if config.bearer_all_resources {
            CredentialPolicy::AllResources
        } else {
            CredentialPolicy::ProfitGoalsOnly
        };
        Self::new(config.api_url.clone(), config.token.clone()).with_policy(policy)
    }

    pub fn with_policy(mut self, policy: CredentialPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> CredentialPolicy {
        self.policy
    }

    pub fn collection_url(&self, kind: ResourceKind) -> String {
        format!("{}{}", self.base_url, kind.base_path())
    }

    /// URL of one record, with `id` percent-encoded as a single path segment.
    pub fn record_url(&self, kind: ResourceKind, id: &RecordId) -> String {
        let collection = self.collection_url(kind);
        let mut url = match Url::parse(&collection) {
            Ok(url) => url,
            Err(_) => return format!("{}/{}", collection, id),
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id.as_str());
        }
        url.into()
    }

    /// Fetches a whole collection.
    ///
    /// A body that is not a JSON array is treated as an empty collection.
    pub async fn list<R: DeserializeOwned>(&self, kind: ResourceKind) -> Result<Vec<R>, ApiError> {
        let url = self.collection_url(kind);
        let response = self.send(kind, self.request(kind, Method::GET, &url)).await?;
        let body = read_json(response).await?;

        match body {
            Value::Array(items) => {
                let records = items
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<Vec<R>, _>>()?;
                tracing::debug!("Fetched {} {}", records.len(), kind.label());
                Ok(records)
            }
            other => {
                tracing::warn!(
                    "Expected an array from {}, got {}; treating as empty",
                    url,
                    json_type(&other)
                );
                Ok(Vec::new())
            }
        }
    }

    /// `POST base`. Returns the response body, `null` when it is empty or not
    /// JSON.
    pub async fn create(
        &self,
        kind: ResourceKind,
        payload: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        let url = self.collection_url(kind);
        let request = self.request(kind, Method::POST, &url).json(payload);
        read_body(self.send(kind, request).await?).await
    }

    /// `PUT base/{id}` with a full record body.
    pub async fn replace(
        &self,
        kind: ResourceKind,
        id: &RecordId,
        payload: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        let url = self.record_url(kind, id);
        let request = self.request(kind, Method::PUT, &url).json(payload);
        read_body(self.send(kind, request).await?).await
    }

    /// `PATCH base/{id}` with only the changed fields.
    pub async fn patch(
        &self,
        kind: ResourceKind,
        id: &RecordId,
        payload: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        let url = self.record_url(kind, id);
        let request = self.request(kind, Method::PATCH, &url).json(payload);
        read_body(self.send(kind, request).await?).await
    }

    /// `DELETE base/{id}`.
    pub async fn delete(&self, kind: ResourceKind, id: &RecordId) -> Result<(), ApiError> {
        let url = self.record_url(kind, id);
        self.send(kind, self.request(kind, Method::DELETE, &url))
            .await?;
        Ok(())
    }

    fn request(&self, kind: ResourceKind, method: Method, url: &str) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = self.token.as_deref() {
            if self.policy.applies_to(kind) {
                request = request.bearer_auth(token);
            }
        }
        request
    }

    async fn send(&self, kind: ResourceKind, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", kind.base_path(), e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        tracing::debug!("{} -> {}", response.url().path(), status);
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<Value>(&body).ok())
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string));
        tracing::warn!(
            "{} rejected with {}: {}",
            kind.base_path(),
            status,
            message.as_deref().unwrap_or("no error message")
        );
        Err(ApiError::Status { status, message })
    }
}

async fn read_json(response: Response) -> Result<Value, ApiError> {
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&body)?)
}

/// Mutation responses are informational only; a 2xx with an odd body still
/// counts as success.
async fn read_body(response: Response) -> Result<Value, ApiError> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
