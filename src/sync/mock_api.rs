//! In-process stand-in for the FinSync REST API, used by tests.
//!
//! Serves all five collections from memory, records every request it sees
//! and can be told to answer the next request for a method with a canned
//! status and body.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::models::{RecordId, ResourceKind};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
    pub authorization: Option<String>,
}

struct Canned {
    method: String,
    status: StatusCode,
    body: Value,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<Value>>,
    next_id: i64,
    requests: Vec<RecordedRequest>,
    canned: VecDeque<Canned>,
}

type Shared = Arc<Mutex<Inner>>;

#[derive(Clone)]
pub struct MockApi {
    inner: Shared,
    base_url: String,
}

impl MockApi {
    /// Binds to an ephemeral local port and starts serving.
    pub async fn start() -> Self {
        let inner: Shared = Arc::default();
        let app = Router::new().fallback(handle).with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            inner,
            base_url: format!("http://{}", addr),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Inserts a record directly, bypassing the request log.
    pub fn seed(&self, kind: ResourceKind, record: Value) -> RecordId {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        let mut record = snake_case_keys(record);
        record.insert("id".into(), json!(id));
        inner
            .collections
            .entry(collection_name(kind))
            .or_default()
            .push(Value::Object(record));
        RecordId::from(id)
    }

    pub fn records(&self, kind: ResourceKind) -> Vec<Value> {
        let inner = self.inner.lock().unwrap();
        inner
            .collections
            .get(&collection_name(kind))
            .cloned()
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.inner.lock().unwrap().requests.clear();
    }

    /// Answers the next `method` request with `status` and `body` instead of
    /// touching the collections.
    pub fn respond_next(&self, method: &str, status: StatusCode, body: Value) {
        self.inner.lock().unwrap().canned.push_back(Canned {
            method: method.to_string(),
            status,
            body,
        });
    }

    pub fn fail_next(&self, method: &str, status: StatusCode, body: Value) {
        self.respond_next(method, status, body);
    }
}

fn collection_name(kind: ResourceKind) -> String {
    kind.base_path().trim_start_matches("/api/").to_string()
}

async fn handle(
    State(inner): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut inner = inner.lock().unwrap();
    let body: Option<Value> = serde_json::from_slice(&body).ok();
    inner.requests.push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        body: body.clone(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
    });

    if let Some(pos) = inner
        .canned
        .iter()
        .position(|c| c.method == method.as_str())
    {
        if let Some(canned) = inner.canned.remove(pos) {
            return (canned.status, Json(canned.body)).into_response();
        }
    }

    let segments: Vec<&str> = uri
        .path()
        .trim_start_matches("/api/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", [collection]) => {
            let items = inner
                .collections
                .get(*collection)
                .cloned()
                .unwrap_or_default();
            Json(Value::Array(items)).into_response()
        }
        ("POST", [collection]) => {
            inner.next_id += 1;
            let id = inner.next_id;
            let mut record = snake_case_keys(body.unwrap_or(Value::Null));
            record.insert("id".into(), json!(id));
            let record = Value::Object(record);
            inner
                .collections
                .entry(collection.to_string())
                .or_default()
                .push(record.clone());
            (StatusCode::CREATED, Json(record)).into_response()
        }
        ("PUT" | "PATCH", [collection, id]) => {
            let fields = snake_case_keys(body.unwrap_or(Value::Null));
            let Some(record) = find_mut(&mut inner, collection, id) else {
                return not_found();
            };
            let Value::Object(existing) = record else {
                return not_found();
            };
            for (key, value) in fields {
                existing.insert(key, value);
            }
            Json(record.clone()).into_response()
        }
        ("DELETE", [collection, id]) => {
            let Some(items) = inner.collections.get_mut(*collection) else {
                return not_found();
            };
            let before = items.len();
            items.retain(|r| !id_matches(r, id));
            if items.len() == before {
                return not_found();
            }
            StatusCode::NO_CONTENT.into_response()
        }
        _ => not_found(),
    }
}

fn find_mut<'a>(inner: &'a mut Inner, collection: &str, id: &str) -> Option<&'a mut Value> {
    inner
        .collections
        .get_mut(collection)?
        .iter_mut()
        .find(|r| id_matches(r, id))
}

fn id_matches(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::String(s)) => s == id,
        Some(other) => other.to_string() == id,
        None => false,
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

/// `targetProfit` -> `target_profit`; records are stored the way the real
/// API returns them.
fn snake_case_keys(value: Value) -> Map<String, Value> {
    let Value::Object(map) = value else {
        return Map::new();
    };
    map.into_iter()
        .map(|(key, value)| {
            let mut snake = String::with_capacity(key.len() + 4);
            for c in key.chars() {
                if c.is_ascii_uppercase() {
                    snake.push('_');
                    snake.push(c.to_ascii_lowercase());
                } else {
                    snake.push(c);
                }
            }
            (snake, value)
        })
        .collect()
}
