//! Integration tests for Shopdesk.
//!
//! Every test starts two servers on ephemeral ports inside the test process:
//! a [`MockBackend`] standing in for the REST backend, and the admin panel
//! pointed at it. Tests drive the admin over HTTP with a cookie-keeping
//! client and then inspect what reached the backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopdesk-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use shopdesk_admin::config::AdminConfig;
use shopdesk_admin::state::AppState;
use tokio::net::TcpListener;
use url::Url;
use uuid::Uuid;

/// Timestamp given to every record the mock creates.
pub const MOCK_TIMESTAMP: &str = "2024-05-01T00:00:00";

// ============================================================================
// Mock Backend
// ============================================================================

/// A request the mock backend received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

impl RecordedCall {
    /// Whether this call targeted `collection` or one of its records.
    #[must_use]
    pub fn hits(&self, method: &Method, collection: &str) -> bool {
        &self.method == method && self.path.split('/').nth(1) == Some(collection)
    }
}

#[derive(Debug, Clone)]
struct Failure {
    method: Method,
    collection: String,
    status: StatusCode,
    detail: String,
}

#[derive(Debug, Default)]
struct MockState {
    collections: HashMap<String, Vec<Value>>,
    calls: Vec<RecordedCall>,
    failures: Vec<Failure>,
}

/// In-memory REST backend with `users`, `items`, and `orders` collections.
///
/// Behaves like the real backend for the admin's purposes: records get an
/// id and timestamps on create, `PUT` merges the fields it is given,
/// `GET /orders?user_id=` filters, and missing records answer 404 with a
/// `detail` body.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, filling in id and timestamps. Returns the id.
    pub fn seed(&self, collection: &str, record: Value) -> String {
        let record = stamp(record);
        let id = record["id"].as_str().unwrap().to_string();
        self.state
            .lock()
            .unwrap()
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
        id
    }

    /// Seed an active user.
    pub fn seed_user(&self, full_name: &str, email: &str) -> String {
        self.seed(
            "users",
            json!({ "full_name": full_name, "email": email, "is_active": true }),
        )
    }

    /// Seed an item.
    pub fn seed_item(&self, name: &str, price: f64, stock: u64) -> String {
        self.seed(
            "items",
            json!({
                "name": name,
                "description": null,
                "price": price,
                "stock": stock,
                "image_url": null,
            }),
        )
    }

    /// Every record currently in `collection`.
    #[must_use]
    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// One record by id.
    #[must_use]
    pub fn record(&self, collection: &str, id: &str) -> Option<Value> {
        self.records(collection)
            .into_iter()
            .find(|record| record["id"] == id)
    }

    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls with `method` against `collection`.
    #[must_use]
    pub fn calls_to(&self, method: &Method, collection: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.hits(method, collection))
            .collect()
    }

    /// Forget the calls received so far.
    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Answer every `method` request against `collection` with `status`
    /// and a `detail` body.
    pub fn fail(&self, method: Method, collection: &str, status: u16, detail: &str) {
        self.state.lock().unwrap().failures.push(Failure {
            method,
            collection: collection.to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            detail: detail.to_string(),
        });
    }

    /// Serve the mock on an ephemeral port and return its base URL.
    pub async fn spawn(self) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(self);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Url::parse(&format!("http://{addr}")).unwrap()
    }
}

/// Give a record an id (unless it has one) and timestamps.
fn stamp(mut record: Value) -> Value {
    if let Some(fields) = record.as_object_mut() {
        fields
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        fields.insert("created_at".to_string(), json!(MOCK_TIMESTAMP));
        fields.insert("updated_at".to_string(), json!(MOCK_TIMESTAMP));
    }
    record
}

fn not_found(collection: &str) -> Response {
    let singular = collection.trim_end_matches('s');
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": format!("{singular} not found") })),
    )
        .into_response()
}

fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// The whole mock API in one handler, so every request is recorded.
async fn handle(
    State(mock): State<MockBackend>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let body: Option<Value> = serde_json::from_slice(&body).ok();
    let segments: Vec<String> = uri
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let mut state = mock.state.lock().unwrap();
    state.calls.push(RecordedCall {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: body.clone(),
    });

    let collection = segments.first().cloned().unwrap_or_default();
    if let Some(failure) = state
        .failures
        .iter()
        .find(|f| f.method == method && f.collection == collection)
    {
        return (failure.status, Json(json!({ "detail": failure.detail }))).into_response();
    }

    match (method, segments.as_slice()) {
        (Method::GET, [health]) if health == "health" => Json(json!({ "status": "ok" })).into_response(),

        (Method::GET, [collection]) => {
            let user_id = query_param(uri.query(), "user_id");
            let records: Vec<Value> = state
                .collections
                .get(collection)
                .into_iter()
                .flatten()
                .filter(|record| user_id.as_ref().is_none_or(|id| record["user_id"] == *id))
                .cloned()
                .collect();
            Json(records).into_response()
        }

        (Method::POST, [collection]) => {
            let mut record = body.unwrap_or_else(|| json!({}));
            if let Some(fields) = record.as_object_mut() {
                fields.remove("password");
            }
            let record = stamp(record);
            state
                .collections
                .entry(collection.clone())
                .or_default()
                .push(record.clone());
            (StatusCode::CREATED, Json(record)).into_response()
        }

        (Method::GET, [collection, id]) => state
            .collections
            .get(collection)
            .and_then(|records| records.iter().find(|r| r["id"] == *id))
            .map_or_else(|| not_found(collection), |r| Json(r.clone()).into_response()),

        (Method::PUT, [collection, id]) => {
            let changes: Map<String, Value> = body
                .and_then(|b| b.as_object().cloned())
                .unwrap_or_default();
            let Some(record) = state
                .collections
                .get_mut(collection)
                .and_then(|records| records.iter_mut().find(|r| r["id"] == *id))
            else {
                return not_found(collection);
            };
            if let Some(fields) = record.as_object_mut() {
                for (key, value) in changes {
                    if key != "password" {
                        fields.insert(key, value);
                    }
                }
            }
            Json(record.clone()).into_response()
        }

        (Method::DELETE, [collection, id]) => {
            let Some(records) = state.collections.get_mut(collection) else {
                return not_found(collection);
            };
            let before = records.len();
            records.retain(|r| r["id"] != *id);
            if records.len() == before {
                return not_found(collection);
            }
            StatusCode::NO_CONTENT.into_response()
        }

        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

// ============================================================================
// Admin Under Test
// ============================================================================

/// The admin panel running against a [`MockBackend`].
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub backend: MockBackend,
}

impl TestApp {
    /// Start an admin over an empty backend.
    pub async fn spawn() -> Self {
        Self::with_backend(MockBackend::new()).await
    }

    /// Start an admin over a prepared backend.
    pub async fn with_backend(backend: MockBackend) -> Self {
        let backend_url = backend.clone().spawn().await;
        Self::with_backend_url(backend, backend_url).await
    }

    /// Start an admin whose backend lives at `backend_url`.
    pub async fn with_backend_url(backend: MockBackend, backend_url: Url) -> Self {
        let state = AppState::new(AdminConfig::for_backend(backend_url)).unwrap();
        let app = shopdesk_admin::app(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            address: format!("http://{addr}"),
            client,
            backend,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// GET a page and return its body.
    pub async fn page(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert!(
            response.status().is_success(),
            "GET {path} returned {}",
            response.status()
        );
        response.text().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// POST an HTMX request.
    pub async fn post_htmx(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .unwrap()
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    assert!(
        response.status().is_redirection(),
        "expected a redirect, got {}",
        response.status()
    );
    response.headers()["location"].to_str().unwrap().to_string()
}
