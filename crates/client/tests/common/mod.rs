//! In-process fake of the Sprout API for integration tests.
//!
//! Runs an axum router on an ephemeral port, keeps its data in a shared
//! [`FakeState`], and records every request with its `Authorization`
//! header so tests can assert on what the client sent.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use sprout_client::{ClientConfig, ClientContext, DeviceStorage, MemoryStorage};

pub const TEST_TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
}

pub struct FakeState {
    pub users: HashMap<String, String>,
    pub tokens: HashSet<String>,
    pub lots: Vec<Value>,
    pub microgreens: Vec<Value>,
    /// Catalog ids whose `GET /microgreens/{id}` answers 500.
    pub broken_microgreens: HashSet<i64>,
    /// Wrap `GET /microgreens` in `{ "microgreens": [...] }`.
    pub wrap_catalog: bool,
    pub fail_catalog: bool,
    pub fail_deletes: bool,
    pub entries: HashMap<i64, Vec<Value>>,
    pub notifications: Vec<Value>,
    pub requests: Vec<Recorded>,
    pub next_id: i64,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            users: HashMap::new(),
            tokens: HashSet::from([TEST_TOKEN.to_string()]),
            lots: Vec::new(),
            microgreens: Vec::new(),
            broken_microgreens: HashSet::new(),
            wrap_catalog: false,
            fail_catalog: false,
            fail_deletes: false,
            entries: HashMap::new(),
            notifications: Vec::new(),
            requests: Vec::new(),
            next_id: 100,
        }
    }
}

impl FakeState {
    pub fn with_catalog(mut self) -> Self {
        self.microgreens = vec![
            json!({ "id": 1, "name": "Radish", "days_to_grow": 8, "temperature": "18-22", "light": "bright", "avatar": "radish.png" }),
            json!({ "id": 7, "name": "Pea shoots", "days_to_grow": 12, "temperature": "16-20", "light": "diffuse", "avatar": "pea.png" }),
            json!({ "id": 9, "name": "Sunflower", "days_to_grow": 10, "temperature": "20-24", "light": "bright", "avatar": "sunflower.png" }),
        ];
        self
    }

    pub fn with_lot(mut self, id: i64, microgreen_id: i64, sowing_date: Option<&str>) -> Self {
        self.lots.push(json!({
            "id": id,
            "user_id": 1,
            "microgreen_type": microgreen_id,
            "sowing_date": sowing_date,
            "substrate_type": "coco coir",
            "expected_harvest_date": "2025-01-12T00:00:00",
            "created_at": "2025-01-01T09:00:00",
            "avatar_url": ""
        }));
        self
    }

    /// A lot whose payload carries no plant reference at all.
    pub fn with_unreferenced_lot(mut self, id: i64) -> Self {
        self.lots.push(json!({
            "id": id,
            "user_id": 1,
            "sowing_date": "2025-02-01T00:00:00",
            "substrate_type": "soil"
        }));
        self
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Shared = Arc<Mutex<FakeState>>;

pub struct FakeApi {
    pub url: String,
    pub state: Shared,
    server: Option<JoinHandle<()>>,
}

impl FakeApi {
    pub async fn spawn(state: FakeState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake api");
        let addr = listener.local_addr().expect("fake api address");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake api server");
        });

        Self {
            url: format!("http://{addr}"),
            state,
            server: Some(server),
        }
    }

    /// Stop accepting connections; later requests fail to connect.
    pub async fn stop(&mut self) {
        if let Some(server) = self.server.take() {
            server.abort();
            let _ = server.await;
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state lock")
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state().requests.clone()
    }

    /// Requests matching `method` and `path`.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::for_api_url(self.url.clone())
    }

    /// A signed-out client over in-memory storage.
    pub async fn context(&self) -> (ClientContext, Arc<MemoryStorage>) {
        self.context_with(self.config()).await
    }

    pub async fn context_with(&self, config: ClientConfig) -> (ClientContext, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let shared: Arc<dyn DeviceStorage> = storage.clone();
        let ctx = ClientContext::with_storage(config, shared)
            .await
            .expect("client context");
        (ctx, storage)
    }

    /// A client already holding [`TEST_TOKEN`].
    pub async fn signed_in(&self) -> (ClientContext, Arc<MemoryStorage>) {
        let (ctx, storage) = self.context().await;
        ctx.session()
            .start(TEST_TOKEN.to_string())
            .await
            .expect("start session");
        (ctx, storage)
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/lots/", get(list_lots).post(create_lot))
        .route("/lots/{id}", delete(delete_lot))
        .route("/lots/{id}/entry", post(create_entry))
        .route("/lots/{id}/entries", get(list_entries))
        .route("/microgreens", get(list_microgreens))
        .route("/microgreens/{id}", get(get_microgreen))
        .route("/notifications", get(list_notifications))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn record(state: &mut FakeState, method: &'static str, path: String, headers: &HeaderMap) {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.push(Recorded {
        method,
        path,
        authorization,
    });
}

/// Record the request and check its bearer token.
fn authorize(
    state: &mut FakeState,
    method: &'static str,
    path: String,
    headers: &HeaderMap,
) -> Result<(), Response> {
    record(state, method, path, headers);
    let presented = state
        .requests
        .last()
        .and_then(|r| r.authorization.clone())
        .and_then(|h| h.strip_prefix("Bearer ").map(str::to_string));
    match presented {
        Some(token) if state.tokens.contains(&token) => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid token" })),
        )
            .into_response()),
    }
}

async fn register(State(s): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut state = s.lock().expect("fake state lock");
    record(&mut state, "POST", "/user/register".into(), &headers);

    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    if state.users.contains_key(&email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "User already exists" })),
        )
            .into_response();
    }
    state.users.insert(email.clone(), password);
    let token = format!("token-{email}");
    state.tokens.insert(token.clone());
    Json(json!({ "token": token })).into_response()
}

async fn login(State(s): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut state = s.lock().expect("fake state lock");
    record(&mut state, "POST", "/user/login".into(), &headers);

    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match state.users.get(email) {
        Some(stored) if stored == password => {
            let token = format!("token-{email}");
            state.tokens.insert(token.clone());
            Json(json!({ "token": token })).into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid credentials" })),
        )
            .into_response(),
    }
}

async fn list_lots(State(s): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = s.lock().expect("fake state lock");
    if let Err(r) = authorize(&mut state, "GET", "/lots/".into(), &headers) {
        return r;
    }
    Json(Value::Array(state.lots.clone())).into_response()
}

async fn create_lot(State(s): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut state = s.lock().expect("fake state lock");
    if let Err(r) = authorize(&mut state, "POST", "/lots/".into(), &headers) {
        return r;
    }
    let id = state.next_id();
    state.lots.push(json!({
        "id": id,
        "user_id": 1,
        "microgreen_type": body["microgreen_id"],
        "sowing_date": body["sowing_date"],
        "substrate_type": body["substrate_type"],
        "expected_harvest_date": body["expected_harvest_date"],
        "created_at": "2025-01-01T09:00:00",
        "avatar_url": ""
    }));
    Json(json!({ "id": id })).into_response()
}

async fn delete_lot(State(s): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> Response {
    let mut state = s.lock().expect("fake state lock");
    if let Err(r) = authorize(&mut state, "DELETE", format!("/lots/{id}"), &headers) {
        return r;
    }
    if state.fail_deletes {
        return (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response();
    }
    let before = state.lots.len();
    state.lots.retain(|lot| lot["id"] != id);
    if state.lots.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Lot not found" }))).into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_microgreens(State(s): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = s.lock().expect("fake state lock");
    if let Err(r) = authorize(&mut state, "GET", "/microgreens".into(), &headers) {
        return r;
    }
    if state.fail_catalog {
        return (StatusCode::INTERNAL_SERVER_ERROR, "catalog down").into_response();
    }
    let list = Value::Array(state.microgreens.clone());
    if state.wrap_catalog {
        Json(json!({ "microgreens": list })).into_response()
    } else {
        Json(list).into_response()
    }
}

async fn get_microgreen(State(s): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> Response {
    let mut state = s.lock().expect("fake state lock");
    if let Err(r) = authorize(&mut state, "GET", format!("/microgreens/{id}"), &headers) {
        return r;
    }
    if state.broken_microgreens.contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "lookup failed").into_response();
    }
    match state.microgreens.iter().find(|m| m["id"] == id) {
        Some(m) => Json(m.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found" }))).into_response(),
    }
}

async fn create_entry(
    State(s): State<Shared>,
    Path(lot_id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = s.lock().expect("fake state lock");
    if let Err(r) = authorize(&mut state, "POST", format!("/lots/{lot_id}/entry"), &headers) {
        return r;
    }
    let id = state.next_id();
    let entry = json!({
        "id": id,
        "lot_id": lot_id,
        "entry_date": body["entry_date"],
        "description": body["description"],
        "height": body["height"],
        "watering": body.get("watering"),
        "lighting": body.get("lighting"),
        "photo_url": body.get("photo_url"),
        "created_at": "2025-01-02T10:00:00"
    });
    state.entries.entry(lot_id).or_default().push(entry.clone());
    (StatusCode::CREATED, Json(entry)).into_response()
}

async fn list_entries(State(s): State<Shared>, Path(lot_id): Path<i64>, headers: HeaderMap) -> Response {
    let mut state = s.lock().expect("fake state lock");
    if let Err(r) = authorize(&mut state, "GET", format!("/lots/{lot_id}/entries"), &headers) {
        return r;
    }
    let entries = state.entries.get(&lot_id).cloned().unwrap_or_default();
    Json(Value::Array(entries)).into_response()
}

async fn list_notifications(State(s): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = s.lock().expect("fake state lock");
    if let Err(r) = authorize(&mut state, "GET", "/notifications".into(), &headers) {
        return r;
    }
    Json(Value::Array(state.notifications.clone())).into_response()
}
