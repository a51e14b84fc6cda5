//! Shared test utilities for hcloud-provider integration tests.
//!
//! [`FakeHcloud`] serves a small in-memory imitation of the Hetzner Cloud v1
//! REST API on a loopback port so the real `HcloudClient` can be driven over
//! HTTP.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{Json, Router};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use hcloud_provider::{ClientConfig, Connector, HcloudServiceFactory, StaticCredentials};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const TOKEN: &str = "test-token";
pub const ROOT_PASSWORD: &str = "YItygq1v3GYjjMomLaKc";
pub const CREATED: &str = "2024-03-01T12:00:00+00:00";

/// One request as seen by the fake API.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: Value,
}

#[derive(Default)]
struct FakeState {
    next_id: i64,
    collections: BTreeMap<String, Vec<Value>>,
    requests: Vec<Recorded>,
    /// Status and error code returned for the next request instead of handling it.
    fail_next: Option<(StatusCode, String)>,
}

type Shared = Arc<Mutex<FakeState>>;

/// Fake Hetzner Cloud API bound to 127.0.0.1.
pub struct FakeHcloud {
    pub addr: SocketAddr,
    state: Shared,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl FakeHcloud {
    /// Spawn the fake API on an OS-assigned port.
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState {
            next_id: 1000,
            ..Default::default()
        }));

        let router = Router::new()
            .route("/v1/{collection}", get(list).post(create))
            .route("/v1/{collection}/{id}", axum::routing::put(update).delete(remove))
            .with_state(state.clone());

        // Use port 0 to let the OS choose an available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Server error");
        });

        Self {
            addr,
            state,
            shutdown_tx,
        }
    }

    /// Base URL including the API version.
    pub fn endpoint(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default().with_endpoint(self.endpoint())
    }

    /// Connector using the fake's token and endpoint.
    pub fn connector(&self) -> Connector {
        self.connector_with_token(TOKEN)
    }

    pub fn connector_with_token(&self, token: &str) -> Connector {
        Connector::new(
            Arc::new(StaticCredentials::new(token)),
            Arc::new(HcloudServiceFactory::new(self.client_config())),
        )
    }

    /// Seed an object into `collection`; `id`, `created` and `labels` are filled in.
    pub fn seed(&self, collection: &str, mut object: Value) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        object["id"] = json!(id);
        object["created"] = json!(CREATED);
        if object.get("labels").is_none() {
            object["labels"] = json!({});
        }
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(object);
        id
    }

    pub fn object(&self, collection: &str, id: i64) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state
            .collections
            .get(collection)?
            .iter()
            .find(|o| o["id"] == json!(id))
            .cloned()
    }

    pub fn count(&self, collection: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.collections.get(collection).map_or(0, Vec::len)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests other than lookups.
    pub fn mutations(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::GET)
            .collect()
    }

    /// Answer the next request with `status` and error `code`.
    pub fn fail_next(&self, status: StatusCode, code: &str) {
        self.state.lock().unwrap().fail_next = Some((status, code.to_string()));
    }

    /// Shutdown the server.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

fn singular(collection: &str) -> &str {
    collection.strip_suffix('s').unwrap_or(collection)
}

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "code": code, "message": message } })),
    )
        .into_response()
}

/// Record the request, check the token and apply an injected failure.
fn enter(
    state: &Shared,
    headers: &HeaderMap,
    method: Method,
    path: String,
    body: Value,
) -> Result<(), Response> {
    let mut state = state.lock().unwrap();
    state.requests.push(Recorded { method, path, body });

    let expected = format!("Bearer {TOKEN}");
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        return Err(error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "unable to authenticate",
        ));
    }

    if let Some((status, code)) = state.fail_next.take() {
        return Err(error(status, &code, "injected failure"));
    }
    Ok(())
}

async fn list(
    State(state): State<Shared>,
    Path(collection): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let path = match query.get("name") {
        Some(name) => format!("/{collection}?name={name}"),
        None => format!("/{collection}"),
    };
    if let Err(resp) = enter(&state, &headers, Method::GET, path, Value::Null) {
        return resp;
    }

    let state = state.lock().unwrap();
    let items: Vec<Value> = state
        .collections
        .get(&collection)
        .map(|items| {
            items
                .iter()
                .filter(|o| query.get("name").is_none_or(|n| o["name"] == json!(n)))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    Json(json!({
        collection.clone(): items,
        "meta": { "pagination": { "page": 1, "per_page": 25 } }
    }))
    .into_response()
}

async fn create(
    State(state): State<Shared>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = enter(
        &state,
        &headers,
        Method::POST,
        format!("/{collection}"),
        body.clone(),
    ) {
        return resp;
    }

    let mut object = body.clone();
    match collection.as_str() {
        "servers" => {
            object["status"] = json!("initializing");
            object["public_net"] = json!({
                "ipv4": { "ip": "203.0.113.20", "dns_ptr": "static.20.113.0.203.clients.your-server.de" },
                "ipv6": { "ip": "2001:db8:5678::/64" }
            });
        }
        "placement_groups" => object["servers"] = json!([]),
        "ssh_keys" => {
            object["fingerprint"] = json!("b7:2f:30:a0:2f:6c:58:6c:21:04:58:61:ba:06:3b:2f")
        }
        _ => {}
    }

    let mut state = state.lock().unwrap();
    state.next_id += 1;
    object["id"] = json!(state.next_id);
    object["created"] = json!(CREATED);
    if object.get("labels").is_none() {
        object["labels"] = json!({});
    }
    state
        .collections
        .entry(collection.clone())
        .or_default()
        .push(object.clone());

    let mut response = json!({ singular(&collection): object });
    if collection == "servers" {
        let has_keys = body["ssh_keys"].as_array().is_some_and(|k| !k.is_empty());
        response["root_password"] = if has_keys {
            Value::Null
        } else {
            json!(ROOT_PASSWORD)
        };
    }
    (StatusCode::CREATED, Json(response)).into_response()
}

async fn update(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, i64)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = enter(
        &state,
        &headers,
        Method::PUT,
        format!("/{collection}/{id}"),
        body.clone(),
    ) {
        return resp;
    }

    let mut state = state.lock().unwrap();
    let Some(object) = state
        .collections
        .get_mut(&collection)
        .and_then(|items| items.iter_mut().find(|o| o["id"] == json!(id)))
    else {
        return error(StatusCode::NOT_FOUND, "not_found", "resource not found");
    };

    for key in ["name", "labels"] {
        if let Some(value) = body.get(key) {
            object[key] = value.clone();
        }
    }
    Json(json!({ singular(&collection): object.clone() })).into_response()
}

async fn remove(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Response {
    let path = format!("/{collection}/{id}");
    if let Err(resp) = enter(&state, &headers, Method::DELETE, path, Value::Null) {
        return resp;
    }

    let mut state = state.lock().unwrap();
    let items = state.collections.entry(collection).or_default();
    let before = items.len();
    items.retain(|o| o["id"] != json!(id));
    if items.len() == before {
        return error(StatusCode::NOT_FOUND, "not_found", "resource not found");
    }
    StatusCode::NO_CONTENT.into_response()
}
