//! Common test utilities
//!
//! Builds the full router on top of the in-memory store, seeded with the
//! three canonical accounts.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::Value;

use gereja_api::api::{create_router, AppState};
use gereja_api::auth::{self, Role};
use gereja_api::domain::NewUser;
use gereja_api::store::{MemStore, RecordStore};
use gereja_api::Config;

pub const SECRET: &str = "integration-test-secret";
pub const BOUNDARY: &str = "gereja-test-boundary";

fn test_config() -> Config {
    Config {
        database_url: String::new(),
        database_max_connections: 1,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        jwt_secret: SECRET.to_string(),
        token_ttl_hours: 24,
        kas_awal: dec!(100000000),
        upload_dir: std::env::temp_dir().join(format!("gereja-test-{}", uuid::Uuid::new_v4())),
    }
}

/// Router plus its state, seeded with admin/sekretaris/bendahara accounts
/// (ids 1, 2 and 3) all using the password `password123`.
pub async fn test_app() -> (Router, AppState) {
    let store = Arc::new(MemStore::new());

    // Low cost to keep the tests fast
    let hash = bcrypt::hash("password123", 4).unwrap();
    let accounts = [
        ("Admin Gereja", "admin@gmail.com", Role::Admin),
        ("Sekretaris Gereja", "sekretaris@gmail.com", Role::Sekretaris),
        ("Bendahara Gereja", "bendahara@gmail.com", Role::Bendahara),
    ];
    for (nama, email, role) in accounts {
        store
            .create_user(NewUser {
                nama: nama.to_string(),
                email: email.to_string(),
                password: hash.clone(),
                role,
            })
            .await
            .unwrap();
    }

    let state = AppState {
        store,
        config: Arc::new(test_config()),
    };
    (create_router(state.clone()), state)
}

pub fn token_for(role: Role) -> String {
    let (id, email) = match role {
        Role::Admin => (1, "admin@gmail.com"),
        Role::Sekretaris => (2, "sekretaris@gmail.com"),
        Role::Bendahara => (3, "bendahara@gmail.com"),
    };
    auth::issue_token(id, role, email, SECRET, 24).unwrap()
}

pub fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Multipart request with text fields and an optional `(name, filename, bytes)`
/// file part.
pub fn multipart_request(
    method: &str,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
