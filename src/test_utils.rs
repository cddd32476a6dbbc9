//! Shared test utilities.
//!
//! Common setup used across test modules: temporary databases, seeded users,
//! and an in-process identity provider.

#![cfg(test)]

use crate::calendar::Calendar;
use crate::db::{migrations, Database, SharedDatabase};
use crate::error::AuthError;
use crate::identity::{AllowList, Identity, IdentityGateway, IdentityProvider};
use crate::models::User;
use crate::AppState;
use async_trait::async_trait;
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

/// Create a temporary test database with migrations applied.
///
/// Returns a tuple of (Database, TempDir). The TempDir must be kept alive
/// for the duration of the test to prevent the database file from being deleted.
pub fn setup_test_db() -> (Database, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory for test DB");
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).expect("Failed to open test database");
    migrations::run(db.connection()).expect("Failed to run migrations on test DB");
    (db, dir)
}

pub fn setup_shared_db() -> (SharedDatabase, TempDir) {
    let (db, dir) = setup_test_db();
    (Arc::new(Mutex::new(db)), dir)
}

/// Insert a user and return its local id.
pub fn create_user(conn: &Connection, provider_id: &str) -> i64 {
    User::create(conn, provider_id, "Test User", 1)
        .expect("Failed to create test user")
        .id
}

/// Read a user row back by local id.
pub fn load_user(conn: &Connection, id: i64) -> User {
    conn.query_row(
        "SELECT id, fb_id, name, registered FROM users WHERE id = ?1",
        [id],
        |row| {
            Ok(User {
                id: row.get(0)?,
                provider_id: row.get(1)?,
                name: row.get(2)?,
                registered: row.get(3)?,
            })
        },
    )
    .expect("Failed to load test user")
}

/// Identity provider answering from a fixed token table.
#[derive(Default)]
pub struct FakeProvider {
    tokens: HashMap<String, Identity>,
}

impl FakeProvider {
    pub fn with(mut self, token: &str, provider_id: &str, name: &str) -> Self {
        self.tokens.insert(
            token.to_string(),
            Identity {
                provider_id: provider_id.to_string(),
                display_name: name.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn who_am_i(&self, token: &str) -> Result<Identity, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::UpstreamDecodeError("unknown token".into()))
    }
}

/// App state over a temporary database, UTC calendar and fake identities:
/// token "ann" → fb-ann, "bob" → fb-bob, "eve" → fb-eve (not allowed).
pub fn setup_state() -> (AppState, TempDir) {
    let (db, dir) = setup_shared_db();
    let provider = FakeProvider::default()
        .with("ann", "fb-ann", "Ann")
        .with("bob", "fb-bob", "Bob")
        .with("eve", "fb-eve", "Eve");
    let allow_list = AllowList::new(["fb-ann", "fb-bob"]);
    let state = AppState {
        db,
        identity: Arc::new(IdentityGateway::new(Arc::new(provider), allow_list)),
        calendar: Calendar::from_offset_minutes(Some(0)).expect("UTC offset"),
    };
    (state, dir)
}

/// Send one request through a router and return status plus body text.
pub async fn send(
    router: &axum::Router,
    method: axum::http::Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (axum::http::StatusCode, String) {
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("Failed to build request");

    let resp = router.clone().oneshot(request).await.expect("Router failed");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8"))
}

/// Parse a JSON response body.
pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("Response body is not JSON")
}
