use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use serde_json::{json, Value};

use crate::core::app::{build_router, AppServices};
use crate::core::config::AuthConfig;
use crate::modules::storage::MemoryStorage;

/// Fast bcrypt and no clock leeway
pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-for-gram-portal".to_string(),
        jwt_expires_in: Duration::from_secs(3600),
        jwt_leeway: Duration::ZERO,
        bcrypt_cost: 4,
    }
}

pub fn memory_store() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::new())
}

/// Services over a fresh in-memory store
pub fn test_services() -> AppServices {
    let store = memory_store();
    AppServices::new(store.clone(), store, &auth_config())
}

pub fn test_server() -> TestServer {
    let router = build_router(&test_services(), 10 * 1024 * 1024);
    TestServer::new(router).expect("failed to start test server")
}

/// Runs first-time setup as `sarpanch` / `gram1234` and returns the token
pub async fn setup_admin(server: &TestServer) -> String {
    let response = server
        .post("/api/admin/setup")
        .json(&json!({
            "username": "sarpanch",
            "password": "gram1234",
            "email": "sarpanch@example.org"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    body["data"]["token"]
        .as_str()
        .expect("setup response carries a token")
        .to_string()
}
