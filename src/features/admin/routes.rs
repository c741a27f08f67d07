use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Setup and login, reachable without a token
pub fn public_routes(service: Arc<AdminService>) -> Router {
    Router::new()
        .route("/api/admin/setup-status", get(handlers::setup_status))
        .route("/api/admin/setup", post(handlers::setup))
        .route("/api/admin/login", post(handlers::login))
        .with_state(service)
}

/// Routes for the signed-in administrator
pub fn protected_routes(service: Arc<AdminService>) -> Router {
    Router::new()
        .route(
            "/api/admin/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/api/admin/logout", post(handlers::logout))
        .with_state(service)
}
