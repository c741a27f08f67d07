use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::feedback::models::FeedbackKind;
use crate::features::resources::handlers;
use crate::features::resources::services::ResourceService;

/// Residents submit without signing in
pub fn public_routes(service: Arc<ResourceService<FeedbackKind>>) -> Router {
    Router::new()
        .route("/api/feedback", post(handlers::submit::<FeedbackKind>))
        .with_state(service)
}

/// Review queue
pub fn protected_routes(service: Arc<ResourceService<FeedbackKind>>) -> Router {
    Router::new()
        .route("/api/feedback", get(handlers::list_all::<FeedbackKind>))
        .route(
            "/api/feedback/{id}",
            get(handlers::get_one::<FeedbackKind>).delete(handlers::remove::<FeedbackKind>),
        )
        .route(
            "/api/feedback/{id}/status",
            put(handlers::update::<FeedbackKind>),
        )
        .with_state(service)
}
