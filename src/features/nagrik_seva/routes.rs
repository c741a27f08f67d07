use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::nagrik_seva::handlers;
use crate::features::nagrik_seva::models::{SevaApplications, SevaHeaders};
use crate::features::resources::handlers as resource_handlers;
use crate::features::resources::services::ResourceService;

pub fn public_routes(
    headers: Arc<ResourceService<SevaHeaders>>,
    applications: Arc<ResourceService<SevaApplications>>,
) -> Router {
    let header = Router::new()
        .route("/api/nagrik-seva/header", get(handlers::get_header))
        .with_state(headers);

    let apply = Router::new()
        .route(
            "/api/nagrik-seva/apply",
            post(resource_handlers::submit::<SevaApplications>),
        )
        .with_state(applications);

    header.merge(apply)
}

pub fn protected_routes(
    headers: Arc<ResourceService<SevaHeaders>>,
    applications: Arc<ResourceService<SevaApplications>>,
) -> Router {
    let header = Router::new()
        .route("/api/nagrik-seva/header", post(handlers::upsert_header))
        .with_state(headers);

    let review = Router::new()
        .route(
            "/api/nagrik-seva/applications",
            get(resource_handlers::list_all::<SevaApplications>),
        )
        .route(
            "/api/nagrik-seva/applications/{id}",
            get(resource_handlers::get_one::<SevaApplications>)
                .delete(resource_handlers::remove::<SevaApplications>),
        )
        .route(
            "/api/nagrik-seva/applications/{id}/status",
            patch(resource_handlers::update::<SevaApplications>),
        )
        .with_state(applications);

    header.merge(review)
}
