use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::resources::handlers as resource_handlers;
use crate::features::resources::services::ResourceService;
use crate::features::village_details::handlers;
use crate::features::village_details::models::VillageDetails;

/// Localized reads
pub fn public_routes(service: Arc<ResourceService<VillageDetails>>) -> Router {
    Router::new()
        .route("/api/village-details", get(handlers::list_localized))
        .route("/api/village-details/{id}", get(handlers::get_localized))
        .with_state(service)
}

/// All-language admin listing and mutations
pub fn protected_routes(service: Arc<ResourceService<VillageDetails>>) -> Router {
    Router::new()
        .route(
            "/api/village-details/admin",
            get(resource_handlers::list_all::<VillageDetails>),
        )
        .route(
            "/api/village-details",
            post(resource_handlers::create::<VillageDetails>),
        )
        .route(
            "/api/village-details/{id}",
            put(resource_handlers::update::<VillageDetails>)
                .delete(resource_handlers::remove::<VillageDetails>),
        )
        .with_state(service)
}
