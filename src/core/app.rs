//! Application wiring: services over one storage backend and the API router.
//!
//! Public routers run behind `optional_auth_middleware` so a signed-in
//! administrator can read unpublished items by id; protected routers run
//! behind the strict `auth_middleware`. Both are merged path by path, so a
//! public `GET` and a protected `POST` can share one URL.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware::from_fn_with_state, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;

use crate::core::config::AuthConfig;
use crate::core::middleware;
use crate::features::admin::{routes as admin_routes, AdminService};
use crate::features::announcements::Announcements;
use crate::features::auth::{AccessGate, PasswordService, TokenService};
use crate::features::awards::Awards;
use crate::features::feedback::{routes as feedback_routes, FeedbackKind};
use crate::features::gallery::Gallery;
use crate::features::members::Members;
use crate::features::nagrik_seva::{routes as seva_routes, SevaApplications, SevaHeaders};
use crate::features::programs::Programs;
use crate::features::resources::routes as resource_routes;
use crate::features::resources::ResourceService;
use crate::features::village_details::{routes as village_routes, VillageDetails};
use crate::modules::storage::{AdminStore, DocumentStore};
use crate::shared::types::ApiResponse;

/// Every service the router needs, built once at startup
pub struct AppServices {
    pub gate: Arc<AccessGate>,
    pub admin: Arc<AdminService>,
    pub announcements: Arc<ResourceService<Announcements>>,
    pub awards: Arc<ResourceService<Awards>>,
    pub gallery: Arc<ResourceService<Gallery>>,
    pub members: Arc<ResourceService<Members>>,
    pub programs: Arc<ResourceService<Programs>>,
    pub village_details: Arc<ResourceService<VillageDetails>>,
    pub feedback: Arc<ResourceService<FeedbackKind>>,
    pub seva_applications: Arc<ResourceService<SevaApplications>>,
    pub seva_headers: Arc<ResourceService<SevaHeaders>>,
}

impl AppServices {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        admins: Arc<dyn AdminStore>,
        auth: &AuthConfig,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(auth));
        let gate = Arc::new(AccessGate::new(Arc::clone(&tokens), Arc::clone(&admins)));
        let admin = Arc::new(AdminService::new(
            admins,
            PasswordService::new(auth.bcrypt_cost),
            tokens,
        ));

        Self {
            gate,
            admin,
            announcements: Arc::new(ResourceService::new(Arc::clone(&documents))),
            awards: Arc::new(ResourceService::new(Arc::clone(&documents))),
            gallery: Arc::new(ResourceService::new(Arc::clone(&documents))),
            members: Arc::new(ResourceService::new(Arc::clone(&documents))),
            programs: Arc::new(ResourceService::new(Arc::clone(&documents))),
            village_details: Arc::new(ResourceService::new(Arc::clone(&documents))),
            feedback: Arc::new(ResourceService::new(Arc::clone(&documents))),
            seva_applications: Arc::new(ResourceService::new(Arc::clone(&documents))),
            seva_headers: Arc::new(ResourceService::new(documents)),
        }
    }
}

#[derive(Serialize)]
struct HealthDto {
    timestamp: chrono::DateTime<Utc>,
}

async fn health_check() -> Json<ApiResponse<HealthDto>> {
    Json(ApiResponse::success(
        Some(HealthDto {
            timestamp: Utc::now(),
        }),
        Some("Gram Portal API is running".to_string()),
        None,
    ))
}

/// All `/api` routes with auth, body limit, 404 fallback and panic handling.
///
/// Docs, CORS and request tracing are layered on by `main`.
pub fn build_router(services: &AppServices, max_body_size: usize) -> Router {
    let public_routes = Router::new()
        .merge(admin_routes::public_routes(Arc::clone(&services.admin)))
        .merge(resource_routes::public_routes(
            "/api/announcements",
            Arc::clone(&services.announcements),
        ))
        .merge(resource_routes::public_routes(
            "/api/awards",
            Arc::clone(&services.awards),
        ))
        .merge(resource_routes::public_routes(
            "/api/gallery",
            Arc::clone(&services.gallery),
        ))
        .merge(resource_routes::public_routes(
            "/api/members",
            Arc::clone(&services.members),
        ))
        .merge(resource_routes::public_routes(
            "/api/programs",
            Arc::clone(&services.programs),
        ))
        .merge(village_routes::public_routes(Arc::clone(
            &services.village_details,
        )))
        .merge(feedback_routes::public_routes(Arc::clone(&services.feedback)))
        .merge(seva_routes::public_routes(
            Arc::clone(&services.seva_headers),
            Arc::clone(&services.seva_applications),
        ))
        .route_layer(from_fn_with_state(
            Arc::clone(&services.gate),
            middleware::optional_auth_middleware,
        ));

    let protected_routes = Router::new()
        .merge(admin_routes::protected_routes(Arc::clone(&services.admin)))
        .merge(resource_routes::protected_routes(
            "/api/announcements",
            Arc::clone(&services.announcements),
        ))
        .merge(resource_routes::protected_routes(
            "/api/awards",
            Arc::clone(&services.awards),
        ))
        .merge(resource_routes::protected_routes(
            "/api/gallery",
            Arc::clone(&services.gallery),
        ))
        .merge(resource_routes::protected_routes(
            "/api/members",
            Arc::clone(&services.members),
        ))
        .merge(resource_routes::protected_routes(
            "/api/programs",
            Arc::clone(&services.programs),
        ))
        .merge(village_routes::protected_routes(Arc::clone(
            &services.village_details,
        )))
        .merge(feedback_routes::protected_routes(Arc::clone(
            &services.feedback,
        )))
        .merge(seva_routes::protected_routes(
            Arc::clone(&services.seva_headers),
            Arc::clone(&services.seva_applications),
        ))
        .route_layer(from_fn_with_state(
            Arc::clone(&services.gate),
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/api/health", get(health_check))
        .merge(protected_routes)
        .merge(public_routes)
        .fallback(middleware::route_not_found)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(CatchPanicLayer::custom(middleware::panic_response))
}
