use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::resources::handlers;
use crate::features::resources::kind::ResourceKind;
use crate::features::resources::services::ResourceService;

/// `GET {base}` and `GET {base}/{id}`
pub fn public_routes<K: ResourceKind>(base: &str, service: Arc<ResourceService<K>>) -> Router {
    Router::new()
        .route(base, get(handlers::list_public::<K>))
        .route(&format!("{}/{{id}}", base), get(handlers::get_one::<K>))
        .with_state(service)
}

/// `GET {base}/admin`, `POST {base}`, `PUT|DELETE {base}/{id}`
pub fn protected_routes<K: ResourceKind>(
    base: &str,
    service: Arc<ResourceService<K>>,
) -> Router {
    Router::new()
        // Static segment takes precedence over {id}
        .route(&format!("{}/admin", base), get(handlers::list_all::<K>))
        .route(base, post(handlers::create::<K>))
        .route(
            &format!("{}/{{id}}", base),
            put(handlers::update::<K>).delete(handlers::remove::<K>),
        )
        .with_state(service)
}
