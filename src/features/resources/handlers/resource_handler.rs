//! Handlers shared by every resource kind.
//!
//! Each function is generic over [`ResourceKind`] and mounted per kind by
//! [`routes`](crate::features::resources::routes).

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath, AppQuery};
use crate::features::auth::guards::MaybeAdmin;
use crate::features::auth::model::AuthenticatedAdmin;
use crate::features::resources::kind::ResourceKind;
use crate::features::resources::models::Resource;
use crate::features::resources::services::{ResourceService, Visibility};
use crate::shared::types::{ApiResponse, Meta, Page, PaginationQuery};

pub type ListResponse<D> = Json<ApiResponse<Vec<Resource<D>>>>;
pub type ItemResponse<D> = Json<ApiResponse<Resource<D>>>;

pub fn page_response<T>(page: Page<T>, pagination: &PaginationQuery) -> Json<ApiResponse<Vec<T>>> {
    let meta = Meta::new(page.items.len(), page.total, pagination);
    Json(ApiResponse::success(Some(page.items), None, Some(meta)))
}

/// Published documents only
pub async fn list_public<K: ResourceKind>(
    State(service): State<Arc<ResourceService<K>>>,
    AppQuery(pagination): AppQuery<PaginationQuery>,
    AppQuery(filter): AppQuery<K::Filter>,
) -> Result<ListResponse<K::Document>> {
    let page = service
        .list(Visibility::Public, &filter, &pagination)
        .await?;
    Ok(page_response(page, &pagination))
}

/// Every document, published or not
pub async fn list_all<K: ResourceKind>(
    _admin: AuthenticatedAdmin,
    State(service): State<Arc<ResourceService<K>>>,
    AppQuery(pagination): AppQuery<PaginationQuery>,
    AppQuery(filter): AppQuery<K::Filter>,
) -> Result<ListResponse<K::Document>> {
    let page = service.list(Visibility::Admin, &filter, &pagination).await?;
    Ok(page_response(page, &pagination))
}

/// Unpublished documents are only found when an administrator asks
pub async fn get_one<K: ResourceKind>(
    caller: MaybeAdmin,
    State(service): State<Arc<ResourceService<K>>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ItemResponse<K::Document>> {
    let resource = service
        .get(id, Visibility::for_caller(caller.id()))
        .await?;
    Ok(Json(ApiResponse::success(Some(resource), None, None)))
}

pub async fn create<K: ResourceKind>(
    admin: AuthenticatedAdmin,
    State(service): State<Arc<ResourceService<K>>>,
    AppJson(dto): AppJson<K::Create>,
) -> Result<(StatusCode, ItemResponse<K::Document>)> {
    let resource = service.create(dto, Some(admin.id)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(resource),
            Some(K::created_message()),
            None,
        )),
    ))
}

/// Anonymous submissions (feedback, applications)
pub async fn submit<K: ResourceKind>(
    caller: MaybeAdmin,
    State(service): State<Arc<ResourceService<K>>>,
    AppJson(dto): AppJson<K::Create>,
) -> Result<(StatusCode, ItemResponse<K::Document>)> {
    let resource = service.create(dto, caller.id()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(resource),
            Some(K::created_message()),
            None,
        )),
    ))
}

pub async fn update<K: ResourceKind>(
    admin: AuthenticatedAdmin,
    State(service): State<Arc<ResourceService<K>>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<K::Update>,
) -> Result<ItemResponse<K::Document>> {
    let resource = service.update(id, dto, admin.id).await?;
    Ok(Json(ApiResponse::success(
        Some(resource),
        Some(K::updated_message()),
        None,
    )))
}

pub async fn remove<K: ResourceKind>(
    _admin: AuthenticatedAdmin,
    State(service): State<Arc<ResourceService<K>>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some(K::deleted_message()),
        None,
    )))
}
