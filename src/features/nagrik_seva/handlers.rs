use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedAdmin;
use crate::features::nagrik_seva::models::{SevaHeader, SevaHeaders};
use crate::features::resources::image::ImageFields;
use crate::features::resources::kind::ResourceKind;
use crate::features::resources::models::Resource;
use crate::features::resources::services::{ResourceService, Visibility};
use crate::shared::types::ApiResponse;

type HeaderService = Arc<ResourceService<SevaHeaders>>;

/// Current header image; `data` is null until one is uploaded
#[utoipa::path(
    get,
    path = "/api/nagrik-seva/header",
    responses(
        (status = 200, description = "Latest header image or null", body = ApiResponse<SevaHeader>)
    ),
    tag = "nagrik-seva"
)]
pub async fn get_header(
    State(service): State<HeaderService>,
) -> Result<Json<ApiResponse<Option<Resource<SevaHeader>>>>> {
    let header = service.latest(Visibility::Public).await?;
    Ok(Json(ApiResponse::success(Some(header), None, None)))
}

/// Replace the header image, creating it on first upload
#[utoipa::path(
    post,
    path = "/api/nagrik-seva/header",
    request_body = ImageFields,
    responses(
        (status = 200, description = "Header image updated", body = ApiResponse<SevaHeader>),
        (status = 400, description = "Image data, content type or filename missing"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "nagrik-seva",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upsert_header(
    admin: AuthenticatedAdmin,
    State(service): State<HeaderService>,
    AppJson(dto): AppJson<ImageFields>,
) -> Result<Json<ApiResponse<Resource<SevaHeader>>>> {
    let header = service.upsert_latest(dto.clone(), dto, admin.id).await?;

    Ok(Json(ApiResponse::success(
        Some(header),
        Some(SevaHeaders::updated_message()),
        None,
    )))
}
