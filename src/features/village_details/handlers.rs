use axum::{extract::State, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppPath, AppQuery};
use crate::features::auth::guards::MaybeAdmin;
use crate::features::resources::handlers::page_response;
use crate::features::resources::kind::NoFilter;
use crate::features::resources::models::Resource;
use crate::features::resources::services::{ResourceService, Visibility};
use crate::features::village_details::models::{
    LangQuery, Language, LocalizedVillageDetail, VillageDetails,
};
use crate::shared::types::{ApiResponse, Page, PaginationQuery};

type Service = Arc<ResourceService<VillageDetails>>;

/// Published village details in one language
#[utoipa::path(
    get,
    path = "/api/village-details",
    params(LangQuery, PaginationQuery),
    responses(
        (status = 200, description = "Localized village details", body = ApiResponse<Vec<LocalizedVillageDetail>>)
    ),
    tag = "village-details"
)]
pub async fn list_localized(
    State(service): State<Service>,
    AppQuery(lang): AppQuery<LangQuery>,
    AppQuery(pagination): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<Resource<LocalizedVillageDetail>>>>> {
    let language = Language::from_code(lang.lang.as_deref());
    let page = service
        .list(Visibility::Public, &NoFilter::default(), &pagination)
        .await?;

    let localized = Page {
        items: page
            .items
            .into_iter()
            .map(|r| r.map(|d| d.localize(language)))
            .collect(),
        total: page.total,
    };

    Ok(page_response(localized, &pagination))
}

/// One village detail in one language
#[utoipa::path(
    get,
    path = "/api/village-details/{id}",
    params(
        ("id" = Uuid, Path, description = "Village detail ID"),
        LangQuery
    ),
    responses(
        (status = 200, description = "Localized village detail", body = ApiResponse<LocalizedVillageDetail>),
        (status = 404, description = "Village detail not found")
    ),
    tag = "village-details"
)]
pub async fn get_localized(
    caller: MaybeAdmin,
    State(service): State<Service>,
    AppPath(id): AppPath<Uuid>,
    AppQuery(lang): AppQuery<LangQuery>,
) -> Result<Json<ApiResponse<Resource<LocalizedVillageDetail>>>> {
    let language = Language::from_code(lang.lang.as_deref());
    let resource = service
        .get(id, Visibility::for_caller(caller.id()))
        .await?;

    Ok(Json(ApiResponse::success(
        Some(resource.map(|d| d.localize(language))),
        None,
        None,
    )))
}
