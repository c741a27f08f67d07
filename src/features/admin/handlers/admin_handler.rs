use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::admin::dtos::{
    AuthSessionDto, LoginDto, SetupAdminDto, SetupStatusDto, UpdateProfileDto,
};
use crate::features::admin::models::AdminProfile;
use crate::features::admin::services::AdminService;
use crate::features::auth::model::AuthenticatedAdmin;
use crate::shared::types::ApiResponse;

/// Report whether the one-time administrator setup is still pending
#[utoipa::path(
    get,
    path = "/api/admin/setup-status",
    responses(
        (status = 200, description = "Setup status", body = ApiResponse<SetupStatusDto>)
    ),
    tag = "admin"
)]
pub async fn setup_status(
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<SetupStatusDto>>> {
    let status = service.setup_status().await?;
    Ok(Json(ApiResponse::success(Some(status), None, None)))
}

/// Create the sole administrator account
#[utoipa::path(
    post,
    path = "/api/admin/setup",
    request_body = SetupAdminDto,
    responses(
        (status = 201, description = "Administrator created", body = ApiResponse<AuthSessionDto>),
        (status = 400, description = "Administrator already exists or validation error")
    ),
    tag = "admin"
)]
pub async fn setup(
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<SetupAdminDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthSessionDto>>)> {
    let session = service.setup(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(session),
            Some("Admin setup completed successfully".to_string()),
            None,
        )),
    ))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthSessionDto>),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "admin"
)]
pub async fn login(
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<LoginDto>,
) -> Result<Json<ApiResponse<AuthSessionDto>>> {
    let session = service.login(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(session),
        Some("Login successful".to_string()),
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/profile",
    responses(
        (status = 200, description = "Current administrator", body = ApiResponse<AdminProfile>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    admin: AuthenticatedAdmin,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<AdminProfile>>> {
    let profile = service.profile(admin.id).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/admin/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<AdminProfile>),
        (status = 400, description = "Validation error, wrong current password or username taken"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    admin: AuthenticatedAdmin,
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<UpdateProfileDto>,
) -> Result<Json<ApiResponse<AdminProfile>>> {
    let profile = service.update_profile(admin.id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(profile),
        Some("Profile updated successfully".to_string()),
        None,
    )))
}

/// Tokens are not tracked server-side; the client discards its copy
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 200, description = "Logout acknowledged"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(admin: AuthenticatedAdmin) -> Json<ApiResponse<()>> {
    tracing::info!("Administrator '{}' logged out", admin.username);
    Json(ApiResponse::success(
        None,
        Some("Logout successful".to_string()),
        None,
    ))
}
