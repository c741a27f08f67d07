use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::admin::models::AdminProfile;
use crate::shared::constants::MIN_PASSWORD_LENGTH;
use crate::shared::patch::Patch;

/// Whether the one-time setup still has to run
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetupStatusDto {
    pub setup_required: bool,
    pub has_admin: bool,
}

/// First (and only) administrator account
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetupAdminDto {
    pub username: Option<String>,

    #[validate(length(
        min = MIN_PASSWORD_LENGTH,
        message = "Password must be at least 6 characters long"
    ))]
    pub password: Option<String>,

    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginDto {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Profile changes. `newPassword` is only applied together with the correct
/// `currentPassword`; `email: null` or `""` clears the address.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100, message = "Username cannot be empty"))]
    pub username: Option<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub email: Patch<String>,

    pub current_password: Option<String>,

    #[validate(length(
        min = MIN_PASSWORD_LENGTH,
        message = "New password must be at least 6 characters long"
    ))]
    pub new_password: Option<String>,
}

/// Administrator plus a freshly issued bearer token
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSessionDto {
    pub admin: AdminProfile,
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}
