use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedAdmin;
use crate::features::auth::services::TokenService;
use crate::modules::storage::AdminStore;
use crate::shared::constants::{ADMIN_NOT_FOUND, INVALID_TOKEN, MISSING_TOKEN};

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolves a bearer token to the administrator it was issued for
pub struct AccessGate {
    tokens: Arc<TokenService>,
    admins: Arc<dyn AdminStore>,
}

impl AccessGate {
    pub fn new(tokens: Arc<TokenService>, admins: Arc<dyn AdminStore>) -> Self {
        Self { tokens, admins }
    }

    /// Check the raw `Authorization` header value
    pub async fn authenticate(&self, header: Option<&str>) -> Result<AuthenticatedAdmin> {
        let token = bearer_token(header)
            .ok_or_else(|| AppError::Unauthorized(MISSING_TOKEN.to_string()))?;

        let admin_id = self.tokens.verify(token).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::Unauthorized(INVALID_TOKEN.to_string())
        })?;

        let admin = self
            .admins
            .find_admin_by_id(admin_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(ADMIN_NOT_FOUND.to_string()))?;

        Ok(AuthenticatedAdmin {
            id: admin.id,
            username: admin.username,
        })
    }
}
