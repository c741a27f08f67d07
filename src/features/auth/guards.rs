//! Request guards for handlers.
//!
//! Protected routes sit behind `auth_middleware`, which rejects the request
//! before a handler runs; those handlers take [`AuthenticatedAdmin`] directly.
//! Public routes run `optional_auth_middleware` and take [`MaybeAdmin`] when
//! their behaviour differs for a signed-in administrator.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::features::auth::model::AuthenticatedAdmin;

/// Identity of the caller if a valid bearer token was supplied
#[derive(Debug, Clone)]
pub struct MaybeAdmin(pub Option<AuthenticatedAdmin>);

impl MaybeAdmin {
    pub fn id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|a| a.id)
    }
}

impl<S> FromRequestParts<S> for MaybeAdmin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAdmin(
            parts.extensions.get::<AuthenticatedAdmin>().cloned(),
        ))
    }
}
