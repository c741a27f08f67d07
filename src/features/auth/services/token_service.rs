use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::Claims;

/// Why a bearer token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not match")]
    BadSignature,
}

/// A freshly signed token and its lifetime in seconds
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// Issues and verifies HS256 bearer tokens.
///
/// The signing secret and lifetime are read once from [`AuthConfig`] at startup.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: Duration,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.jwt_leeway.as_secs();

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expires_in: config.jwt_expires_in,
            validation,
        }
    }

    pub fn issue(&self, admin_id: Uuid) -> Result<IssuedToken> {
        let now = Utc::now().timestamp().max(0) as u64;
        let expires_in = self.expires_in.as_secs();

        let claims = Claims {
            sub: admin_id.to_string(),
            iat: now,
            exp: now + expires_in,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken { token, expires_in })
    }

    /// Returns the administrator id carried by a valid token
    pub fn verify(&self, token: &str) -> std::result::Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            }
        })?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_expires_in: Duration::from_secs(7 * 24 * 60 * 60),
            jwt_leeway: Duration::ZERO,
            bcrypt_cost: 4,
        }
    }

    #[test]
    fn test_issue_and_verify_token() {
        let service = TokenService::new(&config("panchayat-secret"));
        let admin_id = Uuid::now_v7();

        let issued = service.issue(admin_id).unwrap();
        assert!(!issued.token.is_empty());
        assert_eq!(issued.expires_in, 7 * 24 * 60 * 60);

        assert_eq!(service.verify(&issued.token), Ok(admin_id));
    }

    #[test]
    fn test_verify_token_with_wrong_secret() {
        let issuer = TokenService::new(&config("panchayat-secret"));
        let other = TokenService::new(&config("another-secret"));

        let issued = issuer.issue(Uuid::now_v7()).unwrap();
        assert_eq!(other.verify(&issued.token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_verify_expired_token() {
        let service = TokenService::new(&config("panchayat-secret"));
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: Uuid::now_v7().to_string(),
            iat: now - 3600,
            exp: now - 120,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"panchayat-secret"),
        )
        .unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_verify_garbage_token() {
        let service = TokenService::new(&config("panchayat-secret"));
        assert_eq!(
            service.verify("invalid.token.here"),
            Err(TokenError::Malformed)
        );
        assert_eq!(service.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_verify_rejects_non_uuid_subject() {
        let service = TokenService::new(&config("panchayat-secret"));
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: "admin".to_string(),
            iat: now,
            exp: now + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"panchayat-secret"),
        )
        .unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Malformed));
    }
}
