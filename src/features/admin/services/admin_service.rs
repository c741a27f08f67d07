use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{
    AuthSessionDto, LoginDto, SetupAdminDto, SetupStatusDto, UpdateProfileDto,
};
use crate::features::admin::models::{Admin, AdminProfile};
use crate::features::auth::{PasswordService, TokenService};
use crate::modules::storage::{AdminStore, NewAdmin};
use crate::shared::constants::{ADMIN_ALREADY_EXISTS, INVALID_CREDENTIALS};
use crate::shared::validation::{first_error_message, normalize_email, optional_text};

/// Setup, login and profile management for the single administrator
pub struct AdminService {
    store: Arc<dyn AdminStore>,
    passwords: PasswordService,
    tokens: Arc<TokenService>,
}

impl AdminService {
    pub fn new(
        store: Arc<dyn AdminStore>,
        passwords: PasswordService,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            passwords,
            tokens,
        }
    }

    pub async fn setup_status(&self) -> Result<SetupStatusDto> {
        let count = self.store.count_admins().await?;
        Ok(SetupStatusDto {
            setup_required: count == 0,
            has_admin: count > 0,
        })
    }

    /// Create the sole administrator and sign them in.
    ///
    /// Existence is checked before the payload is looked at, so every call
    /// after the first gets the same answer. The insert itself is guarded by
    /// the store, which closes the race between concurrent first calls.
    pub async fn setup(&self, dto: SetupAdminDto) -> Result<AuthSessionDto> {
        if self.store.count_admins().await? > 0 {
            return Err(AppError::BadRequest(ADMIN_ALREADY_EXISTS.to_string()));
        }

        let username = optional_text(dto.username.clone());
        let (Some(username), Some(password)) = (username, dto.password.clone()) else {
            return Err(AppError::Validation(
                "Username and password are required".to_string(),
            ));
        };

        dto.validate()
            .map_err(|e| AppError::Validation(first_error_message(&e)))?;

        let email = match optional_text(dto.email) {
            Some(email) => Some(normalize_email(&email)?),
            None => None,
        };

        let password_hash = self.passwords.hash(&password).await?;

        let admin = self
            .store
            .create_singleton(NewAdmin {
                username,
                password_hash,
                email,
            })
            .await?
            .ok_or_else(|| AppError::BadRequest(ADMIN_ALREADY_EXISTS.to_string()))?;

        tracing::info!("Administrator '{}' created via setup", admin.username);

        self.session(admin)
    }

    /// Unknown usernames and wrong passwords get the same answer
    pub async fn login(&self, dto: LoginDto) -> Result<AuthSessionDto> {
        let (Some(username), Some(password)) = (optional_text(dto.username), dto.password) else {
            return Err(AppError::Validation(
                "Please provide username and password".to_string(),
            ));
        };
        if password.is_empty() {
            return Err(AppError::Validation(
                "Please provide username and password".to_string(),
            ));
        }

        let Some(mut admin) = self.store.find_admin_by_username(&username).await? else {
            tracing::info!("Login rejected: unknown username");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !self.passwords.verify(&password, &admin.password_hash).await? {
            tracing::info!("Login rejected: wrong password for '{}'", admin.username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        admin.last_login = Some(Utc::now());
        let admin = self.store.save_admin(&admin).await?;

        tracing::info!("Administrator '{}' logged in", admin.username);

        self.session(admin)
    }

    pub async fn profile(&self, admin_id: Uuid) -> Result<AdminProfile> {
        self.find(admin_id).await.map(AdminProfile::from)
    }

    pub async fn update_profile(
        &self,
        admin_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<AdminProfile> {
        dto.validate()
            .map_err(|e| AppError::Validation(first_error_message(&e)))?;

        let mut admin = self.find(admin_id).await?;

        if let Some(new_password) = dto.new_password {
            let Some(current_password) = dto.current_password else {
                return Err(AppError::Validation(
                    "Current password is required to set a new password".to_string(),
                ));
            };
            if !self
                .passwords
                .verify(&current_password, &admin.password_hash)
                .await?
            {
                return Err(AppError::BadRequest(
                    "Current password is incorrect".to_string(),
                ));
            }
            admin.password_hash = self.passwords.hash(&new_password).await?;
        }

        if let Some(username) = dto.username {
            let username = username.trim().to_string();
            if username.is_empty() {
                return Err(AppError::Validation("Username cannot be empty".to_string()));
            }
            if username != admin.username {
                if let Some(other) = self.store.find_admin_by_username(&username).await? {
                    if other.id != admin.id {
                        return Err(AppError::DuplicateKey(
                            "Username already exists".to_string(),
                        ));
                    }
                }
            }
            admin.username = username;
        }

        if let Some(email) = dto.email.into_optional_text() {
            admin.email = match email {
                Some(email) => Some(normalize_email(&email)?),
                None => None,
            };
        }

        let admin = self.store.save_admin(&admin).await?;
        tracing::info!("Administrator '{}' updated their profile", admin.username);

        Ok(admin.into())
    }

    async fn find(&self, admin_id: Uuid) -> Result<Admin> {
        self.store
            .find_admin_by_id(admin_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))
    }

    fn session(&self, admin: Admin) -> Result<AuthSessionDto> {
        let issued = self.tokens.issue(admin.id)?;
        Ok(AuthSessionDto {
            admin: admin.into(),
            token: issued.token,
            expires_in: issued.expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::patch::Patch;
    use crate::shared::test_helpers::{auth_config, memory_store};
    use fake::faker::internet::en::{FreeEmail, Username};
    use fake::Fake;

    fn service() -> AdminService {
        let config = auth_config();
        AdminService::new(
            memory_store(),
            PasswordService::new(config.bcrypt_cost),
            Arc::new(TokenService::new(&config)),
        )
    }

    fn setup_dto(username: &str, password: &str) -> SetupAdminDto {
        SetupAdminDto {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_setup_runs_once() {
        let service = service();
        assert!(service.setup_status().await.unwrap().setup_required);

        let session = service.setup(setup_dto(" sarpanch ", "gram123")).await.unwrap();
        assert_eq!(session.admin.username, "sarpanch");
        assert!(session.admin.is_setup);
        assert!(!session.token.is_empty());

        let status = service.setup_status().await.unwrap();
        assert!(!status.setup_required);
        assert!(status.has_admin);

        // Any payload, valid or not, is refused once an admin exists
        for dto in [
            setup_dto("another", "another123"),
            SetupAdminDto {
                username: None,
                password: None,
                email: None,
            },
        ] {
            let err = service.setup(dto).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(ref m) if m == ADMIN_ALREADY_EXISTS));
        }
    }

    #[tokio::test]
    async fn test_concurrent_setup_creates_one_admin() {
        let service = Arc::new(service());

        let (a, b) = tokio::join!(
            service.setup(setup_dto("first", "first123")),
            service.setup(setup_dto("second", "second123")),
        );

        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        assert_eq!(service.store.count_admins().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_setup_validation() {
        let service = service();

        let err = service
            .setup(SetupAdminDto {
                username: Some("   ".to_string()),
                password: Some("gram123".to_string()),
                email: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Username and password are required"));

        let err = service.setup(setup_dto("sarpanch", "123")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("at least 6")));

        let err = service
            .setup(SetupAdminDto {
                email: Some("not-an-email".to_string()),
                ..setup_dto("sarpanch", "gram123")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Nothing was written by the rejected attempts
        assert!(service.setup_status().await.unwrap().setup_required);
    }

    #[tokio::test]
    async fn test_login_failures_share_one_message() {
        let service = service();
        let username: String = Username().fake();
        service.setup(setup_dto(&username, "gram123")).await.unwrap();

        let unknown = service
            .login(LoginDto {
                username: Some("nobody".to_string()),
                password: Some("gram123".to_string()),
            })
            .await
            .unwrap_err();
        let wrong = service
            .login(LoginDto {
                username: Some(username.clone()),
                password: Some("wrong-password".to_string()),
            })
            .await
            .unwrap_err();

        for err in [unknown, wrong] {
            assert!(matches!(err, AppError::Unauthorized(ref m) if m == INVALID_CREDENTIALS));
        }
    }

    #[tokio::test]
    async fn test_login_updates_last_login() {
        let service = service();
        let created = service.setup(setup_dto("sarpanch", "gram123")).await.unwrap();
        assert!(created.admin.last_login.is_none());

        let session = service
            .login(LoginDto {
                username: Some("sarpanch".to_string()),
                password: Some("gram123".to_string()),
            })
            .await
            .unwrap();

        assert!(session.admin.last_login.is_some());
        let profile = service.profile(session.admin.id).await.unwrap();
        assert_eq!(profile.last_login, session.admin.last_login);
    }

    #[tokio::test]
    async fn test_password_change_requires_current_password() {
        let service = service();
        let session = service.setup(setup_dto("sarpanch", "gram123")).await.unwrap();
        let id = session.admin.id;

        let missing = service
            .update_profile(
                id,
                UpdateProfileDto {
                    new_password: Some("newpass1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(missing, AppError::Validation(_)));

        let wrong = service
            .update_profile(
                id,
                UpdateProfileDto {
                    current_password: Some("nope".to_string()),
                    new_password: Some("newpass1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(wrong, AppError::BadRequest(ref m) if m == "Current password is incorrect"));

        service
            .update_profile(
                id,
                UpdateProfileDto {
                    current_password: Some("gram123".to_string()),
                    new_password: Some("newpass1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let login = service
            .login(LoginDto {
                username: Some("sarpanch".to_string()),
                password: Some("newpass1".to_string()),
            })
            .await;
        assert!(login.is_ok());
    }

    #[tokio::test]
    async fn test_profile_email_and_username_updates() {
        let service = service();
        let session = service.setup(setup_dto("sarpanch", "gram123")).await.unwrap();
        let id = session.admin.id;
        let email: String = FreeEmail().fake();

        let updated = service
            .update_profile(
                id,
                UpdateProfileDto {
                    username: Some(" gram-office ".to_string()),
                    email: Patch::Value(email.to_uppercase()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.username, "gram-office");
        assert_eq!(updated.email.as_deref(), Some(email.to_lowercase().as_str()));

        // Absent email leaves it alone, explicit null clears it
        let untouched = service
            .update_profile(id, UpdateProfileDto::default())
            .await
            .unwrap();
        assert!(untouched.email.is_some());

        let cleared = service
            .update_profile(
                id,
                UpdateProfileDto {
                    email: Patch::Null,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.email.is_none());
    }
}
