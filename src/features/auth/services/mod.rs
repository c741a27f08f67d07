mod password_service;
mod token_service;

pub use password_service::PasswordService;
pub use token_service::{IssuedToken, TokenError, TokenService};
