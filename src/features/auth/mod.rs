//! Bearer-token authentication for the single portal administrator.
//!
//! - [`TokenService`]: HS256 issue/verify
//! - [`PasswordService`]: bcrypt hash/verify on the blocking pool
//! - [`AccessGate`]: header → token → administrator lookup

mod gate;

pub mod guards;
pub mod model;
pub mod services;

pub use gate::{bearer_token, AccessGate};
pub use services::{PasswordService, TokenService};
