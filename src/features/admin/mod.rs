//! Portal administrator: one-time setup, login and profile.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/admin/setup-status` | - | Whether setup is still required |
//! | POST | `/api/admin/setup` | - | Create the sole administrator |
//! | POST | `/api/admin/login` | - | Credentials → bearer token |
//! | GET | `/api/admin/profile` | Bearer | Current profile |
//! | PUT | `/api/admin/profile` | Bearer | Update username, email or password |
//! | POST | `/api/admin/logout` | Bearer | Client-side logout acknowledgement |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::AdminService;
