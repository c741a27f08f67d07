//! Generic content collections.
//!
//! A collection is described once by a [`ResourceKind`](kind::ResourceKind);
//! the service, handlers and routes here serve every kind the same way.

pub mod handlers;
pub mod image;
pub mod kind;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{ResourceService, Visibility};
