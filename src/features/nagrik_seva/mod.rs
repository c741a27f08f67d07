//! Citizen services ("nagrik seva"): certificate applications and the banner
//! image shown above the public form.

pub mod handlers;
pub mod models;
pub mod routes;

pub use models::{SevaApplications, SevaHeaders};
