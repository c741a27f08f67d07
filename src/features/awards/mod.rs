//! Village awards, ordered by award date.

pub mod models;

pub use models::Awards;
