//! Bilingual (English / Marathi) village information pages.
//!
//! Public reads resolve `title` and `description` to the language given by
//! `?lang=` (falling back to English). `/api/village-details/admin` returns
//! both languages and unpublished entries.

pub mod handlers;
pub mod models;
pub mod routes;

pub use models::VillageDetails;
