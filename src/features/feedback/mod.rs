//! Resident feedback: public submission, admin review.
//!
//! Feedback has no publish flag; every entry is visible to the administrator
//! and none are shown publicly.

pub mod models;
pub mod routes;

pub use models::FeedbackKind;
