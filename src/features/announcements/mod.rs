//! Home-page announcements.
//!
//! Standard resource routes under `/api/announcements`.

pub mod models;

pub use models::Announcements;
