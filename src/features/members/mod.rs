//! Panchayat members. Public listing can be narrowed with `?department=`.

pub mod models;

pub use models::Members;
