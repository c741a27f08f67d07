pub mod admin;
pub mod announcements;
pub mod auth;
pub mod awards;
pub mod feedback;
pub mod gallery;
pub mod members;
pub mod nagrik_seva;
pub mod programs;
pub mod resources;
pub mod village_details;
