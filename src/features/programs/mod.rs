pub mod models;

pub use models::Programs;
