mod admin;

pub use admin::*;
