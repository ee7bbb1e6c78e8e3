pub mod auth;
pub mod error;
pub mod profile;

pub use error::ApiError;
