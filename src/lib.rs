pub mod api;
pub mod config;
pub mod logging;
pub mod models;
pub mod probe;
