//! HTTP surface of the employee directory: router, handlers and process config.

pub mod config;
pub mod http;
mod payload;
mod routes;

pub use config::AppConfig;
pub use http::{AppState, ServeConfig, build_router, serve};
