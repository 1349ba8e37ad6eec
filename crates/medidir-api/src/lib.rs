//! # medidir-api
//!
//! HTTP API layer for MediDir built on Axum: the router, per-domain
//! handlers, request/response DTOs, the bearer-token extractor, and the
//! logging, CORS, and Prometheus middleware.

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
