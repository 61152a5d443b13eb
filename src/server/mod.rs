//! Axum-based HTTP server for the single-page extraction tool.
//!
//! This module serves the upload form, runs each submission through the
//! image packager and the inference gateway, and renders the result or an
//! error banner back into the page. A JSON twin of the submit route is
//! exposed for scripting.
//!
//! # Components
//!
//! - `handlers`: Page, submit, API, health and metrics endpoints.
//! - `middleware`: Request ID tracking.
//! - `page`: Server-side HTML rendering.
//! - `routes`: The router and shared state.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod handlers;
mod middleware;
pub mod page;
mod routes;

pub use routes::{create_router, AppState};
