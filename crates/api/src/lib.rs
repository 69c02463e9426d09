//! HTTP API layer for linnet.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: accounts, users, posts, comments, notifications and
//!   the authors/books catalog
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: token resolution, application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
