//! API endpoints.

mod accounts;
mod authors;
mod books;
mod comments;
mod notifications;
mod posts;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/accounts", accounts::router())
        .nest("/users", users::router())
        .nest("/posts", posts::router().merge(comments::router()))
        .nest("/notifications", notifications::router())
        .nest("/authors", authors::router())
        .nest("/books", books::router())
}

/// Default page size for list endpoints.
pub(crate) const fn default_limit() -> u64 {
    10
}

/// Cap a requested page size to the maximum.
pub(crate) const fn clamp_limit(limit: u64) -> u64 {
    if limit > 100 { 100 } else { limit }
}
