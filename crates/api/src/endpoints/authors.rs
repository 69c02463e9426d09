//! Author endpoints (catalog).

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use linnet_common::AppResult;
use linnet_core::catalog::AuthorWithBooks;
use linnet_db::entities::author;
use serde::{Deserialize, Serialize};

use crate::{
    endpoints,
    extractors::AuthUser,
    middleware::AppState,
    response::{no_content, ApiResponse},
};

use super::books::BookResponse;

/// Author response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<BookResponse>>,
}

impl From<author::Model> for AuthorResponse {
    fn from(a: author::Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            books: None,
        }
    }
}

impl From<AuthorWithBooks> for AuthorResponse {
    fn from(a: AuthorWithBooks) -> Self {
        let mut response = Self::from(a.author);
        response.books = Some(a.books.into_iter().map(Into::into).collect());
        response
    }
}

/// Author body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRequest {
    pub name: String,
}

/// List query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuthorsQuery {
    #[serde(default = "endpoints::default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// List authors in name order.
async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<ListAuthorsQuery>,
) -> AppResult<ApiResponse<Vec<AuthorResponse>>> {
    let limit = endpoints::clamp_limit(query.limit);
    let authors = state
        .catalog_service
        .list_authors(limit, query.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        authors.into_iter().map(Into::into).collect(),
    ))
}

/// Create an author.
async fn create_author(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AuthorRequest>,
) -> AppResult<ApiResponse<AuthorResponse>> {
    let author = state.catalog_service.create_author(&req.name).await?;
    Ok(ApiResponse::created(author.into()))
}

/// Get an author with their books.
async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AuthorResponse>> {
    let author = state.catalog_service.get_author(&id).await?;
    Ok(ApiResponse::ok(author.into()))
}

/// Rename an author.
async fn update_author(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AuthorRequest>,
) -> AppResult<ApiResponse<AuthorResponse>> {
    let author = state.catalog_service.update_author(&id, &req.name).await?;
    Ok(ApiResponse::ok(author.into()))
}

/// Delete an author.
async fn delete_author(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.catalog_service.delete_author(&id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route(
            "/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
}
