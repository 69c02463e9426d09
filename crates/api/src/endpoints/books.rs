//! Book endpoints (catalog).

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use linnet_common::AppResult;
use linnet_core::catalog::{CreateBookInput, UpdateBookInput};
use linnet_db::entities::book;
use serde::{Deserialize, Serialize};

use crate::{
    endpoints,
    extractors::AuthUser,
    middleware::AppState,
    response::{no_content, ApiResponse},
};

/// Book response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub publication_year: i32,
    pub author_id: String,
}

impl From<book::Model> for BookResponse {
    fn from(b: book::Model) -> Self {
        Self {
            id: b.id,
            title: b.title,
            publication_year: b.publication_year,
            author_id: b.author_id,
        }
    }
}

/// Create book request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: String,
    pub publication_year: i32,
    pub author_id: String,
}

/// Update book request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub publication_year: Option<i32>,
    pub author_id: Option<String>,
}

/// Book list query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBooksQuery {
    #[serde(default = "endpoints::default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
    pub publication_year: Option<i32>,
    pub author_id: Option<String>,
}

/// List books with optional filters.
async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> AppResult<ApiResponse<Vec<BookResponse>>> {
    let limit = endpoints::clamp_limit(query.limit);
    let books = state
        .catalog_service
        .list_books(
            limit,
            query.until_id.as_deref(),
            query.publication_year,
            query.author_id.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok(books.into_iter().map(Into::into).collect()))
}

/// Create a book. The publication year must not be in the future.
async fn create_book(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateBookRequest>,
) -> AppResult<ApiResponse<BookResponse>> {
    let input = CreateBookInput {
        title: req.title,
        publication_year: req.publication_year,
        author_id: req.author_id,
    };

    let book = state.catalog_service.create_book(input).await?;

    Ok(ApiResponse::created(book.into()))
}

/// Get a book by ID.
async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BookResponse>> {
    let book = state.catalog_service.get_book(&id).await?;
    Ok(ApiResponse::ok(book.into()))
}

/// Update a book. The same publication-year rule applies.
async fn update_book(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBookRequest>,
) -> AppResult<ApiResponse<BookResponse>> {
    let input = UpdateBookInput {
        title: req.title,
        publication_year: req.publication_year,
        author_id: req.author_id,
    };

    let book = state.catalog_service.update_book(&id, input).await?;

    Ok(ApiResponse::ok(book.into()))
}

/// Delete a book.
async fn delete_book(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.catalog_service.delete_book(&id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book)
                .put(update_book)
                .patch(update_book)
                .delete(delete_book),
        )
}
