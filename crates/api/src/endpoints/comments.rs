//! Comment endpoints, scoped under a post.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use linnet_common::AppResult;
use linnet_core::comment::{CreateCommentInput, UpdateCommentInput};
use linnet_db::entities::comment;
use serde::{Deserialize, Serialize};

use crate::{
    endpoints,
    extractors::AuthUser,
    middleware::AppState,
    response::{no_content, ApiResponse},
};

/// Comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub author_id: String,
    pub post_id: String,
    pub content: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            author_id: c.user_id,
            post_id: c.post_id,
            content: c.content,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Comment list query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsQuery {
    #[serde(default = "endpoints::default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// Comment body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub content: String,
}

/// Path parameters for a comment nested under a post.
#[derive(Debug, Deserialize)]
pub struct CommentPath {
    pub id: String,
    pub comment_id: String,
}

/// List comments on a post in insertion order.
async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListCommentsQuery>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let limit = endpoints::clamp_limit(query.limit);
    let comments = state
        .comment_service
        .list(&id, limit, query.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        comments.into_iter().map(Into::into).collect(),
    ))
}

/// Comment on a post.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let input = CreateCommentInput {
        content: req.content,
    };

    let comment = state.comment_service.create(&user.id, &id, input).await?;

    Ok(ApiResponse::created(comment.into()))
}

/// Get a single comment.
async fn get_comment(
    State(state): State<AppState>,
    Path(path): Path<CommentPath>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state.comment_service.get(&path.id, &path.comment_id).await?;
    Ok(ApiResponse::ok(comment.into()))
}

/// Update a comment (author only).
async fn update_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(path): Path<CommentPath>,
    Json(req): Json<CommentRequest>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let input = UpdateCommentInput {
        content: req.content,
    };

    let comment = state
        .comment_service
        .update(&user.id, &path.id, &path.comment_id, input)
        .await?;

    Ok(ApiResponse::ok(comment.into()))
}

/// Delete a comment (author only).
async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(path): Path<CommentPath>,
) -> AppResult<impl IntoResponse> {
    state
        .comment_service
        .delete(&user.id, &path.id, &path.comment_id)
        .await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/comments", get(list_comments).post(create_comment))
        .route(
            "/{id}/comments/{comment_id}",
            get(get_comment)
                .put(update_comment)
                .patch(update_comment)
                .delete(delete_comment),
        )
}
