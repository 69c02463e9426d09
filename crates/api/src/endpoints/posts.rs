//! Post endpoints: CRUD, like/unlike and the feed.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use linnet_common::AppResult;
use linnet_core::{
    like::{LikeOutcome, UnlikeOutcome},
    post::{CreatePostInput, PostWithLikes, UpdatePostInput},
};
use linnet_db::entities::post;
use serde::{Deserialize, Serialize};

use crate::{
    endpoints,
    extractors::AuthUser,
    middleware::AppState,
    response::{no_content, ApiResponse},
};

use super::accounts::DetailResponse;

/// Post response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes_count: Option<i64>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<post::Model> for PostResponse {
    fn from(p: post::Model) -> Self {
        Self {
            id: p.id,
            author_id: p.user_id,
            title: p.title,
            content: p.content,
            likes_count: None,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

impl From<PostWithLikes> for PostResponse {
    fn from(p: PostWithLikes) -> Self {
        let mut response = Self::from(p.post);
        response.likes_count = Some(p.likes_count);
        response
    }
}

/// Post list query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
    #[serde(default = "endpoints::default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
    /// Substring search over title and content.
    pub search: Option<String>,
}

/// Feed query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    #[serde(default = "endpoints::default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
    /// Also include the caller's own posts.
    #[serde(default)]
    pub include_self: bool,
}

/// Create post request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// Update post request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// List posts, newest first.
async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let limit = endpoints::clamp_limit(query.limit);
    let posts = state
        .post_service
        .list(limit, query.until_id.as_deref(), query.search.as_deref())
        .await?;

    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

/// Create a post.
async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> AppResult<ApiResponse<PostResponse>> {
    let input = CreatePostInput {
        title: req.title,
        content: req.content,
    };

    let post = state.post_service.create(&user.id, input).await?;

    Ok(ApiResponse::created(post.into()))
}

/// Get a post with its like count.
async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.get_with_likes(&id).await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Update a post (author only).
async fn update_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> AppResult<ApiResponse<PostResponse>> {
    let input = UpdatePostInput {
        title: req.title,
        content: req.content,
    };

    let post = state.post_service.update(&user.id, &id, input).await?;

    Ok(ApiResponse::ok(post.into()))
}

/// Delete a post (author only).
async fn delete_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.post_service.delete(&user.id, &id).await?;
    Ok(no_content())
}

/// Like a post. The first like returns 201; repeats return 200.
async fn like_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DetailResponse>> {
    let outcome = state.like_service.like(&user.id, &id).await?;

    Ok(match outcome {
        LikeOutcome::Liked => ApiResponse::created(DetailResponse {
            detail: "Post liked".to_string(),
        }),
        LikeOutcome::AlreadyLiked => ApiResponse::ok(DetailResponse {
            detail: "Already liked".to_string(),
        }),
    })
}

/// Unlike a post. Removing a missing like is a reported no-op.
async fn unlike_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DetailResponse>> {
    let outcome = state.like_service.unlike(&user.id, &id).await?;

    let detail = match outcome {
        UnlikeOutcome::Unliked => "Post unliked",
        UnlikeOutcome::NotLiked => "No like to remove",
    };

    Ok(ApiResponse::ok(DetailResponse {
        detail: detail.to_string(),
    }))
}

/// Get the feed: posts from followed users, newest first.
async fn feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let limit = endpoints::clamp_limit(query.limit);
    let posts = state
        .post_service
        .feed(
            &user.id,
            limit,
            query.until_id.as_deref(),
            query.include_self,
        )
        .await?;

    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/feed", get(feed))
        .route(
            "/{id}",
            get(get_post)
                .put(update_post)
                .patch(update_post)
                .delete(delete_post),
        )
        .route("/{id}/like", post(like_post))
        .route("/{id}/unlike", post(unlike_post))
}
