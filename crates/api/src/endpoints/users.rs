//! User endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use linnet_common::AppResult;
use linnet_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{endpoints, middleware::AppState, response::ApiResponse};

/// Public user profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub created_at: String,
}

/// Compact user reference.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub id: String,
    pub username: String,
}

impl From<user::Model> for UserSummaryResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
        }
    }
}

/// List query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default = "endpoints::default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// Get a user's profile with follower/following username lists.
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(&id).await?;
    let followers = state.user_service.followers(&id, 100, None).await?;
    let following = state.user_service.following(&id, 100, None).await?;

    Ok(ApiResponse::ok(UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        bio: user.bio,
        avatar_url: user.avatar_url,
        followers: followers.into_iter().map(|u| u.username).collect(),
        following: following.into_iter().map(|u| u.username).collect(),
        created_at: user.created_at.to_rfc3339(),
    }))
}

/// Get the users following a user.
async fn followers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<UserSummaryResponse>>> {
    let limit = endpoints::clamp_limit(query.limit);
    // 404 on unknown user
    state.user_service.get(&id).await?;

    let users = state
        .user_service
        .followers(&id, limit, query.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Get the users a user is following.
async fn following(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<UserSummaryResponse>>> {
    let limit = endpoints::clamp_limit(query.limit);
    state.user_service.get(&id).await?;

    let users = state
        .user_service
        .following(&id, limit, query.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_user))
        .route("/{id}/followers", get(followers))
        .route("/{id}/following", get(following))
}
