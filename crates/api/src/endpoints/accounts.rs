//! Account endpoints: registration, login, follow and unfollow.

use axum::{
    extract::{Path, State},
    routing::{post, put},
    Json, Router,
};
use linnet_common::AppResult;
use linnet_core::user::{RegisterInput, UpdateProfileInput};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Registration request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Registration response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub token: String,
}

/// Register a new account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<ApiResponse<RegisterResponse>> {
    let input = RegisterInput {
        username: req.username,
        email: req.email,
        password: req.password,
        bio: req.bio,
        avatar_url: req.avatar_url,
    };

    let user = state.user_service.register(input).await?;

    Ok(ApiResponse::created(RegisterResponse {
        id: user.id.clone(),
        username: user.username,
        email: user.email,
        token: user.token.unwrap_or_default(),
    }))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
}

/// Log in to an existing account.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let user = state
        .user_service
        .authenticate(&req.username, &req.password)
        .await?;

    Ok(ApiResponse::ok(LoginResponse {
        token: user.token.unwrap_or_default(),
        user_id: user.id,
        username: user.username,
    }))
}

/// Profile update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Update the caller's profile fields.
async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let input = UpdateProfileInput {
        bio: req.bio,
        avatar_url: req.avatar_url,
    };

    let user = state.user_service.update_profile(&user.id, input).await?;

    Ok(ApiResponse::ok(ProfileResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        bio: user.bio,
        avatar_url: user.avatar_url,
    }))
}

/// Detail message response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
    pub detail: String,
}

/// Follow a user.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<DetailResponse>> {
    // 404 on unknown target before anything else
    let target = state.user_service.get(&user_id).await?;

    state.following_service.follow(&user.id, &target.id).await?;

    Ok(ApiResponse::ok(DetailResponse {
        detail: format!("You are now following {}", target.username),
    }))
}

/// Unfollow a user.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<DetailResponse>> {
    let target = state.user_service.get(&user_id).await?;

    state
        .following_service
        .unfollow(&user.id, &target.id)
        .await?;

    Ok(ApiResponse::ok(DetailResponse {
        detail: format!("You have unfollowed {}", target.username),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", put(update_profile))
        .route("/follow/{user_id}", post(follow))
        .route("/unfollow/{user_id}", post(unfollow))
}
