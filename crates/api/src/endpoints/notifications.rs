//! Notification endpoints.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};
use linnet_common::AppResult;
use linnet_db::entities::notification::{self, NotificationVerb, TargetType};
use serde::{Deserialize, Serialize};

use crate::{endpoints, extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Notification list query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsQuery {
    #[serde(default = "endpoints::default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
    /// Only unread notifications.
    #[serde(default)]
    pub unread_only: bool,
}

/// Notification response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub actor_id: String,
    /// Actor's username, when the account still exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub verb: String,
    pub target_type: String,
    pub target_id: String,
    pub unread: bool,
    pub created_at: String,
}

const fn verb_to_string(verb: &NotificationVerb) -> &'static str {
    match verb {
        NotificationVerb::Followed => "followed you",
        NotificationVerb::LikedPost => "liked your post",
        NotificationVerb::CommentedPost => "commented on your post",
    }
}

const fn target_type_to_string(target_type: &TargetType) -> &'static str {
    match target_type {
        TargetType::User => "user",
        TargetType::Post => "post",
    }
}

fn to_response(
    n: notification::Model,
    usernames: &HashMap<String, String>,
) -> NotificationResponse {
    NotificationResponse {
        id: n.id,
        actor: usernames.get(&n.actor_id).cloned(),
        actor_id: n.actor_id,
        verb: verb_to_string(&n.verb).to_string(),
        target_type: target_type_to_string(&n.target_type).to_string(),
        target_id: n.target_id,
        unread: !n.is_read,
        created_at: n.created_at.to_rfc3339(),
    }
}

/// Get notifications for the authenticated caller, newest first.
async fn list_notifications(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> AppResult<ApiResponse<Vec<NotificationResponse>>> {
    let limit = endpoints::clamp_limit(query.limit);
    let notifications = state
        .notification_service
        .list(&user.id, limit, query.until_id.as_deref(), query.unread_only)
        .await?;

    // Resolve actor usernames for this page
    let mut actor_ids: Vec<String> = notifications.iter().map(|n| n.actor_id.clone()).collect();
    actor_ids.sort();
    actor_ids.dedup();

    let usernames: HashMap<String, String> = state
        .user_service
        .get_many(&actor_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    Ok(ApiResponse::ok(
        notifications
            .into_iter()
            .map(|n| to_response(n, &usernames))
            .collect(),
    ))
}

/// Unread count response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// Get the unread notification count.
async fn unread_count(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UnreadCountResponse>> {
    let count = state.notification_service.count_unread(&user.id).await?;
    Ok(ApiResponse::ok(UnreadCountResponse { count }))
}

/// Mark a notification as read.
async fn mark_as_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.notification_service.mark_as_read(&user.id, &id).await?;
    Ok(ApiResponse::ok(()))
}

/// Mark all as read response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllAsReadResponse {
    pub count: u64,
}

/// Mark all notifications as read.
async fn mark_all_as_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MarkAllAsReadResponse>> {
    let count = state.notification_service.mark_all_as_read(&user.id).await?;
    Ok(ApiResponse::ok(MarkAllAsReadResponse { count }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/{id}/read", post(mark_as_read))
        .route("/read-all", post(mark_all_as_read))
}
