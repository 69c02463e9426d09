//! Like service.

use crate::services::notification::{NotificationService, NotificationTarget};
use linnet_common::{AppResult, IdGenerator};
use linnet_db::{
    entities::{like, notification::NotificationVerb},
    repositories::{LikeRepository, PostRepository},
};
use sea_orm::Set;

/// Result of a like operation.
#[derive(Debug, PartialEq, Eq)]
pub enum LikeOutcome {
    /// A new like was recorded.
    Liked,
    /// The user had already liked the post; nothing changed.
    AlreadyLiked,
}

/// Result of an unlike operation.
#[derive(Debug, PartialEq, Eq)]
pub enum UnlikeOutcome {
    /// An existing like was removed.
    Unliked,
    /// There was no like to remove.
    NotLiked,
}

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    post_repo: PostRepository,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        like_repo: LikeRepository,
        post_repo: PostRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            like_repo,
            post_repo,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like a post.
    ///
    /// Idempotent: the first call records the like and notifies the post
    /// author (unless they liked their own post); repeat calls change
    /// nothing and report `AlreadyLiked`.
    pub async fn like(&self, user_id: &str, post_id: &str) -> AppResult<LikeOutcome> {
        // 404 on unknown post
        let post = self.post_repo.get_by_id(post_id).await?;

        if self.like_repo.has_liked(user_id, post_id).await? {
            return Ok(LikeOutcome::AlreadyLiked);
        }

        let model = like::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            post_id: Set(post.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.like_repo.create(model).await?;

        // append() skips the notification when the liker is the author
        self.notifications
            .append(
                &post.user_id,
                user_id,
                NotificationVerb::LikedPost,
                NotificationTarget::Post(post.id),
            )
            .await?;

        Ok(LikeOutcome::Liked)
    }

    /// Unlike a post.
    ///
    /// Removing a like that does not exist is a reported no-op.
    pub async fn unlike(&self, user_id: &str, post_id: &str) -> AppResult<UnlikeOutcome> {
        // 404 on unknown post
        self.post_repo.get_by_id(post_id).await?;

        let removed = self.like_repo.delete_by_pair(user_id, post_id).await?;
        Ok(if removed {
            UnlikeOutcome::Unliked
        } else {
            UnlikeOutcome::NotLiked
        })
    }

    /// Count likes for a post.
    pub async fn count_for_post(&self, post_id: &str) -> AppResult<u64> {
        self.like_repo.count_for_post(post_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use linnet_common::AppError;
    use linnet_db::entities::{notification, post};
    use linnet_db::repositories::NotificationRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_post(id: &str, user_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Test post".to_string(),
            content: "Hello world".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_like(id: &str, user_id: &str, post_id: &str) -> like::Model {
        like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            post_id: post_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service_with(
        like_db: Arc<sea_orm::DatabaseConnection>,
        post_db: Arc<sea_orm::DatabaseConnection>,
        notification_db: Arc<sea_orm::DatabaseConnection>,
    ) -> LikeService {
        LikeService::new(
            LikeRepository::new(like_db),
            PostRepository::new(post_db),
            NotificationService::new(NotificationRepository::new(notification_db)),
        )
    }

    #[tokio::test]
    async fn test_like_unknown_post_returns_not_found() {
        let like_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );
        let notification_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(like_db, post_db, notification_db);
        let result = service.like("alice", "missing").await;

        assert!(result.is_err());
        match result {
            Err(AppError::PostNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected PostNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_like_twice_reports_already_liked() {
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_like("l1", "alice", "p1")]])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", "bob")]])
                .into_connection(),
        );
        // Notification store untouched: a second notification would fail here
        let notification_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(like_db, post_db, notification_db);
        let outcome = service.like("alice", "p1").await.unwrap();

        assert_eq!(outcome, LikeOutcome::AlreadyLiked);
    }

    #[tokio::test]
    async fn test_like_creates_like_and_notification() {
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // has_liked lookup, then the insert
                .append_query_results([Vec::<like::Model>::new()])
                .append_query_results([[create_test_like("l1", "alice", "p1")]])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", "bob")]])
                .into_connection(),
        );
        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[notification::Model {
                    id: "n1".to_string(),
                    recipient_id: "bob".to_string(),
                    actor_id: "alice".to_string(),
                    verb: NotificationVerb::LikedPost,
                    target_type: notification::TargetType::Post,
                    target_id: "p1".to_string(),
                    is_read: false,
                    created_at: Utc::now().into(),
                }]])
                .into_connection(),
        );

        let service = service_with(like_db, post_db, notification_db);
        let outcome = service.like("alice", "p1").await.unwrap();

        assert_eq!(outcome, LikeOutcome::Liked);
    }

    #[tokio::test]
    async fn test_like_own_post_skips_notification() {
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<like::Model>::new()])
                .append_query_results([[create_test_like("l1", "bob", "p1")]])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", "bob")]])
                .into_connection(),
        );
        // Untouched: liking your own post must not notify
        let notification_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(like_db, post_db, notification_db);
        let outcome = service.like("bob", "p1").await.unwrap();

        assert_eq!(outcome, LikeOutcome::Liked);
    }

    #[tokio::test]
    async fn test_unlike_without_like_is_noop() {
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<like::Model>::new()])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", "bob")]])
                .into_connection(),
        );
        let notification_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(like_db, post_db, notification_db);
        let outcome = service.unlike("alice", "p1").await.unwrap();

        assert_eq!(outcome, UnlikeOutcome::NotLiked);
    }
}
