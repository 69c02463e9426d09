//! Following service.

use crate::services::notification::{NotificationService, NotificationTarget};
use linnet_common::{AppError, AppResult, IdGenerator};
use linnet_db::{
    entities::{following, notification::NotificationVerb},
    repositories::{FollowingRepository, UserRepository},
};
use sea_orm::Set;

/// Result of a follow operation.
#[derive(Debug, PartialEq, Eq)]
pub enum FollowOutcome {
    /// A new follow edge was created.
    Followed,
    /// The edge already existed; nothing changed.
    AlreadyFollowing,
}

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowingService {
    following_repo: FollowingRepository,
    user_repo: UserRepository,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub const fn new(
        following_repo: FollowingRepository,
        user_repo: UserRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            following_repo,
            user_repo,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a user.
    ///
    /// Idempotent: following someone twice leaves a single edge and a
    /// single notification. Following yourself is rejected.
    pub async fn follow(&self, actor_id: &str, target_id: &str) -> AppResult<FollowOutcome> {
        if actor_id == target_id {
            return Err(AppError::BadRequest(
                "You can't follow yourself".to_string(),
            ));
        }

        // 404 on unknown target
        let target = self.user_repo.get_by_id(target_id).await?;

        if self.following_repo.is_following(actor_id, target_id).await? {
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        let model = following::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(actor_id.to_string()),
            followee_id: Set(target.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.following_repo.create(model).await?;

        // Only a newly created edge notifies the followee
        self.notifications
            .append(
                &target.id,
                actor_id,
                NotificationVerb::Followed,
                NotificationTarget::User(actor_id.to_string()),
            )
            .await?;

        Ok(FollowOutcome::Followed)
    }

    /// Unfollow a user.
    ///
    /// Idempotent: removing a missing edge is a reported no-op. Previously
    /// generated notifications are never retracted.
    pub async fn unfollow(&self, actor_id: &str, target_id: &str) -> AppResult<()> {
        // 404 on unknown target
        self.user_repo.get_by_id(target_id).await?;

        self.following_repo
            .delete_by_pair(actor_id, target_id)
            .await
    }

    /// Check if a user is following another.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        self.following_repo
            .is_following(follower_id, followee_id)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use linnet_db::entities::user;
    use linnet_db::repositories::NotificationRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            token: Some("test_token".to_string()),
            bio: None,
            avatar_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_following(id: &str, follower_id: &str, followee_id: &str) -> following::Model {
        following::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            followee_id: followee_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service_with(
        following_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
        notification_db: Arc<sea_orm::DatabaseConnection>,
    ) -> FollowingService {
        FollowingService::new(
            FollowingRepository::new(following_db),
            UserRepository::new(user_db),
            NotificationService::new(NotificationRepository::new(notification_db)),
        )
    }

    #[tokio::test]
    async fn test_follow_yourself_returns_error() {
        let db1 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let db3 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(db1, db2, db3);
        let result = service.follow("user1", "user1").await;

        assert!(result.is_err());
        match result {
            Err(AppError::BadRequest(msg)) => {
                assert!(msg.contains("follow yourself"));
            }
            _ => panic!("Expected BadRequest error"),
        }
    }

    #[tokio::test]
    async fn test_follow_unknown_target_returns_not_found() {
        let db1 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let db2 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let db3 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(db1, db2, db3);
        let result = service.follow("user1", "ghost").await;

        assert!(result.is_err());
        match result {
            Err(AppError::UserNotFound(id)) => assert_eq!(id, "ghost"),
            _ => panic!("Expected UserNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_follow_twice_is_reported_noop() {
        let existing = create_test_following("f1", "user1", "user2");

        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user2", "bob")]])
                .into_connection(),
        );
        // Notification store untouched: a second notification would fail here
        let notification_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(following_db, user_db, notification_db);
        let outcome = service.follow("user1", "user2").await.unwrap();

        assert_eq!(outcome, FollowOutcome::AlreadyFollowing);
    }

    #[tokio::test]
    async fn test_follow_creates_edge_and_notification() {
        let created = create_test_following("f1", "alice", "bob");

        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // is_following lookup, then the insert
                .append_query_results([Vec::<following::Model>::new()])
                .append_query_results([[created]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("bob", "bob")]])
                .into_connection(),
        );
        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[linnet_db::entities::notification::Model {
                    id: "n1".to_string(),
                    recipient_id: "bob".to_string(),
                    actor_id: "alice".to_string(),
                    verb: NotificationVerb::Followed,
                    target_type: linnet_db::entities::notification::TargetType::User,
                    target_id: "alice".to_string(),
                    is_read: false,
                    created_at: Utc::now().into(),
                }]])
                .into_connection(),
        );

        let service = service_with(following_db, user_db, notification_db);
        let outcome = service.follow("alice", "bob").await.unwrap();

        assert_eq!(outcome, FollowOutcome::Followed);
    }

    #[tokio::test]
    async fn test_unfollow_missing_edge_is_noop() {
        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<following::Model>::new()])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user2", "bob")]])
                .into_connection(),
        );
        let notification_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(following_db, user_db, notification_db);
        service.unfollow("user1", "user2").await.unwrap();
    }
}
