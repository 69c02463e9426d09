//! Notification service.
//!
//! Notifications are an append-only ledger written as a side effect of
//! follow, like and comment actions. Clients never create them directly.

use linnet_common::{AppResult, IdGenerator};
use linnet_db::{
    entities::notification::{self, NotificationVerb, TargetType},
    repositories::NotificationRepository,
};
use sea_orm::Set;

/// What a notification points at.
#[derive(Debug, Clone)]
pub enum NotificationTarget {
    /// A user profile (e.g. the actor of a follow).
    User(String),
    /// A post (e.g. the post that was liked or commented on).
    Post(String),
}

impl NotificationTarget {
    fn into_parts(self) -> (TargetType, String) {
        match self {
            Self::User(id) => (TargetType::User, id),
            Self::Post(id) => (TargetType::Post, id),
        }
    }
}

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append a notification to the ledger.
    ///
    /// Self-referential actions never notify: when the recipient is the
    /// actor this returns `Ok(None)` without touching the store.
    pub async fn append(
        &self,
        recipient_id: &str,
        actor_id: &str,
        verb: NotificationVerb,
        target: NotificationTarget,
    ) -> AppResult<Option<notification::Model>> {
        if recipient_id == actor_id {
            return Ok(None);
        }

        let (target_type, target_id) = target.into_parts();
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            recipient_id: Set(recipient_id.to_string()),
            actor_id: Set(actor_id.to_string()),
            verb: Set(verb),
            target_type: Set(target_type),
            target_id: Set(target_id),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        let notification = self.notification_repo.create(model).await?;
        tracing::debug!(
            notification_id = %notification.id,
            recipient_id = %recipient_id,
            actor_id = %actor_id,
            "Appended notification"
        );

        Ok(Some(notification))
    }

    /// Get notifications for a user, newest first.
    pub async fn list(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
        unread_only: bool,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_recipient(user_id, limit, until_id, unread_only)
            .await
    }

    /// Mark a notification as read.
    ///
    /// Notifications belonging to another user are left untouched.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        let notification = self.notification_repo.find_by_id(notification_id).await?;
        if let Some(n) = notification
            && n.recipient_id == user_id
        {
            self.notification_repo.mark_as_read(notification_id).await?;
        }
        Ok(())
    }

    /// Mark all notifications as read for a user.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }
}
