//! Comment service.

use crate::services::notification::{NotificationService, NotificationTarget};
use linnet_common::{AppError, AppResult, IdGenerator};
use linnet_db::{
    entities::{comment, notification::NotificationVerb},
    repositories::{CommentRepository, PostRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1))]
    pub content: String,
}

/// Input for updating a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentInput {
    #[validate(length(min = 1))]
    pub content: String,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a comment on a post and notify the post's author
    /// (unless they commented on their own post).
    pub async fn create(
        &self,
        author_id: &str,
        post_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        // 404 on unknown post
        let post = self.post_repo.get_by_id(post_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(author_id.to_string()),
            post_id: Set(post.id.clone()),
            content: Set(input.content),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let comment = self.comment_repo.create(model).await?;

        // append() skips the notification when the commenter is the author
        self.notifications
            .append(
                &post.user_id,
                author_id,
                NotificationVerb::CommentedPost,
                NotificationTarget::Post(post.id),
            )
            .await?;

        Ok(comment)
    }

    /// List comments on a post in insertion order.
    pub async fn list(
        &self,
        post_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<comment::Model>> {
        // 404 on unknown post
        self.post_repo.get_by_id(post_id).await?;

        self.comment_repo.find_by_post(post_id, limit, until_id).await
    }

    /// Get a single comment scoped to its post.
    pub async fn get(&self, post_id: &str, id: &str) -> AppResult<comment::Model> {
        let comment = self
            .comment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {id}")))?;

        if comment.post_id != post_id {
            return Err(AppError::NotFound(format!("Comment {id}")));
        }

        Ok(comment)
    }

    /// Update a comment. Only the author may modify it.
    pub async fn update(
        &self,
        caller_id: &str,
        post_id: &str,
        id: &str,
        input: UpdateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let comment = self.get(post_id, id).await?;
        if comment.user_id != caller_id {
            return Err(AppError::Forbidden(
                "You can only modify your own comments".to_string(),
            ));
        }

        let mut active: comment::ActiveModel = comment.into();
        active.content = Set(input.content);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.comment_repo.update(active).await
    }

    /// Delete a comment. Only the author may delete it.
    pub async fn delete(&self, caller_id: &str, post_id: &str, id: &str) -> AppResult<()> {
        let comment = self.get(post_id, id).await?;
        if comment.user_id != caller_id {
            return Err(AppError::Forbidden(
                "You can only delete your own comments".to_string(),
            ));
        }

        self.comment_repo.delete(id).await
    }
}
