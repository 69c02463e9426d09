//! Post service.

use linnet_common::{AppError, AppResult, IdGenerator};
use linnet_db::{
    entities::post,
    repositories::{FollowingRepository, LikeRepository, PostRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// A post annotated with its current like count.
///
/// The count is computed from the like table per request, never stored.
#[derive(Debug, Clone)]
pub struct PostWithLikes {
    /// The post itself.
    pub post: post::Model,
    /// Number of likes at read time.
    pub likes_count: i64,
}

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,
}

/// Input for updating a post.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub content: Option<String>,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    following_repo: FollowingRepository,
    like_repo: LikeRepository,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        following_repo: FollowingRepository,
        like_repo: LikeRepository,
    ) -> Self {
        Self {
            post_repo,
            following_repo,
            like_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new post.
    pub async fn create(&self, author_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(author_id.to_string()),
            title: Set(input.title),
            content: Set(input.content),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.post_repo.create(model).await
    }

    /// Get a post by ID.
    pub async fn get(&self, id: &str) -> AppResult<post::Model> {
        self.post_repo.get_by_id(id).await
    }

    /// Get a post by ID with its like count.
    pub async fn get_with_likes(&self, id: &str) -> AppResult<PostWithLikes> {
        let post = self.post_repo.get_by_id(id).await?;
        let likes_count = self.like_repo.count_for_post(id).await?;

        Ok(PostWithLikes {
            post,
            likes_count: i64::try_from(likes_count).unwrap_or(i64::MAX),
        })
    }

    /// List posts, newest first, with an optional search term.
    pub async fn list(
        &self,
        limit: u64,
        until_id: Option<&str>,
        search: Option<&str>,
    ) -> AppResult<Vec<PostWithLikes>> {
        let posts = self.post_repo.list(limit, until_id, search).await?;
        self.annotate_with_likes(posts).await
    }

    /// Update a post. Only the author may modify it.
    pub async fn update(
        &self,
        caller_id: &str,
        id: &str,
        input: UpdatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;

        let post = self.post_repo.get_by_id(id).await?;
        if post.user_id != caller_id {
            return Err(AppError::Forbidden(
                "You can only modify your own posts".to_string(),
            ));
        }

        let mut active: post::ActiveModel = post.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.post_repo.update(active).await
    }

    /// Delete a post. Only the author may delete it.
    pub async fn delete(&self, caller_id: &str, id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(id).await?;
        if post.user_id != caller_id {
            return Err(AppError::Forbidden(
                "You can only delete your own posts".to_string(),
            ));
        }

        self.post_repo.delete(id).await
    }

    /// Compose the feed for a user: posts authored by accounts they
    /// follow (optionally including their own), newest first, annotated
    /// with like counts. Recomputed per request, no caching.
    pub async fn feed(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
        include_self: bool,
    ) -> AppResult<Vec<PostWithLikes>> {
        let mut author_ids = self.following_repo.find_followee_ids(user_id).await?;
        if include_self {
            author_ids.push(user_id.to_string());
        }

        let posts = self
            .post_repo
            .find_by_authors(&author_ids, limit, until_id)
            .await?;

        self.annotate_with_likes(posts).await
    }

    /// Annotate posts with like counts using one grouped query.
    async fn annotate_with_likes(&self, posts: Vec<post::Model>) -> AppResult<Vec<PostWithLikes>> {
        let ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();
        let counts = self.like_repo.count_for_posts(&ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| {
                let likes_count = counts.get(&post.id).copied().unwrap_or(0);
                PostWithLikes { post, likes_count }
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use linnet_db::entities::following;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::sync::Arc;

    fn create_test_post(id: &str, user_id: &str, title: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            content: "Hello world".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(
        post_db: Arc<sea_orm::DatabaseConnection>,
        following_db: Arc<sea_orm::DatabaseConnection>,
        like_db: Arc<sea_orm::DatabaseConnection>,
    ) -> PostService {
        PostService::new(
            PostRepository::new(post_db),
            FollowingRepository::new(following_db),
            LikeRepository::new(like_db),
        )
    }

    #[test]
    fn test_create_post_input_validation() {
        // Empty title
        let input = CreatePostInput {
            title: String::new(),
            content: "body".to_string(),
        };
        assert!(input.validate().is_err());

        // Empty content
        let input = CreatePostInput {
            title: "Title".to_string(),
            content: String::new(),
        };
        assert!(input.validate().is_err());

        // Valid
        let input = CreatePostInput {
            title: "Title".to_string(),
            content: "body".to_string(),
        };
        assert!(input.validate().is_ok());
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden() {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", "alice", "Mine")]])
                .into_connection(),
        );
        let following_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let like_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(post_db, following_db, like_db);
        let result = service
            .update(
                "mallory",
                "p1",
                UpdatePostInput {
                    title: Some("Stolen".to_string()),
                    content: None,
                },
            )
            .await;

        assert!(result.is_err());
        match result {
            Err(AppError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden error"),
        }
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_forbidden() {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", "alice", "Mine")]])
                .into_connection(),
        );
        let following_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let like_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(post_db, following_db, like_db);
        let result = service.delete("mallory", "p1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_feed_contains_followed_authors_posts() {
        let edge = following::Model {
            id: "f1".to_string(),
            follower_id: "alice".to_string(),
            followee_id: "bob".to_string(),
            created_at: Utc::now().into(),
        };

        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_post("p2", "bob", "Newer"),
                    create_test_post("p1", "bob", "Older"),
                ]])
                .into_connection(),
        );
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![btreemap! {
                    "post_id" => Value::from("p2"),
                    "total" => Value::from(3i64),
                }]])
                .into_connection(),
        );

        let service = service_with(post_db, following_db, like_db);
        let feed = service.feed("alice", 10, None, false).await.unwrap();

        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].post.id, "p2");
        assert_eq!(feed[0].likes_count, 3);
        assert_eq!(feed[1].likes_count, 0);
    }

    #[tokio::test]
    async fn test_feed_with_no_following_is_empty() {
        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<following::Model>::new()])
                .into_connection(),
        );
        // Post and like stores untouched: empty author set short-circuits
        let post_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let like_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(post_db, following_db, like_db);
        let feed = service.feed("alice", 10, None, false).await.unwrap();

        assert!(feed.is_empty());
    }
}
