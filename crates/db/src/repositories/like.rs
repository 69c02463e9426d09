//! Like repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{like, Like};
use linnet_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QuerySelect,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and post.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        post_id: &str,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has liked a post.
    pub async fn has_liked(&self, user_id: &str, post_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(user_id, post_id).await?.is_some())
    }

    /// Create a new like.
    pub async fn create(&self, model: like::ActiveModel) -> AppResult<like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a like by pair. Returns whether a like was removed.
    pub async fn delete_by_pair(&self, user_id: &str, post_id: &str) -> AppResult<bool> {
        let existing = self.find_by_pair(user_id, post_id).await?;
        if let Some(l) = existing {
            l.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Count likes for a post.
    pub async fn count_for_post(&self, post_id: &str) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes for several posts in one grouped query.
    ///
    /// Posts without likes are absent from the returned map.
    pub async fn count_for_posts(&self, post_ids: &[String]) -> AppResult<HashMap<String, i64>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(String, i64)> = Like::find()
            .select_only()
            .column(like::Column::PostId)
            .column_as(like::Column::Id.count(), "total")
            .filter(like::Column::PostId.is_in(post_ids.to_vec()))
            .group_by(like::Column::PostId)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn create_test_like(id: &str, user_id: &str, post_id: &str) -> like::Model {
        like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            post_id: post_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_has_liked_true() {
        let like = create_test_like("l1", "user1", "post1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert!(repo.has_liked("user1", "post1").await.unwrap());
    }

    #[tokio::test]
    async fn test_has_liked_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<like::Model>::new()])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert!(!repo.has_liked("user1", "post1").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_pair_missing_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<like::Model>::new()])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let removed = repo.delete_by_pair("user1", "post1").await.unwrap();

        assert!(!removed);
    }

    #[tokio::test]
    async fn test_count_for_posts_empty_input() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = LikeRepository::new(db);
        let counts = repo.count_for_posts(&[]).await.unwrap();

        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn test_count_for_posts_grouped() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    btreemap! {
                        "post_id" => Value::from("post1"),
                        "total" => Value::from(2i64),
                    },
                    btreemap! {
                        "post_id" => Value::from("post2"),
                        "total" => Value::from(1i64),
                    },
                ]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let counts = repo
            .count_for_posts(&["post1".to_string(), "post2".to_string()])
            .await
            .unwrap();

        assert_eq!(counts.get("post1"), Some(&2));
        assert_eq!(counts.get("post2"), Some(&1));
    }
}
