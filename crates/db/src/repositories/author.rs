//! Author repository (catalog).

use std::sync::Arc;

use crate::entities::{author, Author};
use linnet_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Author repository for database operations.
#[derive(Clone)]
pub struct AuthorRepository {
    db: Arc<DatabaseConnection>,
}

impl AuthorRepository {
    /// Create a new author repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an author by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<author::Model>> {
        Author::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an author by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<author::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {id}")))
    }

    /// Create a new author.
    pub async fn create(&self, model: author::ActiveModel) -> AppResult<author::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an author.
    pub async fn update(&self, model: author::ActiveModel) -> AppResult<author::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an author.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Author::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List authors ordered by name (paginated by cursor).
    pub async fn list(&self, limit: u64, until_id: Option<&str>) -> AppResult<Vec<author::Model>> {
        let mut query = Author::find().order_by_asc(author::Column::Name);

        if let Some(id) = until_id {
            query = query.filter(author::Column::Id.gt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
