//! Book repository (catalog).

use std::sync::Arc;

use crate::entities::{book, Book};
use linnet_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Book repository for database operations.
#[derive(Clone)]
pub struct BookRepository {
    db: Arc<DatabaseConnection>,
}

impl BookRepository {
    /// Create a new book repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a book by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<book::Model>> {
        Book::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a book by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<book::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {id}")))
    }

    /// Create a new book.
    pub async fn create(&self, model: book::ActiveModel) -> AppResult<book::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a book.
    pub async fn update(&self, model: book::ActiveModel) -> AppResult<book::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a book.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Book::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get all books by an author in title order.
    pub async fn find_by_author(&self, author_id: &str) -> AppResult<Vec<book::Model>> {
        Book::find()
            .filter(book::Column::AuthorId.eq(author_id))
            .order_by_asc(book::Column::Title)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List books with optional publication-year and author filters.
    pub async fn list(
        &self,
        limit: u64,
        until_id: Option<&str>,
        publication_year: Option<i32>,
        author_id: Option<&str>,
    ) -> AppResult<Vec<book::Model>> {
        let mut query = Book::find().order_by_asc(book::Column::Title);

        if let Some(id) = until_id {
            query = query.filter(book::Column::Id.gt(id));
        }

        if let Some(year) = publication_year {
            query = query.filter(book::Column::PublicationYear.eq(year));
        }

        if let Some(author) = author_id {
            query = query.filter(book::Column::AuthorId.eq(author));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_book(id: &str, title: &str, year: i32, author_id: &str) -> book::Model {
        book::Model {
            id: id.to_string(),
            title: title.to_string(),
            publication_year: year,
            author_id: author_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_author() {
        let b1 = create_test_book("b1", "A Tale", 1998, "a1");
        let b2 = create_test_book("b2", "Brighter", 2003, "a1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[b1, b2]])
                .into_connection(),
        );

        let repo = BookRepository::new(db);
        let result = repo.find_by_author("a1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "A Tale");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<book::Model>::new()])
                .into_connection(),
        );

        let repo = BookRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(result.is_err());
    }
}
