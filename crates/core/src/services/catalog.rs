//! Catalog service (authors and books demo).

use chrono::Datelike;
use linnet_common::{AppError, AppResult, IdGenerator};
use linnet_db::{
    entities::{author, book},
    repositories::{AuthorRepository, BookRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// An author together with their books.
#[derive(Debug, Clone)]
pub struct AuthorWithBooks {
    /// The author.
    pub author: author::Model,
    /// All books by this author, in title order.
    pub books: Vec<book::Model>,
}

/// Input for creating a book.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub publication_year: i32,

    pub author_id: String,
}

/// Input for updating a book.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBookInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub publication_year: Option<i32>,

    pub author_id: Option<String>,
}

/// Catalog service for business logic.
#[derive(Clone)]
pub struct CatalogService {
    author_repo: AuthorRepository,
    book_repo: BookRepository,
    id_gen: IdGenerator,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(author_repo: AuthorRepository, book_repo: BookRepository) -> Self {
        Self {
            author_repo,
            book_repo,
            id_gen: IdGenerator::new(),
        }
    }

    // ==================== Authors ====================

    /// Create a new author.
    pub async fn create_author(&self, name: &str) -> AppResult<author::Model> {
        if name.is_empty() || name.len() > 200 {
            return Err(AppError::Validation(
                "name must be between 1 and 200 characters".to_string(),
            ));
        }

        let model = author::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.author_repo.create(model).await
    }

    /// Get an author with their books.
    pub async fn get_author(&self, id: &str) -> AppResult<AuthorWithBooks> {
        let author = self.author_repo.get_by_id(id).await?;
        let books = self.book_repo.find_by_author(id).await?;

        Ok(AuthorWithBooks { author, books })
    }

    /// List authors in name order.
    pub async fn list_authors(
        &self,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<author::Model>> {
        self.author_repo.list(limit, until_id).await
    }

    /// Rename an author.
    pub async fn update_author(&self, id: &str, name: &str) -> AppResult<author::Model> {
        if name.is_empty() || name.len() > 200 {
            return Err(AppError::Validation(
                "name must be between 1 and 200 characters".to_string(),
            ));
        }

        let author = self.author_repo.get_by_id(id).await?;
        let mut active: author::ActiveModel = author.into();
        active.name = Set(name.to_string());

        self.author_repo.update(active).await
    }

    /// Delete an author (and, via cascade, their books).
    pub async fn delete_author(&self, id: &str) -> AppResult<()> {
        self.author_repo.get_by_id(id).await?;
        self.author_repo.delete(id).await
    }

    // ==================== Books ====================

    /// Create a new book.
    ///
    /// The publication year must not be in the future.
    pub async fn create_book(&self, input: CreateBookInput) -> AppResult<book::Model> {
        input.validate()?;
        validate_publication_year(input.publication_year)?;

        // 404 on unknown author
        let author = self.author_repo.get_by_id(&input.author_id).await?;

        let model = book::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            publication_year: Set(input.publication_year),
            author_id: Set(author.id),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.book_repo.create(model).await
    }

    /// Get a book by ID.
    pub async fn get_book(&self, id: &str) -> AppResult<book::Model> {
        self.book_repo.get_by_id(id).await
    }

    /// List books with optional filters.
    pub async fn list_books(
        &self,
        limit: u64,
        until_id: Option<&str>,
        publication_year: Option<i32>,
        author_id: Option<&str>,
    ) -> AppResult<Vec<book::Model>> {
        self.book_repo
            .list(limit, until_id, publication_year, author_id)
            .await
    }

    /// Update a book. The same publication-year rule applies.
    pub async fn update_book(&self, id: &str, input: UpdateBookInput) -> AppResult<book::Model> {
        input.validate()?;

        let book = self.book_repo.get_by_id(id).await?;
        let mut active: book::ActiveModel = book.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(year) = input.publication_year {
            validate_publication_year(year)?;
            active.publication_year = Set(year);
        }
        if let Some(author_id) = input.author_id {
            self.author_repo.get_by_id(&author_id).await?;
            active.author_id = Set(author_id);
        }

        self.book_repo.update(active).await
    }

    /// Delete a book.
    pub async fn delete_book(&self, id: &str) -> AppResult<()> {
        self.book_repo.get_by_id(id).await?;
        self.book_repo.delete(id).await
    }
}

/// Reject publication years later than the current calendar year.
fn validate_publication_year(year: i32) -> AppResult<()> {
    let current_year = chrono::Utc::now().year();
    if year > current_year {
        return Err(AppError::Validation(format!(
            "publication_year cannot be in the future (got {year}, current year is {current_year})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_author(id: &str, name: &str) -> author::Model {
        author::Model {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_book(id: &str, title: &str, year: i32, author_id: &str) -> book::Model {
        book::Model {
            id: id.to_string(),
            title: title.to_string(),
            publication_year: year,
            author_id: author_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service_with(
        author_db: Arc<sea_orm::DatabaseConnection>,
        book_db: Arc<sea_orm::DatabaseConnection>,
    ) -> CatalogService {
        CatalogService::new(AuthorRepository::new(author_db), BookRepository::new(book_db))
    }

    #[test]
    fn test_publication_year_current_year_passes() {
        let current_year = Utc::now().year();
        assert!(validate_publication_year(current_year).is_ok());
        assert!(validate_publication_year(current_year - 30).is_ok());
    }

    #[test]
    fn test_publication_year_next_year_fails() {
        let next_year = Utc::now().year() + 1;
        let result = validate_publication_year(next_year);

        assert!(result.is_err());
        match result {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("publication_year"));
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_create_book_in_the_future_fails_before_store_access() {
        // No query results appended: any store access would fail the test
        let author_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let book_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(author_db, book_db);
        let result = service
            .create_book(CreateBookInput {
                title: "From the Future".to_string(),
                publication_year: Utc::now().year() + 1,
                author_id: "a1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_book_unknown_author_fails() {
        let author_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<author::Model>::new()])
                .into_connection(),
        );
        let book_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(author_db, book_db);
        let result = service
            .create_book(CreateBookInput {
                title: "Orphan".to_string(),
                publication_year: 2001,
                author_id: "ghost".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_book_current_year_succeeds() {
        let year = Utc::now().year();
        let author_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_author("a1", "Ada Lovelace")]])
                .into_connection(),
        );
        let book_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_book("b1", "Fresh Ink", year, "a1")]])
                .into_connection(),
        );

        let service = service_with(author_db, book_db);
        let book = service
            .create_book(CreateBookInput {
                title: "Fresh Ink".to_string(),
                publication_year: year,
                author_id: "a1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(book.publication_year, year);
    }

    #[tokio::test]
    async fn test_get_author_with_books() {
        let author_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_author("a1", "Ada Lovelace")]])
                .into_connection(),
        );
        let book_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_book("b1", "Notes", 1843, "a1"),
                    create_test_book("b2", "Sketches", 1842, "a1"),
                ]])
                .into_connection(),
        );

        let service = service_with(author_db, book_db);
        let result = service.get_author("a1").await.unwrap();

        assert_eq!(result.author.name, "Ada Lovelace");
        assert_eq!(result.books.len(), 2);
    }
}
