//! Create book table migration (catalog).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Book::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Book::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Book::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Book::PublicationYear).integer().not_null())
                    .col(ColumnDef::new(Book::AuthorId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Book::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_author")
                            .from(Book::Table, Book::AuthorId)
                            .to(Author::Table, Author::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: author_id (for nested book listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_book_author_id")
                    .table(Book::Table)
                    .col(Book::AuthorId)
                    .to_owned(),
            )
            .await?;

        // Index: publication_year (filterable field)
        manager
            .create_index(
                Index::create()
                    .name("idx_book_publication_year")
                    .table(Book::Table)
                    .col(Book::PublicationYear)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Book::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Book {
    Table,
    Id,
    Title,
    PublicationYear,
    AuthorId,
    CreatedAt,
}

#[derive(Iden)]
enum Author {
    Table,
    Id,
}
