//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{BookWithAuthor, CreateBook, UpdateBook},
};

use super::BooksStore;

const BOOK_COLUMNS: &str = r#"
    b.id, b.title, b.author_id, b.publisher, b.publication_year, b.isbn,
    b.category, b.language, b.copy_count, b.genre, b.page_count,
    b.synopsis, b.series, b.cover_ref, b.document_ref,
    a.given_name AS author_given_name, a.family_name AS author_family_name
"#;

#[derive(Clone)]
pub struct PgBooksStore {
    pool: Pool<Postgres>,
}

impl PgBooksStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BooksStore for PgBooksStore {
    async fn list(&self) -> AppResult<Vec<BookWithAuthor>> {
        let books = sqlx::query_as::<_, BookWithAuthor>(&format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books b
            JOIN authors a ON a.id = b.author_id
            ORDER BY b.id
            "#,
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn get(&self, id: i32) -> AppResult<Option<BookWithAuthor>> {
        let book = sqlx::query_as::<_, BookWithAuthor>(&format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books b
            JOIN authors a ON a.id = b.author_id
            WHERE b.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn insert(
        &self,
        book: &CreateBook,
        cover_ref: Option<&str>,
        document_ref: Option<&str>,
    ) -> AppResult<BookWithAuthor> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (
                title, author_id, publisher, publication_year, isbn, category,
                language, copy_count, genre, page_count, synopsis, series,
                cover_ref, document_ref
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(&book.publisher)
        .bind(book.publication_year)
        .bind(&book.isbn)
        .bind(&book.category)
        .bind(&book.language)
        .bind(book.copy_count)
        .bind(&book.genre)
        .bind(book.page_count)
        .bind(&book.synopsis)
        .bind(&book.series)
        .bind(cover_ref)
        .bind(document_ref)
        .fetch_one(&self.pool)
        .await?;

        self.get(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Book {} vanished after insert", id)))
    }

    async fn update(
        &self,
        id: i32,
        changes: &UpdateBook,
        cover_ref: Option<&str>,
        document_ref: Option<&str>,
    ) -> AppResult<Option<BookWithAuthor>> {
        let result = sqlx::query(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author_id = COALESCE($3, author_id),
                publisher = COALESCE($4, publisher),
                publication_year = COALESCE($5, publication_year),
                isbn = COALESCE($6, isbn),
                category = COALESCE($7, category),
                language = COALESCE($8, language),
                copy_count = COALESCE($9, copy_count),
                genre = COALESCE($10, genre),
                page_count = COALESCE($11, page_count),
                synopsis = COALESCE($12, synopsis),
                series = COALESCE($13, series),
                cover_ref = COALESCE($14, cover_ref),
                document_ref = COALESCE($15, document_ref)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(changes.author_id)
        .bind(&changes.publisher)
        .bind(changes.publication_year)
        .bind(&changes.isbn)
        .bind(&changes.category)
        .bind(&changes.language)
        .bind(changes.copy_count)
        .bind(&changes.genre)
        .bind(changes.page_count)
        .bind(&changes.synopsis)
        .bind(&changes.series)
        .bind(cover_ref)
        .bind(document_ref)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };

        Ok(exists)
    }
}
