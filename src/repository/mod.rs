//! Repository layer for database operations.
//!
//! Each entity is accessed through a store trait so services can be
//! exercised against in-memory fakes; the PostgreSQL implementations
//! live in the per-entity modules.

pub mod authors;
pub mod books;
pub mod users;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{
        author::{Author, CreateAuthor, UpdateAuthor},
        book::{BookWithAuthor, CreateBook, UpdateBook},
        user::User,
    },
};

/// Author persistence operations
#[async_trait]
pub trait AuthorsStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Author>>;
    async fn get(&self, id: i32) -> AppResult<Option<Author>>;
    async fn exists(&self, id: i32) -> AppResult<bool>;
    async fn insert(&self, author: &CreateAuthor, photo_ref: Option<&str>) -> AppResult<Author>;
    async fn update(
        &self,
        id: i32,
        changes: &UpdateAuthor,
        photo_ref: Option<&str>,
    ) -> AppResult<Option<Author>>;
    /// Delete an author; dependent books are removed by the cascade.
    /// Returns false when the id does not exist.
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// Book persistence operations. Reads are joined with the author row to
/// carry the denormalized name fields.
#[async_trait]
pub trait BooksStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<BookWithAuthor>>;
    async fn get(&self, id: i32) -> AppResult<Option<BookWithAuthor>>;
    async fn insert(
        &self,
        book: &CreateBook,
        cover_ref: Option<&str>,
        document_ref: Option<&str>,
    ) -> AppResult<BookWithAuthor>;
    async fn update(
        &self,
        id: i32,
        changes: &UpdateBook,
        cover_ref: Option<&str>,
        document_ref: Option<&str>,
    ) -> AppResult<Option<BookWithAuthor>>;
    async fn delete(&self, id: i32) -> AppResult<bool>;
    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool>;
}

/// Credential store lookups used by the authenticator
#[async_trait]
pub trait UsersStore: Send + Sync {
    /// Find the first active user whose email or username equals the
    /// identifier, case-insensitively.
    async fn find_active_by_identifier(&self, identifier: &str) -> AppResult<Option<User>>;
}

/// Container bundling the per-entity stores
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorsStore>,
    pub books: Arc<dyn BooksStore>,
    pub users: Arc<dyn UsersStore>,
}

impl Repository {
    /// Create a repository backed by the given PostgreSQL pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::PgAuthorsStore::new(pool.clone())),
            books: Arc::new(books::PgBooksStore::new(pool.clone())),
            users: Arc::new(users::PgUsersStore::new(pool)),
        }
    }
}
