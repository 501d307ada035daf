//! Authors repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor, UpdateAuthor},
};

use super::AuthorsStore;

#[derive(Clone)]
pub struct PgAuthorsStore {
    pool: Pool<Postgres>,
}

impl PgAuthorsStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorsStore for PgAuthorsStore {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, given_name, family_name, nationality, birth_date, biography, photo_ref
            FROM authors
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, given_name, family_name, nationality, birth_date, biography, photo_ref
            FROM authors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn insert(&self, author: &CreateAuthor, photo_ref: Option<&str>) -> AppResult<Author> {
        let created = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (given_name, family_name, nationality, birth_date, biography, photo_ref)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, given_name, family_name, nationality, birth_date, biography, photo_ref
            "#,
        )
        .bind(&author.given_name)
        .bind(&author.family_name)
        .bind(&author.nationality)
        .bind(author.birth_date)
        .bind(&author.biography)
        .bind(photo_ref)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        changes: &UpdateAuthor,
        photo_ref: Option<&str>,
    ) -> AppResult<Option<Author>> {
        let updated = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors SET
                given_name = COALESCE($2, given_name),
                family_name = COALESCE($3, family_name),
                nationality = COALESCE($4, nationality),
                birth_date = COALESCE($5, birth_date),
                biography = COALESCE($6, biography),
                photo_ref = COALESCE($7, photo_ref)
            WHERE id = $1
            RETURNING id, given_name, family_name, nationality, birth_date, biography, photo_ref
            "#,
        )
        .bind(id)
        .bind(&changes.given_name)
        .bind(&changes.family_name)
        .bind(&changes.nationality)
        .bind(changes.birth_date)
        .bind(&changes.biography)
        .bind(photo_ref)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        // Dependent books are removed by ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
