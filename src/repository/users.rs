//! Users repository for credential store lookups

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::user::{User, UserRow},
};

use super::UsersStore;

#[derive(Clone)]
pub struct PgUsersStore {
    pool: Pool<Postgres>,
}

impl PgUsersStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsersStore for PgUsersStore {
    async fn find_active_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, role, is_active
            FROM users
            WHERE (LOWER(email) = LOWER($1) OR LOWER(username) = LOWER($1))
              AND is_active = TRUE
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }
}
