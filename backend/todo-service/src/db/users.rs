//! User database operations for todo-service
use super::UserRepository;
use crate::error::Result;
use crate::models::User;
use async_trait::async_trait;
use sqlx::PgPool;

/// Postgres-backed [`UserRepository`]
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, created_at, updated_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = users.len(), "Fetched users");
        Ok(users)
    }
}
