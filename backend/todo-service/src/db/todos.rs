//! Todo database operations for todo-service
//!
//! Writes run inside a transaction and return the row as stored.

use super::TodoRepository;
use crate::error::Result;
use crate::models::{NewTodo, Todo, TodoUpdate};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Postgres-backed [`TodoRepository`]
#[derive(Debug, Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, description, completed, user_id, created_at, updated_at
            FROM todos
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = todos.len(), "Fetched todos");
        Ok(todos)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, description, completed, user_id, created_at, updated_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, description, completed, user_id, created_at, updated_at
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(user_id = %user_id, count = todos.len(), "Fetched todos for user");
        Ok(todos)
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (description, completed, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, description, completed, user_id, created_at, updated_at
            "#,
        )
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(todo_id = %created.id, user_id = %created.user_id, "Created todo");
        Ok(created)
    }

    async fn update(&self, update: TodoUpdate) -> Result<Option<Todo>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET description = $2, completed = $3, user_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, description, completed, user_id, created_at, updated_at
            "#,
        )
        .bind(update.id)
        .bind(&update.description)
        .bind(update.completed)
        .bind(update.user_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        if let Some(todo) = &updated {
            tracing::info!(todo_id = %todo.id, "Updated todo");
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(todo_id = %id, "Deleted todo");
        }
        Ok(deleted)
    }
}
