use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Task record owned by a user
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub description: String,
    pub completed: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a todo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub description: String,
    pub completed: bool,
    pub user_id: Uuid,
}

/// Full replacement of a todo's mutable fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub id: Uuid,
    pub description: String,
    pub completed: bool,
    pub user_id: Uuid,
}
