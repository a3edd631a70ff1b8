//! Database operations for todo service
//!
//! Handlers depend on the repository traits, not on Postgres, so they can be
//! driven by any store that honors the same contract.

pub mod credentials;
pub mod todos;
pub mod users;

use crate::error::Result;
use crate::models::{NewTodo, Todo, TodoUpdate, User};
use async_trait::async_trait;
use uuid::Uuid;

pub use credentials::PgCredentialVerifier;
pub use todos::PgTodoRepository;
pub use users::PgUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, oldest first
    async fn list(&self) -> Result<Vec<User>>;
}

#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// All todos, oldest first
    async fn list(&self) -> Result<Vec<Todo>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>>;

    /// Todos owned by `user_id`, oldest first
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Todo>>;

    async fn create(&self, todo: NewTodo) -> Result<Todo>;

    /// Returns `None` when no todo has `update.id`
    async fn update(&self, update: TodoUpdate) -> Result<Option<Todo>>;

    /// Returns `false` when no todo has `id`
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
