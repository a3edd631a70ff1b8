//! gRPC server module for todo-service
//!
//! Exports:
//! - AuthServiceHandler: login, the only method callable without a token
//! - UserServiceHandler / TodoServiceHandler: protected record services
//! - pb: Generated protobuf types from todo_service.proto

pub mod auth;
pub mod todos;
pub mod users;

use grpc_jwt_propagation::AuthenticatedContextExt;
use tonic::{Request, Status};

use crate::models;

pub use auth::AuthServiceHandler;
pub use todos::TodoServiceHandler;
pub use users::UserServiceHandler;

pub mod pb {
    tonic::include_proto!("pb");
}

/// Fully-qualified name of the method exempt from the access gate
pub const LOGIN_METHOD: &str = "/pb.AuthService/Login";

/// Subject attached to the call by the access gate
fn caller<T>(request: &Request<T>) -> Result<String, Status> {
    Ok(request.authenticated()?.subject().to_owned())
}

impl From<models::User> for pb::User {
    fn from(user: models::User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            created_at: user.created_at.timestamp(),
            updated_at: user.updated_at.timestamp(),
        }
    }
}

impl From<models::Todo> for pb::Todo {
    fn from(todo: models::Todo) -> Self {
        Self {
            id: todo.id.to_string(),
            description: todo.description,
            completed: todo.completed,
            user_id: todo.user_id.to_string(),
            created_at: todo.created_at.timestamp(),
            updated_at: todo.updated_at.timestamp(),
        }
    }
}
