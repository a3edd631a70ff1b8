use std::sync::Arc;
use std::time::Instant;
use tonic::{Request, Response, Status};
use tracing::info;

use super::caller;
use super::pb::user_service_server::UserService;
use super::pb::{Empty, UserList};
use crate::db::UserRepository;

/// UserService implementation
#[derive(Clone)]
pub struct UserServiceHandler {
    users: Arc<dyn UserRepository>,
}

impl UserServiceHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[tonic::async_trait]
impl UserService for UserServiceHandler {
    async fn get_all_users(&self, request: Request<Empty>) -> Result<Response<UserList>, Status> {
        let started = Instant::now();
        let subject = caller(&request)?;

        let users = self.users.list().await?;

        info!(
            subject = %subject,
            count = users.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "GetAllUsers"
        );
        Ok(Response::new(UserList {
            users: users.into_iter().map(Into::into).collect(),
        }))
    }
}
