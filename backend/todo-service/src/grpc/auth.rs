use std::sync::Arc;
use tonic::{Request, Response, Status};

use super::pb::auth_service_server::AuthService;
use super::pb::{LoginRequest, LoginResponse};
use crate::services::LoginFlow;

/// AuthService implementation
#[derive(Clone)]
pub struct AuthServiceHandler {
    login_flow: Arc<LoginFlow>,
}

impl AuthServiceHandler {
    pub fn new(login_flow: Arc<LoginFlow>) -> Self {
        Self { login_flow }
    }
}

#[tonic::async_trait]
impl AuthService for AuthServiceHandler {
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();
        let token = self.login_flow.login(&req.email, &req.password).await?;

        Ok(Response::new(LoginResponse { token }))
    }
}
