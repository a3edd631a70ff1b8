//! Client-side bearer token interceptor
//!
//! Injects a token issued by the login call into outgoing gRPC requests.

use crate::error::AuthError;
use tonic::metadata::AsciiMetadataValue;
use tonic::service::Interceptor;
use tonic::{Request, Status};

/// Client-side interceptor that attaches `authorization: Bearer <token>`
///
/// The header value is formatted and validated once at construction, then
/// cloned into every outgoing request.
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_jwt_propagation::BearerInterceptor;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let token = "eyJhbGc..."; // From AuthService/Login
/// let interceptor = BearerInterceptor::new(token)?;
///
/// // let client = TodoServiceClient::with_interceptor(channel, interceptor);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BearerInterceptor {
    /// Pre-formatted authorization header value ("Bearer {token}")
    auth_header: AsciiMetadataValue,
}

impl BearerInterceptor {
    /// Create an interceptor from a raw token (without "Bearer " prefix)
    ///
    /// ## Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token cannot be carried as
    /// ASCII metadata.
    pub fn new(token: impl Into<String>) -> Result<Self, AuthError> {
        let value = format!("Bearer {}", token.into());
        let auth_header =
            AsciiMetadataValue::try_from(value).map_err(|_| AuthError::InvalidToken)?;

        Ok(Self { auth_header })
    }
}

impl Interceptor for BearerInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert("authorization", self.auth_header.clone());

        Ok(request)
    }
}
