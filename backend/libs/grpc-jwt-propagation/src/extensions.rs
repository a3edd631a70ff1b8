//! Request Extension Trait for Authenticated Identity Access
//!
//! Provides ergonomic helpers for reading the identity that the access gate
//! attached to a call.

use crate::AuthenticatedContext;
use tonic::{Request, Status};

/// Extension trait for accessing the authenticated identity from gRPC requests
///
/// Implemented for all `Request<T>` types.
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_jwt_propagation::AuthenticatedContextExt;
/// use tonic::{Request, Response, Status};
///
/// async fn get_profile(request: Request<()>) -> Result<Response<()>, Status> {
///     let identity = request.authenticated()?;
///     tracing::info!(subject = %identity.subject(), "profile requested");
///     Ok(Response::new(()))
/// }
/// ```
pub trait AuthenticatedContextExt {
    /// Identity stored by the access gate
    ///
    /// ## Errors
    ///
    /// Returns `Status::unauthenticated` if the call did not pass through the
    /// gate as a protected call (gate not attached, or exempt method).
    fn authenticated(&self) -> Result<&AuthenticatedContext, Status>;

    /// Identity, if any; `None` on exempt calls
    fn try_authenticated(&self) -> Option<&AuthenticatedContext>;
}

impl<T> AuthenticatedContextExt for Request<T> {
    fn authenticated(&self) -> Result<&AuthenticatedContext, Status> {
        self.try_authenticated()
            .ok_or_else(|| Status::unauthenticated("missing authenticated identity"))
    }

    fn try_authenticated(&self) -> Option<&AuthenticatedContext> {
        self.extensions().get::<AuthenticatedContext>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_missing() {
        let request = Request::new(());
        let result = request.authenticated();

        assert!(result.is_err());
        let status = result.unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
        assert!(request.try_authenticated().is_none());
    }

    #[test]
    fn test_authenticated_present() {
        let mut request = Request::new(());
        request
            .extensions_mut()
            .insert(AuthenticatedContext::new("u1"));

        let identity = request.authenticated().expect("identity should be present");
        assert_eq!(identity.subject(), "u1");
    }

    #[test]
    fn test_plain_string_extension_is_not_identity() {
        let mut request = Request::new(());
        request.extensions_mut().insert("u1".to_string());

        assert!(request.try_authenticated().is_none());
    }
}
