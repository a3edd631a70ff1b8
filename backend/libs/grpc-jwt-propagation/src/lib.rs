//! Bearer token authorization for gRPC services
//!
//! Every call to a server goes through one gate. The login method is exempt;
//! every other method must carry a valid HS256 token whose role claim equals
//! the one required role. Accepted calls continue with the caller's identity
//! attached to the request.
//!
//! ## Core Components
//!
//! - **AccessGate**: the per-call decision procedure
//! - **AccessGateLayer**: tower layer that runs the gate in front of a tonic router
//! - **AuthenticatedContext**: request-scoped identity stored in request extensions
//! - **AuthenticatedContextExt**: handler-side accessor for that identity
//! - **BearerInterceptor**: client-side interceptor attaching the token
//! - **AuthError**: closed error taxonomy with a total gRPC status mapping
//!
//! ## Server Side
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crypto_core::TokenCodec;
//! use grpc_jwt_propagation::{AccessGate, AccessGateLayer, AuthenticatedContextExt};
//! use tonic::{Request, Response, Status};
//!
//! # fn build() -> Result<AccessGateLayer, Box<dyn std::error::Error>> {
//! let codec = Arc::new(TokenCodec::new("s3cr3t")?);
//! let layer = AccessGateLayer::new(AccessGate::new(codec, "user", "/pb.AuthService/Login"));
//! // Server::builder().layer(layer).add_service(...)
//! # Ok(layer)
//! # }
//!
//! async fn list_todos(request: Request<()>) -> Result<Response<()>, Status> {
//!     let identity = request.authenticated()?;
//!     tracing::info!(subject = %identity.subject(), "listing todos");
//!     Ok(Response::new(()))
//! }
//! ```
//!
//! ## Security Guarantees
//!
//! - Only HS256 tokens are accepted
//! - Expiration checked with zero leeway
//! - No token = `Status::unauthenticated`
//! - Invalid token = `Status::unauthenticated`
//! - Wrong role = `Status::permission_denied`

mod claims;
mod client;
mod error;
mod extensions;
mod layer;
mod server;

pub use claims::AuthenticatedContext;
pub use client::BearerInterceptor;
pub use error::AuthError;
pub use extensions::AuthenticatedContextExt;
pub use layer::{AccessGateLayer, AccessGateService};
pub use server::{AccessGate, GateDecision};

// Re-export tonic Status for convenience
pub use tonic::Status;
