//! Server-side access gate
//!
//! Decides, per call, whether the call is exempt (login) or must present a
//! valid bearer token carrying the required role.

use crate::claims::AuthenticatedContext;
use crate::error::AuthError;
use crypto_core::TokenCodec;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use std::sync::Arc;
use tracing::warn;

/// Prefix stripped from the `authorization` value when present
const BEARER_PREFIX: &str = "Bearer ";

/// Outcome of a successful gate check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Exempt method: forward with the original context
    Exempt,
    /// Protected method with a valid token: forward with this identity attached
    Authenticated(AuthenticatedContext),
}

/// Authorization policy applied to every call
///
/// Holds only immutable configuration (codec, required role, exempt method),
/// so one instance is shared across all concurrent calls.
///
/// ## Usage
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use crypto_core::TokenCodec;
/// use grpc_jwt_propagation::{AccessGate, AccessGateLayer};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let codec = Arc::new(TokenCodec::new("s3cr3t")?);
/// let gate = AccessGate::new(codec, "user", "/pb.AuthService/Login");
///
/// // tonic::transport::Server::builder().layer(AccessGateLayer::new(gate))
/// let _layer = AccessGateLayer::new(gate);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AccessGate {
    codec: Arc<TokenCodec>,
    required_role: String,
    exempt_method: String,
}

impl AccessGate {
    pub fn new(
        codec: Arc<TokenCodec>,
        required_role: impl Into<String>,
        exempt_method: impl Into<String>,
    ) -> Self {
        Self {
            codec,
            required_role: required_role.into(),
            exempt_method: exempt_method.into(),
        }
    }

    /// Check one call
    ///
    /// `method` is the fully-qualified gRPC path (`/package.Service/Method`).
    /// `metadata` is `None` when the call carries no metadata at all.
    ///
    /// ## Errors
    ///
    /// - `MissingMetadata` / `MissingHeader`: no authorization data
    /// - `InvalidToken`: signature, algorithm, expiry or encoding check failed
    /// - `PermissionDenied`: role claim missing or not the required role
    /// - `InvalidClaims`: subject claim missing, empty or not a string
    pub fn check(
        &self,
        method: &str,
        metadata: Option<&HeaderMap>,
    ) -> Result<GateDecision, AuthError> {
        if method == self.exempt_method {
            return Ok(GateDecision::Exempt);
        }

        let metadata = metadata.ok_or(AuthError::MissingMetadata)?;

        let header = metadata
            .get_all(AUTHORIZATION)
            .iter()
            .next()
            .ok_or(AuthError::MissingHeader)?;

        let header = header.to_str().map_err(|e| {
            warn!(method, error = %e, "authorization header is not valid ASCII");
            AuthError::InvalidToken
        })?;

        let token = header.strip_prefix(BEARER_PREFIX).unwrap_or(header);

        let verified = self.codec.verify(token).map_err(|e| {
            warn!(method, error = %e, "token verification failed");
            AuthError::InvalidToken
        })?;

        if verified.role() != Some(self.required_role.as_str()) {
            warn!(method, role = ?verified.role(), "role does not grant access");
            return Err(AuthError::PermissionDenied);
        }

        let subject = verified
            .subject()
            .filter(|subject| !subject.is_empty())
            .ok_or_else(|| {
                warn!(method, "token subject is missing, empty or not a string");
                AuthError::InvalidClaims
            })?;

        Ok(GateDecision::Authenticated(AuthenticatedContext::new(subject)))
    }
}
