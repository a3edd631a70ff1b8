//! Closed error taxonomy for login and call authorization
//!
//! Every failure the auth path can produce is one of these kinds, and the
//! mapping to a gRPC status is a total match over them. Messages are fixed
//! strings: nothing from the credential store or the token library reaches
//! the caller.

use thiserror::Error;
use tonic::{Code, Status};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Empty email or password at login
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Email does not have the `local@domain.tld` shape
    #[error("invalid email format")]
    InvalidEmailFormat,

    /// Credential store rejected the email/password pair
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Protected call arrived without a metadata carrier
    #[error("missing metadata")]
    MissingMetadata,

    /// Protected call arrived without an `authorization` entry
    #[error("missing authorization header")]
    MissingHeader,

    /// Bad signature, wrong algorithm, expired or malformed token
    #[error("invalid token")]
    InvalidToken,

    /// Well-signed token whose claims do not have the expected shape
    #[error("invalid claims")]
    InvalidClaims,

    /// Role claim differs from the required role
    #[error("permission denied")]
    PermissionDenied,

    /// Signing primitive failure
    #[error("internal error")]
    Internal,
}

impl AuthError {
    /// gRPC status code for this kind
    pub fn code(&self) -> Code {
        match self {
            AuthError::InvalidCredentials | AuthError::InvalidEmailFormat => Code::InvalidArgument,
            AuthError::AuthenticationFailed
            | AuthError::MissingMetadata
            | AuthError::MissingHeader
            | AuthError::InvalidToken
            | AuthError::InvalidClaims => Code::Unauthenticated,
            AuthError::PermissionDenied => Code::PermissionDenied,
            AuthError::Internal => Code::Internal,
        }
    }

    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        Status::new(self.code(), self.to_string())
    }
}

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        err.to_status()
    }
}
