//! Login: exchange an email and password for a bearer token
//!
//! Input is validated before the credential store is contacted, so malformed
//! requests never cause I/O. Store failures reach the caller only as a
//! generic `authentication failed`.

use async_trait::async_trait;
use chrono::Duration;
use crypto_core::{Claims, TokenCodec};
use grpc_jwt_propagation::AuthError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::validators::validate_email;

/// Lifetime of tokens issued at login
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Unknown email or wrong password; the two are indistinguishable
    #[error("credentials rejected")]
    Rejected,

    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Maps an email/password pair to the subject identifier of its owner
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<String, CredentialError>;
}

/// Orchestrates credential checks and token issuance
pub struct LoginFlow {
    verifier: Arc<dyn CredentialVerifier>,
    codec: Arc<TokenCodec>,
    required_role: String,
}

impl LoginFlow {
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        codec: Arc<TokenCodec>,
        required_role: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            codec,
            required_role: required_role.into(),
        }
    }

    /// Validate the credentials and issue a token carrying the required role
    ///
    /// ## Errors
    ///
    /// - `InvalidCredentials`: email or password empty
    /// - `InvalidEmailFormat`: email is not `local@domain.tld`
    /// - `AuthenticationFailed`: the verifier rejected the pair or is unavailable
    /// - `Internal`: the token could not be built or signed
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let started = Instant::now();

        if email.is_empty() || password.is_empty() {
            warn!("Login rejected: empty email or password");
            return Err(AuthError::InvalidCredentials);
        }

        if !validate_email(email) {
            warn!("Login rejected: malformed email");
            return Err(AuthError::InvalidEmailFormat);
        }

        let subject = match self.verifier.login(email, password).await {
            Ok(subject) => subject,
            Err(err) => {
                warn!(
                    error = %err,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Login failed"
                );
                return Err(AuthError::AuthenticationFailed);
            }
        };

        let claims = Claims::expires_in(
            subject.as_str(),
            self.required_role.as_str(),
            Duration::hours(TOKEN_TTL_HOURS),
        )
        .map_err(|err| {
            error!(error = %err, "Credential verifier returned an unusable subject");
            AuthError::Internal
        })?;

        let token = self.codec.issue(&claims).map_err(|err| {
            error!(error = %err, "Token signing failed");
            AuthError::Internal
        })?;

        info!(
            subject = %subject,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Login succeeded"
        );
        Ok(token)
    }
}
