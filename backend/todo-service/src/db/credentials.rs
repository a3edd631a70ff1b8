//! Credential check against the users table

use crate::security::{hash_password, verify_password};
use crate::services::{CredentialError, CredentialVerifier};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

// Verified against when the email is unknown, so both rejections cost one Argon2 run
static UNKNOWN_USER_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("unknown-user-placeholder").ok());

#[derive(Debug, FromRow)]
struct StoredCredentials {
    id: Uuid,
    password_hash: String,
}

/// Postgres-backed [`CredentialVerifier`]
///
/// Unknown email and wrong password both yield [`CredentialError::Rejected`].
#[derive(Debug, Clone)]
pub struct PgCredentialVerifier {
    pool: PgPool,
}

impl PgCredentialVerifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialVerifier for PgCredentialVerifier {
    async fn login(&self, email: &str, password: &str) -> Result<String, CredentialError> {
        let stored = sqlx::query_as::<_, StoredCredentials>(
            "SELECT id, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            tracing::error!("Database error during credential check: {}", err);
            CredentialError::Unavailable(err.to_string())
        })?;

        check_password(stored, password)
    }
}

fn check_password(
    stored: Option<StoredCredentials>,
    password: &str,
) -> Result<String, CredentialError> {
    let Some(stored) = stored else {
        if let Some(hash) = UNKNOWN_USER_HASH.as_deref() {
            let _ = verify_password(password, hash);
        }
        return Err(CredentialError::Rejected);
    };

    match verify_password(password, &stored.password_hash) {
        Ok(true) => Ok(stored.id.to_string()),
        Ok(false) => Err(CredentialError::Rejected),
        Err(err) => {
            tracing::error!(user_id = %stored.id, "Stored password hash is unusable: {}", err);
            Err(CredentialError::Unavailable("invalid stored password hash".to_string()))
        }
    }
}
