/// Signed token codec shared by the todo backend
///
/// Tokens are compact JWTs signed with HS256 using one shared secret. The codec
/// is keyed once at startup and is immutable afterwards, so a single instance
/// can be shared by every in-flight call without locking.
///
/// ## Security Design
///
/// - **HS256 ONLY**: verification accepts exactly one algorithm. Tokens declaring
///   `none`, another HMAC width, or an asymmetric algorithm are rejected before
///   the signature is even looked at.
/// - **Zero leeway**: a token is dead the second its `exp` has passed.
/// - **No oracle**: every verification failure collapses into
///   [`TokenError::Invalid`]; callers cannot tell an expired token from a forged one.
///
/// ## Usage
///
/// ```rust
/// use chrono::Duration;
/// use crypto_core::jwt::{Claims, TokenCodec};
///
/// let codec = TokenCodec::new("s3cr3t").expect("non-empty secret");
/// let claims = Claims::expires_in("u1", "user", Duration::hours(24)).expect("valid claims");
///
/// let token = codec.issue(&claims).expect("signing never fails for HS256");
/// let parsed = codec.parse(&token).expect("freshly issued token verifies");
/// assert_eq!(parsed, claims);
/// ```
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

// ============================================================================
// Constants
// ============================================================================

/// The one algorithm this system signs with and accepts
pub const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Wire name of the subject claim
pub const SUBJECT_CLAIM: &str = "sub";

/// Wire name of the role claim
pub const ROLE_CLAIM: &str = "role";

/// Wire name of the expiry claim (epoch seconds)
pub const EXPIRY_CLAIM: &str = "exp";

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("token validation failed: {0}")]
    Invalid(String),

    #[error("token claims have an unexpected shape")]
    InvalidClaims,
}

// ============================================================================
// Data Structures
// ============================================================================

/// Identity assertion carried inside a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated principal
    #[serde(rename = "sub")]
    pub subject: String,

    /// Authorization level of the principal
    pub role: String,

    /// Expiration (Unix timestamp, seconds)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl Claims {
    /// Build claims expiring at an absolute instant
    ///
    /// ## Errors
    ///
    /// Returns [`TokenError::InvalidClaims`] if `subject` is empty.
    pub fn new(
        subject: impl Into<String>,
        role: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, TokenError> {
        let subject = subject.into();
        if subject.is_empty() {
            return Err(TokenError::InvalidClaims);
        }

        Ok(Self {
            subject,
            role: role.into(),
            expires_at: expires_at.timestamp(),
        })
    }

    /// Build claims expiring `ttl` from now
    pub fn expires_in(
        subject: impl Into<String>,
        role: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        Self::new(subject, role, Utc::now() + ttl)
    }

    /// Expiry as a `DateTime`, if the stored timestamp is representable
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }
}

/// Claim set of a token whose signature, algorithm and expiry all checked out
///
/// The claims are kept as a loose JSON object: a well-signed token may still
/// carry claims of an unexpected shape, and deciding what that means is left to
/// the caller.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    claims: Map<String, Value>,
}

impl VerifiedToken {
    /// The `sub` claim, if present and a string
    pub fn subject(&self) -> Option<&str> {
        self.claims.get(SUBJECT_CLAIM).and_then(Value::as_str)
    }

    /// The `role` claim, if present and a string
    pub fn role(&self) -> Option<&str> {
        self.claims.get(ROLE_CLAIM).and_then(Value::as_str)
    }

    /// The `exp` claim, if present and an integer
    pub fn expires_at(&self) -> Option<i64> {
        self.claims.get(EXPIRY_CLAIM).and_then(Value::as_i64)
    }

    /// Strict conversion into [`Claims`]
    pub fn into_claims(self) -> Result<Claims, TokenError> {
        let subject = self.subject().ok_or(TokenError::InvalidClaims)?;
        let role = self.role().ok_or(TokenError::InvalidClaims)?;
        let expires_at = self.expires_at().ok_or(TokenError::InvalidClaims)?;

        if subject.is_empty() {
            return Err(TokenError::InvalidClaims);
        }

        Ok(Claims {
            subject: subject.to_string(),
            role: role.to_string(),
            expires_at,
        })
    }
}

// ============================================================================
// Codec
// ============================================================================

/// HS256 token issuer and verifier keyed by a shared secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &JWT_ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Key a codec with the shared secret
    ///
    /// ## Errors
    ///
    /// Returns [`TokenError::EmptySecret`] for an empty secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.algorithms = vec![JWT_ALGORITHM];
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&[EXPIRY_CLAIM]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Serialize and sign claims
    ///
    /// Deterministic for identical secret and claims.
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(JWT_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify algorithm, signature and expiry, returning the raw claim set
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let data = decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                TokenError::Invalid(e.to_string())
            })?;

        Ok(VerifiedToken {
            claims: data.claims,
        })
    }

    /// Verify a token and convert its claims into [`Claims`]
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token)?.into_claims()
    }
}

// ============================================================================
// Tests
// ============================================================================
