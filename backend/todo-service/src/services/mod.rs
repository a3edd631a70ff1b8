//! Business logic for todo service
pub mod login;

pub use login::{CredentialError, CredentialVerifier, LoginFlow, TOKEN_TTL_HOURS};
