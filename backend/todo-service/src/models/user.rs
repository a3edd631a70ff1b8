use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// User account as exposed to callers
///
/// The password hash lives in the same table but is never selected into
/// this type; only the credential check reads it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
