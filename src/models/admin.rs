use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Admin account row. Deliberately not `Serialize`: the argon2 hash must
/// never reach a response body, so handlers convert to `AdminProfile`.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
