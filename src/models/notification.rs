use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

pub const CHANNEL_WHATSAPP: &str = "whatsapp";
pub const CHANNEL_EMAIL: &str = "email";

pub const DELIVERY_PENDING: &str = "pending";
pub const DELIVERY_SENT: &str = "sent";
pub const DELIVERY_FAILED: &str = "failed";
pub const DELIVERY_SKIPPED: &str = "skipped";

/// Outbox row recorded in the same transaction as the status change that
/// caused it. A background worker owns delivery; rows are never produced by
/// the worker itself.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationOutbox {
    pub id: Uuid,
    pub application_id: Uuid,
    pub channel: String,
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
    pub payload: Option<JsonValue>,
    pub status: String,
    pub attempts: i32,
    pub max_attempts: i32,
    pub last_error: Option<String>,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
