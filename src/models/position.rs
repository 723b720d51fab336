use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    /// Employment type ("Full-time", "Contract", ...). Serialized as `type`
    /// to match the public wire format.
    #[serde(rename = "type")]
    pub employment_type: String,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
