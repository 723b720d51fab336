use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::position::Position;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePositionPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub requirements: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub employment_type: Option<String>,
    /// Defaults to open when omitted.
    pub is_open: Option<bool>,
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePositionPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub requirements: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub employment_type: Option<String>,
    pub is_open: Option<bool>,
}

/// Admin listing row with how many applications the position has received.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionWithCount {
    #[serde(flatten)]
    pub position: Position,
    pub application_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionListResponse {
    pub positions: Vec<PositionWithCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicPositionsResponse {
    pub positions: Vec<Position>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionResponse {
    pub position: Position,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionMutationResponse {
    pub message: String,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn create_payload_reads_type_key() {
        let payload: CreatePositionPayload = serde_json::from_str(
            r#"{"title":"Teknisi","description":"d","requirements":"r","location":"Bandung","type":"FULL_TIME"}"#,
        )
        .unwrap();
        assert_eq!(payload.employment_type.as_deref(), Some("FULL_TIME"));
        assert!(payload.is_open.is_none());
    }

    #[test]
    fn count_rides_next_to_flattened_position() {
        let value = serde_json::to_value(PositionWithCount {
            position: Position {
                id: Uuid::new_v4(),
                title: "Teknisi".to_string(),
                description: "d".to_string(),
                requirements: "r".to_string(),
                location: "Bandung".to_string(),
                employment_type: "FULL_TIME".to_string(),
                is_open: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            application_count: 7,
        })
        .unwrap();

        assert_eq!(value["title"], "Teknisi");
        assert_eq!(value["type"], "FULL_TIME");
        assert_eq!(value["isOpen"], true);
        assert_eq!(value["applicationCount"], 7);
    }
}
