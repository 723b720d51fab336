use serde::{Deserialize, Serialize};

use crate::models::interview::Interview;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    pub application_id: Option<String>,
    /// RFC 3339 or the browser's offset-less datetime-local form.
    pub scheduled_date: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    pub message: String,
    pub interview: Interview,
}
