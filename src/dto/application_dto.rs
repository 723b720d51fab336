use serde::{Deserialize, Serialize};

use crate::models::application::Application;
use crate::models::interview::Interview;
use crate::models::position::Position;

/// Application together with the position it targets. This is the shape the
/// intake and status endpoints return.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationResponse {
    #[serde(flatten)]
    pub application: Application,
    pub position: Position,
}

impl ApplicationResponse {
    pub fn new(application: Application, position: Position) -> Self {
        Self {
            application,
            position,
        }
    }
}

/// Dashboard listing row: the interview schedule rides along and is null
/// until one has been created.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListItem {
    #[serde(flatten)]
    pub application: Application,
    pub position: Position,
    pub interview_schedule: Option<Interview>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationListItem>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ApplicationListQuery {
    pub status: Option<String>,
}

/// Fixed acknowledgement for the KTP upload. File content is never
/// inspected, only type and size.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KtpValidation {
    pub is_valid: bool,
    pub confidence: u8,
    pub details: Vec<String>,
}

impl KtpValidation {
    pub fn accepted() -> Self {
        Self {
            is_valid: true,
            confidence: 100,
            details: vec!["File KTP diterima tanpa verifikasi isi dokumen".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeResponse {
    pub message: String,
    pub application: ApplicationResponse,
    pub ktp_validation: KtpValidation,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    pub application_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatusResponse {
    pub message: String,
    pub application: ApplicationResponse,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WhatsappMessageQuery {
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhatsappMessageResponse {
    pub phone: String,
    pub message: String,
    pub url: String,
}
