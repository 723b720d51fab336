use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::interview_dto::{SchedulePayload, ScheduleResponse},
    error::{Error, Result},
    services::interview_service::ScheduleInput,
    utils::time::parse_schedule_date,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/admin/interviews",
    request_body = SchedulePayload,
    responses(
        (status = 200, description = "Interview scheduled", body = Json<ScheduleResponse>),
        (status = 400, description = "Missing fields, bad date or terminal application"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn schedule_interview(
    State(state): State<AppState>,
    Json(payload): Json<SchedulePayload>,
) -> Result<impl IntoResponse> {
    let application_id = payload.application_id.unwrap_or_default();
    let scheduled_date = payload.scheduled_date.unwrap_or_default();
    let location = payload.location.unwrap_or_default();
    if application_id.is_empty() || scheduled_date.is_empty() || location.is_empty() {
        return Err(Error::BadRequest("Semua field wajib diisi".into()));
    }

    // An id that does not even parse cannot name a stored application.
    let application_id = Uuid::parse_str(&application_id)
        .map_err(|_| Error::NotFound("Lamaran tidak ditemukan".to_string()))?;
    let scheduled_date = parse_schedule_date(&scheduled_date)
        .map_err(|_| Error::BadRequest("Format tanggal tidak valid".to_string()))?;

    let interview = state
        .interview_service
        .schedule(
            ScheduleInput {
                application_id,
                scheduled_date,
                location,
                notes: payload.notes.filter(|n| !n.is_empty()),
            },
            &state.notification_service,
        )
        .await?;

    Ok(Json(ScheduleResponse {
        message: "Jadwal interview berhasil dibuat".to_string(),
        interview,
    }))
}
