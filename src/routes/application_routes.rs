use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Json},
};
use bytes::Bytes;
use uuid::Uuid;

use crate::{
    dto::application_dto::{
        ApplicationListQuery, ApplicationListResponse, ApplicationResponse, IntakeResponse,
        KtpValidation, UpdateStatusPayload, UpdateStatusResponse, WhatsappMessageQuery,
        WhatsappMessageResponse,
    },
    error::{Error, Result},
    services::application_service::NewApplication,
    services::notification_service::compose_message,
    utils::messages::{wa_link, NotificationKind},
    utils::phone::format_wa_number,
    utils::validation::{
        extension_for, sanitize_for_filename, validate_nik, validate_upload, UploadKind,
    },
    AppState,
};

/// Public intake: multipart form with the applicant's details plus the CV,
/// 3x4 photo and KTP files. Files are staged first and only promoted into
/// the public tree once the application row has committed.
#[utoipa::path(
    post,
    path = "/api/applications",
    responses(
        (status = 200, description = "Application submitted", body = Json<IntakeResponse>),
        (status = 400, description = "Missing or invalid fields, duplicate active NIK, closed position or rejected file"),
        (status = 404, description = "Position not found")
    )
)]
#[axum::debug_handler]
pub async fn submit_application(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut nik = String::new();
    let mut full_name = String::new();
    let mut email = String::new();
    let mut phone = String::new();
    let mut whatsapp = String::new();
    let mut address = String::new();
    let mut education = String::new();
    let mut position_id = String::new();
    let mut cv: Option<(String, Bytes)> = None;
    let mut photo3x4: Option<(String, Bytes)> = None;
    let mut ktp: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "nik" => nik = field.text().await.unwrap_or_default(),
            "fullName" => full_name = field.text().await.unwrap_or_default(),
            "email" => email = field.text().await.unwrap_or_default(),
            "phone" => phone = field.text().await.unwrap_or_default(),
            "whatsapp" => whatsapp = field.text().await.unwrap_or_default(),
            "address" => address = field.text().await.unwrap_or_default(),
            "education" => education = field.text().await.unwrap_or_default(),
            "positionId" => position_id = field.text().await.unwrap_or_default(),
            "cv" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    cv = Some((content_type, data));
                }
            }
            "photo3x4" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    photo3x4 = Some((content_type, data));
                }
            }
            "ktp" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    ktp = Some((content_type, data));
                }
            }
            _ => {}
        }
    }

    if nik.is_empty()
        || full_name.is_empty()
        || email.is_empty()
        || phone.is_empty()
        || whatsapp.is_empty()
        || address.is_empty()
        || education.is_empty()
        || position_id.is_empty()
    {
        return Err(Error::BadRequest("Semua field wajib diisi".into()));
    }
    let ((cv_type, cv_bytes), (photo_type, photo_bytes), (ktp_type, ktp_bytes)) =
        match (cv, photo3x4, ktp) {
            (Some(cv), Some(photo3x4), Some(ktp)) => (cv, photo3x4, ktp),
            _ => return Err(Error::BadRequest("Semua field wajib diisi".into())),
        };

    validate_nik(&nik).map_err(Error::BadRequest)?;

    if let Some((existing, position_title)) =
        state.application_service.find_active_by_nik(&nik).await?
    {
        return Err(Error::BadRequest(format!(
            "NIK {} sudah memiliki lamaran aktif ({}) untuk posisi {}",
            nik, existing.status, position_title
        )));
    }

    let position_id = Uuid::parse_str(&position_id)
        .map_err(|_| Error::NotFound("Posisi tidak ditemukan".to_string()))?;
    let position = state.position_service.get_by_id(position_id).await?;
    if !position.is_open {
        return Err(Error::BadRequest("Posisi sudah ditutup".into()));
    }

    validate_upload(UploadKind::Cv, &cv_type, cv_bytes.len()).map_err(Error::BadRequest)?;
    validate_upload(UploadKind::Photo3x4, &photo_type, photo_bytes.len())
        .map_err(Error::BadRequest)?;
    validate_upload(UploadKind::Ktp, &ktp_type, ktp_bytes.len()).map_err(Error::BadRequest)?;

    let timestamp = chrono::Utc::now().timestamp_millis();
    let sanitized_nik = sanitize_for_filename(&nik);
    let cv_filename = format!("{sanitized_nik}_{timestamp}.pdf");
    let photo_filename = format!(
        "{sanitized_nik}_3x4_{timestamp}.{}",
        extension_for(&photo_type)
    );
    let ktp_filename = format!(
        "{sanitized_nik}_ktp_{timestamp}.{}",
        extension_for(&ktp_type)
    );

    let staged = [
        state
            .upload_service
            .stage(UploadKind::Cv, &cv_filename, &cv_bytes)
            .await?,
        state
            .upload_service
            .stage(UploadKind::Photo3x4, &photo_filename, &photo_bytes)
            .await?,
        state
            .upload_service
            .stage(UploadKind::Ktp, &ktp_filename, &ktp_bytes)
            .await?,
    ];

    let new = NewApplication {
        nik,
        full_name,
        email,
        phone,
        whatsapp,
        address,
        education,
        cv_url: staged[0].public_url.clone(),
        photo3x4_url: staged[1].public_url.clone(),
        ktp_url: staged[2].public_url.clone(),
        position_id,
    };
    let application = match state.application_service.create(new).await {
        Ok(application) => application,
        Err(err) => {
            // Staged files stay invisible; drop them now instead of waiting
            // for the sweeper.
            state.upload_service.discard(&staged).await;
            return Err(err);
        }
    };
    state.upload_service.promote(&staged).await?;

    Ok(Json(IntakeResponse {
        message: "Lamaran berhasil dikirim".to_string(),
        application: ApplicationResponse::new(application, position),
        ktp_validation: KtpValidation::accepted(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/applications",
    params(
        ("status" = Option<String>, Query, description = "Status filter, ALL or absent for everything")
    ),
    responses(
        (status = 200, description = "Applications with position and interview schedule", body = Json<ApplicationListResponse>),
        (status = 400, description = "Unknown status filter")
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let status_filter = match query.status.as_deref() {
        None | Some("") | Some("ALL") => None,
        Some(other) => Some(other.parse().map_err(Error::BadRequest)?),
    };

    let applications = state.application_service.list(status_filter).await?;
    Ok(Json(ApplicationListResponse { applications }))
}

#[utoipa::path(
    post,
    path = "/api/admin/applications/status",
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<UpdateStatusResponse>),
        (status = 400, description = "Missing fields, unknown status or illegal transition"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let application_id = payload.application_id.unwrap_or_default();
    let status = payload.status.unwrap_or_default();
    if application_id.is_empty() || status.is_empty() {
        return Err(Error::BadRequest(
            "Application ID dan status wajib diisi".into(),
        ));
    }

    let target = status.parse().map_err(Error::BadRequest)?;
    let application_id = Uuid::parse_str(&application_id)
        .map_err(|_| Error::NotFound("Lamaran tidak ditemukan".to_string()))?;

    let (application, position) = state
        .application_service
        .update_status(application_id, target, &state.notification_service)
        .await?;

    Ok(Json(UpdateStatusResponse {
        message: "Status lamaran berhasil diperbarui".to_string(),
        application: ApplicationResponse::new(application, position),
    }))
}

/// Builds the ready-to-send WhatsApp text for the dashboard's manual flow:
/// the formatted number, the message for the requested kind and the wa.me
/// deep link.
#[utoipa::path(
    get,
    path = "/api/admin/applications/{id}/whatsapp-message",
    params(
        ("id" = Uuid, Path, description = "Application ID"),
        ("kind" = String, Query, description = "interview, accepted or rejected")
    ),
    responses(
        (status = 200, description = "Composed message and deep link", body = Json<WhatsappMessageResponse>),
        (status = 400, description = "Missing or unknown kind, or no interview scheduled yet"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn whatsapp_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<WhatsappMessageQuery>,
) -> Result<impl IntoResponse> {
    let kind = match query.kind.as_deref() {
        None | Some("") => {
            return Err(Error::BadRequest("Parameter kind wajib diisi".into()));
        }
        Some(raw) => raw.parse::<NotificationKind>()?,
    };

    let (application, position) = state.application_service.get_with_position(id).await?;

    let interview = match kind {
        NotificationKind::Interview => Some(
            state
                .interview_service
                .get_by_application(id)
                .await?
                .ok_or_else(|| Error::BadRequest("Jadwal interview belum dibuat".to_string()))?,
        ),
        _ => None,
    };

    let message = compose_message(kind, &application, &position, interview.as_ref())?;
    let phone = format_wa_number(&application.whatsapp);
    let url = wa_link(&phone, &message)?;

    Ok(Json(WhatsappMessageResponse {
        phone,
        message,
        url,
    }))
}
