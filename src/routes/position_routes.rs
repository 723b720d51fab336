use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::position_dto::{
        CreatePositionPayload, MessageResponse, PositionListResponse, PositionMutationResponse,
        PositionResponse, PublicPositionsResponse, UpdatePositionPayload,
    },
    error::{Error, Result},
    services::position_service::NewPosition,
    AppState,
};

/// Public listing for the application form's position dropdown.
#[utoipa::path(
    get,
    path = "/api/positions/open",
    responses(
        (status = 200, description = "Open positions, newest first", body = Json<PublicPositionsResponse>)
    )
)]
#[axum::debug_handler]
pub async fn open_positions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let positions = state.position_service.list_open().await?;
    Ok(Json(PublicPositionsResponse { positions }))
}

#[utoipa::path(
    get,
    path = "/api/admin/positions",
    responses(
        (status = 200, description = "All positions with application counts", body = Json<PositionListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_positions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let positions = state.position_service.list_with_counts().await?;
    Ok(Json(PositionListResponse { positions }))
}

#[utoipa::path(
    post,
    path = "/api/admin/positions",
    request_body = CreatePositionPayload,
    responses(
        (status = 200, description = "Position created", body = Json<PositionMutationResponse>),
        (status = 400, description = "Missing fields")
    )
)]
#[axum::debug_handler]
pub async fn create_position(
    State(state): State<AppState>,
    Json(payload): Json<CreatePositionPayload>,
) -> Result<impl IntoResponse> {
    let title = payload.title.clone().unwrap_or_default();
    let description = payload.description.clone().unwrap_or_default();
    let requirements = payload.requirements.clone().unwrap_or_default();
    let location = payload.location.clone().unwrap_or_default();
    let employment_type = payload.employment_type.clone().unwrap_or_default();
    if title.is_empty()
        || description.is_empty()
        || requirements.is_empty()
        || location.is_empty()
        || employment_type.is_empty()
    {
        return Err(Error::BadRequest("Semua field wajib diisi".into()));
    }
    payload.validate()?;

    let position = state
        .position_service
        .create(NewPosition {
            title,
            description,
            requirements,
            location,
            employment_type,
            is_open: payload.is_open.unwrap_or(true),
        })
        .await?;

    Ok(Json(PositionMutationResponse {
        message: "Posisi berhasil dibuat".to_string(),
        position,
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/positions/{id}",
    params(
        ("id" = Uuid, Path, description = "Position ID")
    ),
    responses(
        (status = 200, description = "Position detail", body = Json<PositionResponse>),
        (status = 404, description = "Position not found")
    )
)]
#[axum::debug_handler]
pub async fn get_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let position = state.position_service.get_by_id(id).await?;
    Ok(Json(PositionResponse { position }))
}

#[utoipa::path(
    put,
    path = "/api/admin/positions/{id}",
    params(
        ("id" = Uuid, Path, description = "Position ID")
    ),
    request_body = UpdatePositionPayload,
    responses(
        (status = 200, description = "Position updated", body = Json<PositionMutationResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Position not found")
    )
)]
#[axum::debug_handler]
pub async fn update_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePositionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let position = state.position_service.update(id, payload).await?;
    Ok(Json(PositionMutationResponse {
        message: "Posisi berhasil diupdate".to_string(),
        position,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/admin/positions/{id}",
    params(
        ("id" = Uuid, Path, description = "Position ID")
    ),
    responses(
        (status = 200, description = "Position deleted", body = Json<MessageResponse>),
        (status = 404, description = "Position not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.position_service.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Posisi berhasil dihapus".to_string(),
    }))
}
