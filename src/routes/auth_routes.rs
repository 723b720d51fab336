use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    config::get_config,
    dto::auth_dto::{
        ChangePasswordPayload, ChangePasswordResponse, LoginPayload, LoginResponse,
    },
    error::{Error, Result},
    utils::token::mint_session_token,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login successful", body = Json<LoginResponse>),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Wrong email or password")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(Error::BadRequest("Email dan password wajib diisi".into()));
    }

    let admin = state.admin_service.login(&email, &password).await?;

    let config = get_config();
    let token = mint_session_token(
        admin.id,
        &admin.email,
        &config.jwt_secret,
        config.session_ttl_minutes,
    )?;

    Ok(Json(LoginResponse {
        message: "Login berhasil".to_string(),
        token,
        admin: admin.into(),
    }))
}

#[utoipa::path(
    patch,
    path = "/api/admin/account",
    request_body = ChangePasswordPayload,
    responses(
        (status = 200, description = "Password changed", body = Json<ChangePasswordResponse>),
        (status = 400, description = "Missing fields or wrong old password"),
        (status = 404, description = "Email not registered")
    )
)]
#[axum::debug_handler]
pub async fn change_password(
    State(state): State<AppState>,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse> {
    let email = payload.email.unwrap_or_default();
    let old_password = payload.old_password.unwrap_or_default();
    let new_password = payload.new_password.unwrap_or_default();
    if email.is_empty() || old_password.is_empty() || new_password.is_empty() {
        return Err(Error::BadRequest("Semua kolom wajib diisi".into()));
    }

    state
        .admin_service
        .change_password(&email, &old_password, &new_password)
        .await?;

    Ok(Json(ChangePasswordResponse {
        success: true,
        message: "Perubahan berhasil disimpan. Silakan login ulang.".to_string(),
    }))
}
