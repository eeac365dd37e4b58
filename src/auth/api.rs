//! Authentication Endpoints
//!
//! Register, login, and change-password handlers.

use crate::auth::models::{
    ChangePasswordRequest, Identity, LoginRequest, LoginResponse, RegisterRequest,
    RegisteredResponse,
};
use crate::error::{ApiError, AppJson, FieldError};
use crate::server::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::{info, warn};

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredResponse>), ApiError> {
    let mut errors = Vec::new();
    let username = required_string(payload.username, "username", &mut errors);
    let password = required_string(payload.password, "password", &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let user = state.users.create_user(&username, &password, false)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            id: user.id,
            username: user.username,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut errors = Vec::new();
    let username = required_string(payload.username, "username", &mut errors);
    let password = required_string(payload.password, "password", &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let user = state
        .users
        .authenticate(&username, &password)?
        .ok_or_else(|| {
            warn!("Failed login attempt: {}", username);
            ApiError::Unauthenticated("Invalid credentials")
        })?;

    let token = state.jwt.issue(&user)?;
    info!("Login successful: {}", user.username);

    Ok(Json(LoginResponse {
        token,
        user: Identity::from_user(&user),
    }))
}

/// POST /api/auth/change-password (auth required)
pub async fn change_password(
    identity: Identity,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = Vec::new();
    let old_password = required_string(payload.old_password, "oldPassword", &mut errors);
    match &payload.new_password {
        Some(p) if p.len() >= 6 => {}
        Some(_) => errors.push(FieldError::new(
            "newPassword",
            "newPassword must be at least 6 characters",
        )),
        None => errors.push(FieldError::new("newPassword", "newPassword required")),
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let new_password = payload.new_password.unwrap_or_default();

    let user = state
        .users
        .get_by_id(identity.id)?
        .ok_or(ApiError::NotFound)?;

    if !state.users.check_password(&user, &old_password)? {
        return Err(ApiError::Unauthenticated("Invalid old password"));
    }

    state.users.update_password(user.id, &new_password)?;
    info!("Password changed for user {}", user.username);

    Ok(Json(json!({ "message": "Password changed" })))
}

fn required_string(
    value: Option<String>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            errors.push(FieldError::new(field, format!("{field} required")));
            String::new()
        }
    }
}
