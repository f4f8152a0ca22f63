//! Authentication Handlers

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use shared::error::{AppError, ErrorCode};
use shared::models::{LoginRequest, LoginResponse};
use validator::Validate;

use crate::api::AppResult;
use crate::auth::CurrentUser;
use crate::db::users;
use crate::security_log;
use crate::state::ServerState;
use crate::utils::password::verify_password;

/// Fixed delay applied to every login attempt
const AUTH_FIXED_DELAY_MS: u64 = 300;

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    req.validate()?;

    let user = users::find_by_email(&state.pool, &req.email).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Same answer for unknown email and wrong password
    let user = match user {
        Some(u) if verify_password(&req.password, &u.password_hash) => u,
        _ => {
            security_log!("WARN", "login_failed", email = req.email.clone());
            return Err(AppError::invalid_credentials());
        }
    };

    if !user.active {
        security_log!("WARN", "login_disabled_account", user_id = user.id);
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let (session, _) = users::find_session_user(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let token = state
        .jwt_service
        .generate_token(user.id, &user.email)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = %user.id, role = %session.role_name, "User logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt_service.expires_in(),
        user: session,
    }))
}

/// GET /api/auth/me - session snapshot reloaded by the auth middleware
pub async fn me(Extension(current_user): Extension<CurrentUser>) -> Json<CurrentUser> {
    Json(current_user)
}
