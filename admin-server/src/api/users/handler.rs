//! User API Handlers
//!
//! Managing a user means managing their role: the hierarchy rule applies
//! to the role the target holds and to any role they are moved to.

use axum::Json;
use axum::extract::{Extension, Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserCreate, UserUpdate};
use validator::Validate;

use crate::api::AppResult;
use crate::auth::CurrentUser;
use crate::db::{roles, users};
use crate::state::ServerState;
use crate::utils::password::hash_password;

async fn ensure_can_assign(state: &ServerState, actor: &CurrentUser, role_id: i64) -> AppResult<()> {
    let role = roles::find_by_id(&state.pool, role_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound))?;
    state
        .policy
        .can_manage_role(actor, role.role_type, role.hierarchy)
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

async fn load(state: &ServerState, id: i64) -> AppResult<User> {
    users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))
}

/// GET /api/users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(users::find_all(&state.pool).await?))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    Ok(Json(load(&state, id).await?))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    payload.validate()?;
    tracing::info!(user_id = %current_user.id, email = %payload.email, "Creating user");

    ensure_can_assign(&state, &current_user, payload.role_id).await?;

    let password_hash = hash(&payload.password)?;
    let user = users::create(&state.pool, &payload, &password_hash).await?;
    Ok(Json(user))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    payload.validate()?;
    tracing::info!(user_id = %current_user.id, target_id = %id, "Updating user");

    let existing = load(&state, id).await?;
    if existing.id != current_user.id {
        ensure_can_assign(&state, &current_user, existing.role_id).await?;
    } else if payload.role_id.is_some() || payload.active.is_some() {
        return Err(AppError::forbidden("Cannot change your own role or status"));
    }
    if let Some(role_id) = payload.role_id {
        ensure_can_assign(&state, &current_user, role_id).await?;
    }

    let password_hash = payload.password.as_deref().map(hash).transpose()?;
    let user = users::update(&state.pool, id, &payload, password_hash.as_deref()).await?;
    Ok(Json(user))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tracing::info!(user_id = %current_user.id, target_id = %id, "Deleting user");

    if id == current_user.id {
        return Err(AppError::new(ErrorCode::UserCannotDeleteSelf));
    }
    let existing = load(&state, id).await?;
    ensure_can_assign(&state, &current_user, existing.role_id).await?;

    Ok(Json(users::delete(&state.pool, id).await?))
}
