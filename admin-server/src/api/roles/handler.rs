//! Role API Handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, RoleCreate, RoleUpdate};
use shared::query::{PaginatedResponse, RoleQuery};
use validator::Validate;

use crate::api::AppResult;
use crate::auth::CurrentUser;
use crate::auth::permissions::{
    ALL_PERMISSIONS, get_default_permissions, validate_role_permissions,
};
use crate::db::roles;
use crate::state::ServerState;

/// An actor can only grant permissions they hold themselves
fn validate_permission_ceiling(current_user: &CurrentUser, permissions: &[String]) -> AppResult<()> {
    match permissions.iter().find(|p| !current_user.has_permission(p)) {
        Some(perm) => Err(AppError::forbidden(format!(
            "Cannot grant permission '{perm}': you do not have it yourself"
        ))
        .with_detail("permission", perm.as_str())),
        None => Ok(()),
    }
}

async fn load(state: &ServerState, id: i64) -> AppResult<Role> {
    roles::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound))
}

/// GET /api/roles
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<RoleQuery>,
) -> AppResult<Json<PaginatedResponse<Role>>> {
    tracing::debug!(user_id = %current_user.id, ?query, "Listing roles");
    let all = roles::find_all(&state.pool).await?;
    Ok(Json(query.select(&all)))
}

/// GET /api/roles/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Role>> {
    Ok(Json(load(&state, id).await?))
}

/// POST /api/roles
///
/// An empty permission list gets the defaults for the role type.
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(mut payload): Json<RoleCreate>,
) -> AppResult<Json<Role>> {
    payload.validate()?;
    tracing::info!(
        user_id = %current_user.id,
        role_name = %payload.name,
        role_type = ?payload.role_type,
        "Creating role"
    );

    state
        .policy
        .can_manage_role(&current_user, payload.role_type, payload.hierarchy)?;

    if payload.permissions.is_empty() {
        payload.permissions = get_default_permissions(payload.role_type);
    }
    validate_role_permissions(payload.role_type, payload.special, &payload.permissions)?;
    validate_permission_ceiling(&current_user, &payload.permissions)?;

    let role = roles::create(&state.pool, payload).await?;
    Ok(Json(role))
}

/// PUT /api/roles/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<Role>> {
    payload.validate()?;
    tracing::info!(user_id = %current_user.id, role_id = %id, "Updating role");

    let existing = load(&state, id).await?;

    // Both the current rank and the requested one must sit below the actor
    state
        .policy
        .can_manage_role(&current_user, existing.role_type, existing.hierarchy)?;
    if payload.hierarchy.is_some() {
        state
            .policy
            .can_manage_role(&current_user, existing.role_type, payload.hierarchy)?;
    }

    let special = payload.special.unwrap_or(existing.special);
    let permissions = payload.permissions.as_ref().unwrap_or(&existing.permissions);
    validate_role_permissions(existing.role_type, special, permissions)?;
    if let Some(ref new_permissions) = payload.permissions {
        validate_permission_ceiling(&current_user, new_permissions)?;
    }

    let role = roles::update(&state.pool, &existing, payload).await?;
    Ok(Json(role))
}

/// DELETE /api/roles/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tracing::info!(user_id = %current_user.id, role_id = %id, "Deleting role");

    let existing = load(&state, id).await?;
    state
        .policy
        .can_manage_role(&current_user, existing.role_type, existing.hierarchy)?;

    let deleted = roles::delete(&state.pool, id).await?;
    Ok(Json(deleted))
}

#[derive(Serialize)]
pub struct PermissionCatalog {
    pub permissions: Vec<&'static str>,
}

/// GET /api/permissions
pub async fn get_all_permissions() -> Json<PermissionCatalog> {
    Json(PermissionCatalog {
        permissions: ALL_PERMISSIONS.to_vec(),
    })
}
