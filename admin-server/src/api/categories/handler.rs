//! Category API Handlers

use axum::Json;
use axum::extract::{Extension, Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Category, CategoryInput};
use validator::Validate;

use crate::api::AppResult;
use crate::auth::CurrentUser;
use crate::db::categories;
use crate::state::ServerState;

/// GET /api/categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(categories::find_all(&state.pool).await?))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = categories::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    payload.validate()?;
    tracing::info!(user_id = %current_user.id, name = %payload.name, "Creating category");
    Ok(Json(categories::create(&state.pool, &payload).await?))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    payload.validate()?;
    tracing::info!(user_id = %current_user.id, category_id = %id, "Updating category");
    Ok(Json(categories::update(&state.pool, id, &payload).await?))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tracing::info!(user_id = %current_user.id, category_id = %id, "Deleting category");
    Ok(Json(categories::delete(&state.pool, id).await?))
}
