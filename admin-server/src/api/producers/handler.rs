//! Producer API Handlers

use axum::Json;
use axum::extract::{Extension, Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Producer, ProducerInput};
use validator::Validate;

use crate::api::AppResult;
use crate::auth::CurrentUser;
use crate::db::producers;
use crate::state::ServerState;

/// GET /api/producers
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Producer>>> {
    Ok(Json(producers::find_all(&state.pool).await?))
}

/// GET /api/producers/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Producer>> {
    let producer = producers::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProducerNotFound))?;
    Ok(Json(producer))
}

/// POST /api/producers
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ProducerInput>,
) -> AppResult<Json<Producer>> {
    payload.validate()?;
    tracing::info!(user_id = %current_user.id, name = %payload.name, "Creating producer");
    Ok(Json(producers::create(&state.pool, &payload).await?))
}

/// PUT /api/producers/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ProducerInput>,
) -> AppResult<Json<Producer>> {
    payload.validate()?;
    tracing::info!(user_id = %current_user.id, producer_id = %id, "Updating producer");
    Ok(Json(producers::update(&state.pool, id, &payload).await?))
}

/// DELETE /api/producers/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tracing::info!(user_id = %current_user.id, producer_id = %id, "Deleting producer");
    Ok(Json(producers::delete(&state.pool, id).await?))
}
