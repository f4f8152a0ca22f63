//! Order API Handlers

use axum::Json;
use axum::extract::{Extension, Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderStatusUpdate, PaymentRequest};
use validator::Validate;

use crate::api::AppResult;
use crate::auth::CurrentUser;
use crate::db::{orders, users};
use crate::payment::{charge_order, ensure_payable};
use crate::security_log;
use crate::state::ServerState;

async fn load_visible(state: &ServerState, user: &CurrentUser, id: i64) -> AppResult<Order> {
    orders::find_by_id(&state.pool, id)
        .await?
        .filter(|o| !user.is_client() || o.user_id == user.id)
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
}

/// GET /api/orders
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Order>>> {
    let owner = current_user.is_client().then_some(current_user.id);
    Ok(Json(orders::find_all(&state.pool, owner).await?))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(load_visible(&state, &current_user, id).await?))
}

/// PUT /api/orders/{id} - manual status change
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    load_visible(&state, &current_user, id).await?;
    let order = orders::update_status(&state.pool, id, payload.status).await?;
    tracing::info!(
        user_id = %current_user.id,
        order_id = %id,
        status = ?order.status,
        "Order status updated"
    );
    Ok(Json(order))
}

/// DELETE /api/orders/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tracing::warn!(user_id = %current_user.id, order_id = %id, "Deleting order");
    Ok(Json(orders::delete(&state.pool, id).await?))
}

/// POST /api/orders/{id}/pay
///
/// The owner's gateway customer is created on first payment and kept.
pub async fn pay(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentRequest>,
) -> AppResult<Json<Order>> {
    payload.validate()?;
    let order = load_visible(&state, &current_user, id).await?;
    ensure_payable(&order)?;

    let owner = users::find_by_id(&state.pool, order.user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    let customer_id = match owner.payment_customer_id {
        Some(customer_id) => customer_id,
        None => {
            let customer_id = state
                .payments
                .create_customer(&owner.name, &owner.email)
                .await?;
            users::set_payment_customer_id(&state.pool, owner.id, &customer_id).await?;
            customer_id
        }
    };

    let charge = match charge_order(state.payments.as_ref(), &customer_id, &order, &payload).await {
        Ok(charge) => charge,
        Err(e) => {
            security_log!(
                "WARN",
                "payment_failed",
                user_id = current_user.id,
                order_id = id,
                error = e.message.clone()
            );
            return Err(e);
        }
    };
    orders::set_paid(&state.pool, id, &charge.id).await?;

    tracing::info!(
        user_id = %current_user.id,
        order_id = %id,
        charge_id = %charge.id,
        amount = charge.amount,
        "Order paid"
    );

    let order = orders::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(order))
}
