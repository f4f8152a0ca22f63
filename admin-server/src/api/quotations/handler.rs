//! Quotation API Handlers

use axum::Json;
use axum::extract::{Extension, Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CommentCreate, Order, Quotation, QuotationComment, QuotationCreate, QuotationItem,
    QuotationStatus, QuotationUpdate,
};
use validator::Validate;

use crate::api::AppResult;
use crate::auth::CurrentUser;
use crate::db::{orders, products, quotations, roles, users};
use crate::pricing::{QuotationPricing, price_quotation};
use crate::state::ServerState;

/// Load a quotation the current user is allowed to see
///
/// Someone else's quotation looks the same as a missing one to clients.
async fn load_visible(state: &ServerState, user: &CurrentUser, id: i64) -> AppResult<Quotation> {
    quotations::find_by_id(&state.pool, id)
        .await?
        .filter(|q| !user.is_client() || q.user_id == user.id)
        .ok_or_else(|| AppError::new(ErrorCode::QuotationNotFound))
}

fn ensure_open(quotation: &Quotation) -> AppResult<()> {
    if quotation.status != QuotationStatus::Open {
        return Err(AppError::new(ErrorCode::QuotationAlreadyOrdered));
    }
    Ok(())
}

async fn ensure_products_exist(state: &ServerState, items: &[QuotationItem]) -> AppResult<()> {
    let ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();
    let catalog = products::find_by_ids(&state.pool, &ids).await?;
    match ids.into_iter().find(|id| !catalog.contains_key(id)) {
        Some(missing) => {
            Err(AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", missing))
        }
        None => Ok(()),
    }
}

/// Price a quotation with current catalog prices and its owner's discount
async fn price(state: &ServerState, quotation: &Quotation) -> AppResult<QuotationPricing> {
    let owner = users::find_by_id(&state.pool, quotation.user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    let discount = roles::find_by_id(&state.pool, owner.role_id)
        .await?
        .map(|role| role.effective_discount())
        .unwrap_or(0);

    let ids: Vec<i64> = quotation.items.iter().map(|i| i.product_id).collect();
    let catalog = products::find_by_ids(&state.pool, &ids).await?;
    price_quotation(&quotation.items, &catalog, discount)
}

/// GET /api/quotations
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Quotation>>> {
    let owner = current_user.is_client().then_some(current_user.id);
    Ok(Json(quotations::find_all(&state.pool, owner).await?))
}

/// GET /api/quotations/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Quotation>> {
    Ok(Json(load_visible(&state, &current_user, id).await?))
}

/// GET /api/quotations/{id}/pricing - live prices, nothing is stored
pub async fn pricing(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<QuotationPricing>> {
    let quotation = load_visible(&state, &current_user, id).await?;
    Ok(Json(price(&state, &quotation).await?))
}

/// POST /api/quotations
///
/// Clients always create for themselves; staff may name the owner.
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<QuotationCreate>,
) -> AppResult<Json<Quotation>> {
    payload.validate()?;

    let owner_id = match payload.user_id {
        Some(user_id) if !current_user.is_client() => {
            users::find_by_id(&state.pool, user_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
            user_id
        }
        _ => current_user.id,
    };

    ensure_products_exist(&state, &payload.items).await?;

    let quotation = quotations::create(&state.pool, owner_id, &payload.items).await?;
    tracing::info!(
        user_id = %current_user.id,
        owner_id = %owner_id,
        quotation_id = %quotation.id,
        items = quotation.items.len(),
        "Quotation created"
    );
    Ok(Json(quotation))
}

/// PUT /api/quotations/{id} - replace the items of an open quotation
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<QuotationUpdate>,
) -> AppResult<Json<Quotation>> {
    payload.validate()?;
    let quotation = load_visible(&state, &current_user, id).await?;
    ensure_open(&quotation)?;

    ensure_products_exist(&state, &payload.items).await?;

    tracing::info!(user_id = %current_user.id, quotation_id = %id, "Updating quotation items");
    Ok(Json(quotations::replace_items(&state.pool, id, &payload.items).await?))
}

/// DELETE /api/quotations/{id} - only while still open
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let quotation = load_visible(&state, &current_user, id).await?;
    ensure_open(&quotation)?;

    tracing::info!(user_id = %current_user.id, quotation_id = %id, "Deleting quotation");
    Ok(Json(quotations::delete(&state.pool, id).await?))
}

/// GET /api/quotations/{id}/comments
pub async fn list_comments(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<QuotationComment>>> {
    load_visible(&state, &current_user, id).await?;
    Ok(Json(quotations::find_comments(&state.pool, id).await?))
}

/// POST /api/quotations/{id}/comments
pub async fn add_comment(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CommentCreate>,
) -> AppResult<Json<QuotationComment>> {
    payload.validate()?;
    load_visible(&state, &current_user, id).await?;

    let comment = quotations::add_comment(&state.pool, id, current_user.id, &payload.body).await?;
    Ok(Json(comment))
}

/// POST /api/quotations/{id}/order
///
/// Prices the quotation one last time and freezes the result into a
/// pending order. Later price or discount changes never touch it.
pub async fn create_order(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let quotation = load_visible(&state, &current_user, id).await?;
    ensure_open(&quotation)?;

    let pricing = price(&state, &quotation).await?;
    let order = orders::create_from_quotation(
        &state.pool,
        quotation.id,
        quotation.user_id,
        pricing.snapshot_lines(),
        pricing.totals(),
    )
    .await?;

    tracing::info!(
        user_id = %current_user.id,
        quotation_id = %id,
        order_id = %order.id,
        total = order.total,
        discount = pricing.discount,
        "Order created from quotation"
    );
    Ok(Json(order))
}
