//! Order Repository

use std::collections::HashMap;

use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderLine, OrderStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::RepoResult;
use crate::pricing::Totals;

const ORDER_COLUMNS: &str =
    "id, user_id, quotation_id, status, subtotal, tax, total, payment_charge_id, created_at";

#[derive(sqlx::FromRow)]
struct LineRow {
    order_id: i64,
    #[sqlx(flatten)]
    line: OrderLine,
}

async fn load_lines(pool: &PgPool, orders: &mut [Order]) -> RepoResult<()> {
    if orders.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let rows = sqlx::query_as::<_, LineRow>(
        "SELECT order_id, product_id, name, quantity, current_price FROM order_line \
         WHERE order_id = ANY($1) ORDER BY order_id, position",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    let mut by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for row in rows {
        by_order.entry(row.order_id).or_default().push(row.line);
    }
    for order in orders.iter_mut() {
        order.lines = by_order.remove(&order.id).unwrap_or_default();
    }
    Ok(())
}

/// All orders, or only those owned by `user_id`
pub async fn find_all(pool: &PgPool, user_id: Option<i64>) -> RepoResult<Vec<Order>> {
    let mut orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders \
         WHERE ($1::BIGINT IS NULL OR user_id = $1) ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    load_lines(pool, &mut orders).await?;
    Ok(orders)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let mut found: Vec<Order> = order.into_iter().collect();
    load_lines(pool, &mut found).await?;
    Ok(found.pop())
}

/// Turn an open quotation into a pending order with frozen line prices
///
/// The quotation flips to `ordered` in the same transaction; a quotation
/// that is no longer open yields `QuotationAlreadyOrdered`.
pub async fn create_from_quotation(
    pool: &PgPool,
    quotation_id: i64,
    user_id: i64,
    lines: Vec<OrderLine>,
    totals: Totals,
) -> RepoResult<Order> {
    if lines.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty).into());
    }

    let mut tx = pool.begin().await?;

    let claimed = sqlx::query(
        "UPDATE quotation SET status = 'ordered' WHERE id = $1 AND status = 'open'",
    )
    .bind(quotation_id)
    .execute(&mut *tx)
    .await?;
    if claimed.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::QuotationAlreadyOrdered).into());
    }

    let mut order = sqlx::query_as::<_, Order>(&format!(
        "INSERT INTO orders (id, user_id, quotation_id, status, subtotal, tax, total, created_at) \
         VALUES ($1, $2, $3, 'pending', $4, $5, $6, $7) RETURNING {ORDER_COLUMNS}"
    ))
    .bind(snowflake_id())
    .bind(user_id)
    .bind(quotation_id)
    .bind(totals.subtotal)
    .bind(totals.tax)
    .bind(totals.total)
    .bind(now_millis())
    .fetch_one(&mut *tx)
    .await?;

    for (position, line) in lines.iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_line (order_id, position, product_id, name, quantity, current_price) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(order.id)
        .bind(position as i32)
        .bind(line.product_id)
        .bind(&line.name)
        .bind(line.quantity)
        .bind(line.current_price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    order.lines = lines;
    Ok(order)
}

/// Apply a manual status change, enforcing the allowed transitions
pub async fn update_status(pool: &PgPool, id: i64, next: OrderStatus) -> RepoResult<Order> {
    let mut order = find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if !order.status.can_transition_to(next) {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            format!("Cannot change order from {:?} to {:?}", order.status, next),
        )
        .into());
    }

    // Guarded on the status we validated against
    let updated = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1 AND status = $3")
        .bind(id)
        .bind(next)
        .bind(order.status)
        .execute(pool)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            "Order status changed concurrently",
        )
        .into());
    }

    order.status = next;
    Ok(order)
}

/// Record a completed charge; only pending orders can be paid
pub async fn set_paid(pool: &PgPool, id: i64, charge_id: &str) -> RepoResult<()> {
    let result = sqlx::query(
        "UPDATE orders SET status = 'paid', payment_charge_id = $2 \
         WHERE id = $1 AND status = 'pending'",
    )
    .bind(id)
    .bind(charge_id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::OrderAlreadyPaid).into());
    }
    Ok(())
}

pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
