//! Quotation Repository
//!
//! Items live in `quotation_item` keyed by (quotation, product) and keep
//! their insertion order through `position`.

use std::collections::HashMap;

use shared::error::{AppError, ErrorCode};
use shared::models::{Quotation, QuotationComment, QuotationItem, QuotationStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgPool, Postgres, Transaction};

use super::RepoResult;
use crate::pricing::money::validate_quantity;

const QUOTATION_COLUMNS: &str = "id, user_id, status, created_at";

#[derive(sqlx::FromRow)]
struct ItemRow {
    quotation_id: i64,
    product_id: i64,
    quantity: i32,
}

/// Collapse repeated products into one line, first occurrence wins the slot
///
/// Summed quantities must still be priceable, so each merged line is
/// checked against the per-line quantity limit.
pub fn merge_items(items: &[QuotationItem]) -> Result<Vec<QuotationItem>, AppError> {
    let mut merged: Vec<QuotationItem> = Vec::with_capacity(items.len());
    for item in items {
        match merged.iter_mut().find(|m| m.product_id == item.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => merged.push(item.clone()),
        }
    }
    for item in &merged {
        validate_quantity(item.quantity).map_err(|e| {
            AppError::from(e).with_detail("product_id", item.product_id)
        })?;
    }
    Ok(merged)
}

async fn load_items(pool: &PgPool, quotations: &mut [Quotation]) -> RepoResult<()> {
    if quotations.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = quotations.iter().map(|q| q.id).collect();
    let rows = sqlx::query_as::<_, ItemRow>(
        "SELECT quotation_id, product_id, quantity FROM quotation_item \
         WHERE quotation_id = ANY($1) ORDER BY quotation_id, position",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    let mut by_quotation: HashMap<i64, Vec<QuotationItem>> = HashMap::new();
    for row in rows {
        by_quotation
            .entry(row.quotation_id)
            .or_default()
            .push(QuotationItem {
                product_id: row.product_id,
                quantity: row.quantity,
            });
    }
    for quotation in quotations.iter_mut() {
        quotation.items = by_quotation.remove(&quotation.id).unwrap_or_default();
    }
    Ok(())
}

async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    quotation_id: i64,
    items: &[QuotationItem],
) -> RepoResult<()> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO quotation_item (quotation_id, position, product_id, quantity) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(quotation_id)
        .bind(position as i32)
        .bind(item.product_id)
        .bind(item.quantity)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// All quotations, or only those owned by `user_id`
pub async fn find_all(pool: &PgPool, user_id: Option<i64>) -> RepoResult<Vec<Quotation>> {
    let mut quotations = sqlx::query_as::<_, Quotation>(&format!(
        "SELECT {QUOTATION_COLUMNS} FROM quotation \
         WHERE ($1::BIGINT IS NULL OR user_id = $1) ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    load_items(pool, &mut quotations).await?;
    Ok(quotations)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<Quotation>> {
    let quotation = sqlx::query_as::<_, Quotation>(&format!(
        "SELECT {QUOTATION_COLUMNS} FROM quotation WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let mut found: Vec<Quotation> = quotation.into_iter().collect();
    load_items(pool, &mut found).await?;
    Ok(found.pop())
}

pub async fn create(pool: &PgPool, user_id: i64, items: &[QuotationItem]) -> RepoResult<Quotation> {
    let items = merge_items(items)?;
    let mut tx = pool.begin().await?;

    let mut quotation = sqlx::query_as::<_, Quotation>(&format!(
        "INSERT INTO quotation (id, user_id, status, created_at) VALUES ($1, $2, 'open', $3) \
         RETURNING {QUOTATION_COLUMNS}"
    ))
    .bind(snowflake_id())
    .bind(user_id)
    .bind(now_millis())
    .fetch_one(&mut *tx)
    .await?;

    insert_items(&mut tx, quotation.id, &items).await?;
    tx.commit().await?;

    quotation.items = items;
    Ok(quotation)
}

/// Swap the item list of an open quotation
pub async fn replace_items(pool: &PgPool, id: i64, items: &[QuotationItem]) -> RepoResult<Quotation> {
    let items = merge_items(items)?;
    let mut tx = pool.begin().await?;

    let mut quotation = sqlx::query_as::<_, Quotation>(&format!(
        "SELECT {QUOTATION_COLUMNS} FROM quotation WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::QuotationNotFound))?;

    if quotation.status != QuotationStatus::Open {
        return Err(AppError::new(ErrorCode::QuotationAlreadyOrdered).into());
    }

    sqlx::query("DELETE FROM quotation_item WHERE quotation_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    insert_items(&mut tx, id, &items).await?;
    tx.commit().await?;

    quotation.items = items;
    Ok(quotation)
}

pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM quotation WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn add_comment(
    pool: &PgPool,
    quotation_id: i64,
    user_id: i64,
    body: &str,
) -> RepoResult<QuotationComment> {
    let comment = sqlx::query_as::<_, QuotationComment>(
        "INSERT INTO quotation_comment (id, quotation_id, user_id, body, created_at) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id, quotation_id, user_id, body, created_at",
    )
    .bind(snowflake_id())
    .bind(quotation_id)
    .bind(user_id)
    .bind(body)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(comment)
}

pub async fn find_comments(pool: &PgPool, quotation_id: i64) -> RepoResult<Vec<QuotationComment>> {
    let comments = sqlx::query_as::<_, QuotationComment>(
        "SELECT id, quotation_id, user_id, body, created_at FROM quotation_comment \
         WHERE quotation_id = $1 ORDER BY created_at",
    )
    .bind(quotation_id)
    .fetch_all(pool)
    .await?;
    Ok(comments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: i64, quantity: i32) -> QuotationItem {
        QuotationItem {
            product_id,
            quantity,
        }
    }

    #[test]
    fn test_merge_items_sums_duplicates() {
        let merged = merge_items(&[item(1, 2), item(2, 1), item(1, 3)]).unwrap();
        assert_eq!(merged, vec![item(1, 5), item(2, 1)]);
    }

    #[test]
    fn test_merge_items_keeps_order() {
        let merged = merge_items(&[item(9, 1), item(3, 1), item(5, 1)]).unwrap();
        let ids: Vec<i64> = merged.iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![9, 3, 5]);
    }

    #[test]
    fn test_merge_items_rejects_summed_quantity_over_limit() {
        let err = merge_items(&[item(1, 100_000), item(1, 100_000)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.code.http_status(), http::StatusCode::BAD_REQUEST);

        let merged = merge_items(&[item(1, 60_000), item(1, 40_000)]).unwrap();
        assert_eq!(merged, vec![item(1, 100_000)]);
    }
}
