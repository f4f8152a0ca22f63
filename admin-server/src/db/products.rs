//! Product Repository

use std::collections::HashMap;

use shared::error::{AppError, ErrorCode};
use shared::models::{ApprovalTag, Product, ProductCreate, ProductUpdate};
use shared::util::{now_millis, slug_or_id, snowflake_id};
use sqlx::PgPool;

use super::RepoResult;

const PRODUCT_COLUMNS: &str = "id, name, slug, sku, description, price, stock, category_id, \
     producer_id, approval, images, created_at, updated_at";

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

/// Batch lookup keyed by id; unknown ids are simply absent
pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> RepoResult<HashMap<i64, Product>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ANY($1)"
    ))
    .bind(ids.to_vec())
    .fetch_all(pool)
    .await?;
    Ok(products.into_iter().map(|p| (p.id, p)).collect())
}

pub async fn create(pool: &PgPool, data: &ProductCreate) -> RepoResult<Product> {
    let id = snowflake_id();
    let now = now_millis();
    let product = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO product (id, name, slug, sku, description, price, stock, category_id, \
         producer_id, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10) RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(&data.name)
    .bind(slug_or_id(&data.name, id))
    .bind(&data.sku)
    .bind(data.description.as_deref())
    .bind(data.price)
    .bind(data.stock)
    .bind(data.category_id)
    .bind(data.producer_id)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(product)
}

/// Partial update; a new name also regenerates the slug
pub async fn update(pool: &PgPool, id: i64, data: &ProductUpdate) -> RepoResult<Product> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE product SET name = COALESCE($2, name), slug = COALESCE($3, slug), \
         sku = COALESCE($4, sku), description = COALESCE($5, description), \
         price = COALESCE($6, price), stock = COALESCE($7, stock), \
         category_id = COALESCE($8, category_id), producer_id = COALESCE($9, producer_id), \
         updated_at = $10 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(data.name.as_deref())
    .bind(data.name.as_deref().map(|name| slug_or_id(name, id)))
    .bind(data.sku.as_deref())
    .bind(data.description.as_deref())
    .bind(data.price)
    .bind(data.stock)
    .bind(data.category_id)
    .bind(data.producer_id)
    .bind(now_millis())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(product)
}

/// Replace the approval set as a whole
pub async fn set_approval(pool: &PgPool, id: i64, approval: Vec<ApprovalTag>) -> RepoResult<Product> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE product SET approval = $2, updated_at = $3 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(approval)
    .bind(now_millis())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(product)
}

pub async fn add_images(pool: &PgPool, id: i64, keys: Vec<String>) -> RepoResult<Product> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE product SET images = array_cat(images, $2), updated_at = $3 \
         WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(keys)
    .bind(now_millis())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(product)
}

pub async fn remove_image(pool: &PgPool, id: i64, key: &str) -> RepoResult<Product> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE product SET images = array_remove(images, $2), updated_at = $3 \
         WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(key)
    .bind(now_millis())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(product)
}

pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM product WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
