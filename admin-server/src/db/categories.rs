//! Category Repository

use shared::error::{AppError, ErrorCode};
use shared::models::{Category, CategoryInput};
use shared::util::{now_millis, slug_or_id, snowflake_id};
use sqlx::PgPool;

use super::RepoResult;

const CATEGORY_COLUMNS: &str = "id, name, slug, created_at";

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM category ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM category WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn create(pool: &PgPool, data: &CategoryInput) -> RepoResult<Category> {
    let id = snowflake_id();
    let category = sqlx::query_as::<_, Category>(&format!(
        "INSERT INTO category (id, name, slug, created_at) VALUES ($1, $2, $3, $4) \
         RETURNING {CATEGORY_COLUMNS}"
    ))
    .bind(id)
    .bind(&data.name)
    .bind(slug_or_id(&data.name, id))
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(category)
}

pub async fn update(pool: &PgPool, id: i64, data: &CategoryInput) -> RepoResult<Category> {
    let category = sqlx::query_as::<_, Category>(&format!(
        "UPDATE category SET name = $2, slug = $3 WHERE id = $1 RETURNING {CATEGORY_COLUMNS}"
    ))
    .bind(id)
    .bind(&data.name)
    .bind(slug_or_id(&data.name, id))
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    Ok(category)
}

/// Delete a category no product belongs to
pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<bool> {
    let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE category_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if products > 0 {
        return Err(AppError::with_message(
            ErrorCode::CategoryHasProducts,
            format!("Category has {products} product(s)"),
        )
        .into());
    }

    let result = sqlx::query("DELETE FROM category WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
