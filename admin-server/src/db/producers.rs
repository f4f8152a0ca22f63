//! Producer Repository

use shared::error::{AppError, ErrorCode};
use shared::models::{Producer, ProducerInput};
use shared::util::{now_millis, slug_or_id, snowflake_id};
use sqlx::PgPool;

use super::RepoResult;

const PRODUCER_COLUMNS: &str = "id, name, slug, created_at";

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<Producer>> {
    let producers = sqlx::query_as::<_, Producer>(&format!(
        "SELECT {PRODUCER_COLUMNS} FROM producer ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(producers)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<Producer>> {
    let producer = sqlx::query_as::<_, Producer>(&format!(
        "SELECT {PRODUCER_COLUMNS} FROM producer WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(producer)
}

pub async fn create(pool: &PgPool, data: &ProducerInput) -> RepoResult<Producer> {
    let id = snowflake_id();
    let producer = sqlx::query_as::<_, Producer>(&format!(
        "INSERT INTO producer (id, name, slug, created_at) VALUES ($1, $2, $3, $4) \
         RETURNING {PRODUCER_COLUMNS}"
    ))
    .bind(id)
    .bind(&data.name)
    .bind(slug_or_id(&data.name, id))
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(producer)
}

pub async fn update(pool: &PgPool, id: i64, data: &ProducerInput) -> RepoResult<Producer> {
    let producer = sqlx::query_as::<_, Producer>(&format!(
        "UPDATE producer SET name = $2, slug = $3 WHERE id = $1 RETURNING {PRODUCER_COLUMNS}"
    ))
    .bind(id)
    .bind(&data.name)
    .bind(slug_or_id(&data.name, id))
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::ProducerNotFound))?;
    Ok(producer)
}

/// Delete a producer no product belongs to
pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<bool> {
    let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE producer_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if products > 0 {
        return Err(AppError::with_message(
            ErrorCode::ProducerHasProducts,
            format!("Producer has {products} product(s)"),
        )
        .into());
    }

    let result = sqlx::query("DELETE FROM producer WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
