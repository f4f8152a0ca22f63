//! User Repository

use shared::error::{AppError, ErrorCode};
use shared::models::{RoleType, SessionUser, User, UserCreate, UserUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::RepoResult;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role_id, active, payment_customer_id, created_at";

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM app_user ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM app_user WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM app_user WHERE lower(email) = lower($1)"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: i64,
    name: String,
    email: String,
    active: bool,
    role_id: i64,
    role_name: String,
    role_type: RoleType,
    hierarchy: Option<i32>,
    discount: Option<i32>,
    permissions: Vec<String>,
}

/// Load the user together with their role's current permissions
///
/// Returns the session user and whether the account is active.
pub async fn find_session_user(pool: &PgPool, id: i64) -> RepoResult<Option<(SessionUser, bool)>> {
    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT u.id, u.name, u.email, u.active, r.id AS role_id, r.name AS role_name, \
         r.role_type, r.hierarchy, r.discount, r.permissions \
         FROM app_user u JOIN role r ON r.id = u.role_id WHERE u.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| {
        (
            SessionUser {
                id: r.id,
                name: r.name,
                email: r.email,
                role_id: r.role_id,
                role_name: r.role_name,
                role_type: r.role_type,
                hierarchy: r.hierarchy,
                discount: r.discount,
                permissions: r.permissions,
            },
            r.active,
        )
    }))
}

pub async fn create(pool: &PgPool, data: &UserCreate, password_hash: &str) -> RepoResult<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO app_user (id, name, email, password_hash, role_id, active, created_at) \
         VALUES ($1, $2, $3, $4, $5, TRUE, $6) RETURNING {USER_COLUMNS}"
    ))
    .bind(snowflake_id())
    .bind(&data.name)
    .bind(data.email.to_lowercase())
    .bind(password_hash)
    .bind(data.role_id)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(user)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &UserUpdate,
    password_hash: Option<&str>,
) -> RepoResult<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE app_user SET name = COALESCE($2, name), email = COALESCE($3, email), \
         password_hash = COALESCE($4, password_hash), role_id = COALESCE($5, role_id), \
         active = COALESCE($6, active) WHERE id = $1 RETURNING {USER_COLUMNS}"
    ))
    .bind(id)
    .bind(data.name.as_deref())
    .bind(data.email.as_ref().map(|e| e.to_lowercase()))
    .bind(password_hash)
    .bind(data.role_id)
    .bind(data.active)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(user)
}

pub async fn set_payment_customer_id(pool: &PgPool, id: i64, customer_id: &str) -> RepoResult<()> {
    sqlx::query("UPDATE app_user SET payment_customer_id = $2 WHERE id = $1")
        .bind(id)
        .bind(customer_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM app_user WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
