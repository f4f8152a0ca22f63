//! Role Repository

use shared::error::{AppError, ErrorCode};
use shared::models::{Role, RoleCreate, RoleType, RoleUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::RepoResult;

const ROLE_COLUMNS: &str =
    "id, name, role_type, discount, hierarchy, special, permissions, created_at";

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>(&format!(
        "SELECT {ROLE_COLUMNS} FROM role ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<Role>> {
    let role = sqlx::query_as::<_, Role>(&format!("SELECT {ROLE_COLUMNS} FROM role WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(role)
}

/// Drop the field that does not apply to the role type
fn normalize(role_type: RoleType, discount: Option<i32>, hierarchy: Option<i32>) -> (Option<i32>, Option<i32>) {
    match role_type {
        RoleType::Team => (None, hierarchy),
        RoleType::Client => (Some(discount.unwrap_or(0)), None),
    }
}

pub async fn create(pool: &PgPool, data: RoleCreate) -> RepoResult<Role> {
    let (discount, hierarchy) = normalize(data.role_type, data.discount, data.hierarchy);

    let role = sqlx::query_as::<_, Role>(&format!(
        "INSERT INTO role (id, name, role_type, discount, hierarchy, special, permissions, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {ROLE_COLUMNS}"
    ))
    .bind(snowflake_id())
    .bind(&data.name)
    .bind(data.role_type)
    .bind(discount)
    .bind(hierarchy)
    .bind(data.special)
    .bind(&data.permissions)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(role)
}

/// Partial update; `existing` supplies the role type used to normalize
pub async fn update(pool: &PgPool, existing: &Role, data: RoleUpdate) -> RepoResult<Role> {
    let (discount, hierarchy) = normalize(
        existing.role_type,
        data.discount.or(existing.discount),
        data.hierarchy.or(existing.hierarchy),
    );

    let role = sqlx::query_as::<_, Role>(&format!(
        "UPDATE role SET name = COALESCE($2, name), discount = $3, hierarchy = $4, \
         special = COALESCE($5, special), permissions = COALESCE($6, permissions) \
         WHERE id = $1 RETURNING {ROLE_COLUMNS}"
    ))
    .bind(existing.id)
    .bind(data.name)
    .bind(discount)
    .bind(hierarchy)
    .bind(data.special)
    .bind(data.permissions)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound))?;
    Ok(role)
}

/// Delete a role nobody uses
pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<bool> {
    let in_use: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_user WHERE role_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if in_use > 0 {
        return Err(AppError::with_message(
            ErrorCode::RoleInUse,
            format!("Role is assigned to {in_use} user(s)"),
        )
        .into());
    }

    let result = sqlx::query("DELETE FROM role WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(RoleType::Team, Some(500), Some(2)), (None, Some(2)));
        assert_eq!(normalize(RoleType::Client, Some(500), Some(2)), (Some(500), None));
        assert_eq!(normalize(RoleType::Client, None, None), (Some(0), None));
    }
}
