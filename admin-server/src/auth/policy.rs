//! Authorization policy
//!
//! Single decision point consulted by the `require_permission` middleware
//! and by handlers that act on roles or users of other people.

use shared::error::{AppError, ErrorCode};
use shared::models::RoleType;
use shared::permission::{Session, has_permission};

use crate::auth::CurrentUser;
use crate::security_log;

pub trait AuthorizationPolicy: Send + Sync {
    /// Does `user` hold `permission`?
    fn authorize(&self, user: &CurrentUser, permission: &str) -> Result<(), AppError>;

    /// May `actor` create, edit or delete a role of this kind and rank?
    fn can_manage_role(
        &self,
        actor: &CurrentUser,
        target_type: RoleType,
        target_hierarchy: Option<i32>,
    ) -> Result<(), AppError>;
}

/// Permission tokens from the user's role plus the hierarchy rule
///
/// Lower `hierarchy` is more senior. Team roles can only be managed by a
/// strictly more senior actor; client roles have no rank.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePolicy;

/// `true` when `actor` outranks `target`
pub fn outranks(actor: Option<i32>, target: Option<i32>) -> bool {
    match (actor, target) {
        (Some(actor), Some(target)) => actor < target,
        // A team role without a rank is treated as the most junior
        (Some(_), None) => true,
        (None, _) => false,
    }
}

impl AuthorizationPolicy for RolePolicy {
    fn authorize(&self, user: &CurrentUser, permission: &str) -> Result<(), AppError> {
        let session = Session::for_user(user.clone());
        let check = has_permission(Some(&session), permission);
        if check.status {
            return Ok(());
        }
        security_log!(
            "WARN",
            "permission_denied",
            user_id = user.id,
            email = user.email.clone(),
            required_permission = permission
        );
        Err(AppError::forbidden(check.message).with_detail("permission", permission))
    }

    fn can_manage_role(
        &self,
        actor: &CurrentUser,
        target_type: RoleType,
        target_hierarchy: Option<i32>,
    ) -> Result<(), AppError> {
        if target_type == RoleType::Client {
            return Ok(());
        }
        let actor_rank = if actor.is_client() { None } else { actor.hierarchy };
        if outranks(actor_rank, target_hierarchy) {
            return Ok(());
        }
        security_log!(
            "WARN",
            "hierarchy_violation",
            user_id = actor.id,
            actor_hierarchy = format!("{:?}", actor.hierarchy),
            target_hierarchy = format!("{:?}", target_hierarchy)
        );
        Err(AppError::with_message(
            ErrorCode::HierarchyViolation,
            "No puedes gestionar un rol de igual o mayor jerarquía",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role_type: RoleType, hierarchy: Option<i32>, permissions: &[&str]) -> CurrentUser {
        CurrentUser {
            id: 7,
            name: "Luis".into(),
            email: "luis@example.com".into(),
            role_id: 3,
            role_name: "supervisor".into(),
            role_type,
            hierarchy,
            discount: None,
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_authorize() {
        let user = actor(RoleType::Team, Some(2), &["view_role"]);
        assert!(RolePolicy.authorize(&user, "view_role").is_ok());
        let err = RolePolicy.authorize(&user, "delete_role").unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_outranks() {
        assert!(outranks(Some(1), Some(2)));
        assert!(!outranks(Some(2), Some(2)));
        assert!(!outranks(Some(3), Some(2)));
        assert!(!outranks(None, Some(5)));
        assert!(outranks(Some(4), None));
    }

    #[test]
    fn test_team_roles_need_seniority() {
        let user = actor(RoleType::Team, Some(2), &[]);
        assert!(RolePolicy.can_manage_role(&user, RoleType::Team, Some(3)).is_ok());
        let err = RolePolicy
            .can_manage_role(&user, RoleType::Team, Some(2))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::HierarchyViolation);
        assert!(RolePolicy.can_manage_role(&user, RoleType::Team, Some(1)).is_err());
    }

    #[test]
    fn test_client_roles_have_no_rank() {
        let user = actor(RoleType::Team, Some(9), &[]);
        assert!(RolePolicy.can_manage_role(&user, RoleType::Client, None).is_ok());
    }

    #[test]
    fn test_client_actor_cannot_manage_team() {
        let user = actor(RoleType::Client, Some(0), &[]);
        assert!(RolePolicy.can_manage_role(&user, RoleType::Team, Some(5)).is_err());
    }
}
