//! Permission evaluation
//!
//! Permission names are tokens of the form `verb_object[_qualifier]`
//! (`view_product`, `authorize_product_seo`, `delete_order_special`).
//! A token whose qualifier is `special` may only be granted to roles
//! flagged as special.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::SessionUser;

/// Qualifier that marks a permission as special
pub const SPECIAL_QUALIFIER: &str = "special";

/// Parsed permission token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionName {
    pub verb: String,
    pub object: String,
    pub qualifier: Option<String>,
}

impl PermissionName {
    /// Parse `verb_object[_qualifier]`; each segment is lowercase ASCII letters
    pub fn parse(token: &str) -> Option<Self> {
        let segments: Vec<&str> = token.split('_').collect();
        if !(2..=3).contains(&segments.len()) {
            return None;
        }
        if segments
            .iter()
            .any(|s| s.is_empty() || !s.bytes().all(|b| b.is_ascii_lowercase()))
        {
            return None;
        }
        Some(Self {
            verb: segments[0].to_string(),
            object: segments[1].to_string(),
            qualifier: segments.get(2).map(|s| s.to_string()),
        })
    }

    pub fn is_special(&self) -> bool {
        self.qualifier.as_deref() == Some(SPECIAL_QUALIFIER)
    }
}

impl fmt::Display for PermissionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.verb, self.object)?;
        if let Some(q) = &self.qualifier {
            write!(f, "_{q}")?;
        }
        Ok(())
    }
}

/// Token-level shortcut for [`PermissionName::is_special`]
pub fn is_special_permission(token: &str) -> bool {
    PermissionName::parse(token).is_some_and(|p| p.is_special())
}

/// Session snapshot handed to the evaluator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn for_user(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }
}

/// Evaluator outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCheck {
    pub status: bool,
    pub message: String,
}

impl PermissionCheck {
    fn granted() -> Self {
        Self {
            status: true,
            message: "Autorizado".to_string(),
        }
    }

    fn denied(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
        }
    }
}

/// Check whether the session's user holds `permission`
pub fn has_permission(session: Option<&Session>, permission: &str) -> PermissionCheck {
    let Some(session) = session else {
        return PermissionCheck::denied("No hay una sesión activa");
    };
    let Some(user) = session.user.as_ref() else {
        return PermissionCheck::denied("La sesión no tiene un usuario");
    };
    if user.has_permission(permission) {
        PermissionCheck::granted()
    } else {
        PermissionCheck::denied(format!("No tienes el permiso {permission}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleType;

    fn user(permissions: &[&str]) -> SessionUser {
        SessionUser {
            id: 1,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role_id: 10,
            role_name: "ventas".into(),
            role_type: RoleType::Team,
            hierarchy: Some(2),
            discount: None,
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_no_session_is_denied() {
        let check = has_permission(None, "view_product");
        assert!(!check.status);
        assert!(!check.message.is_empty());
    }

    #[test]
    fn test_session_without_user_is_denied() {
        let check = has_permission(Some(&Session::default()), "view_product");
        assert!(!check.status);
    }

    #[test]
    fn test_missing_token_is_denied() {
        let session = Session::for_user(user(&["view_product"]));
        let check = has_permission(Some(&session), "delete_product");
        assert!(!check.status);
        assert!(check.message.contains("delete_product"));
    }

    #[test]
    fn test_present_token_is_granted() {
        let session = Session::for_user(user(&["view_product", "update_product"]));
        assert!(has_permission(Some(&session), "update_product").status);
    }

    #[test]
    fn test_parse_tokens() {
        let p = PermissionName::parse("view_product").unwrap();
        assert_eq!(p.verb, "view");
        assert_eq!(p.object, "product");
        assert!(p.qualifier.is_none());
        assert!(!p.is_special());

        let p = PermissionName::parse("delete_order_special").unwrap();
        assert!(p.is_special());
        assert_eq!(p.to_string(), "delete_order_special");

        let p = PermissionName::parse("authorize_product_seo").unwrap();
        assert_eq!(p.qualifier.as_deref(), Some("seo"));
        assert!(!p.is_special());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(PermissionName::parse("view").is_none());
        assert!(PermissionName::parse("view__product").is_none());
        assert!(PermissionName::parse("View_product").is_none());
        assert!(PermissionName::parse("a_b_c_d").is_none());
        assert!(PermissionName::parse("").is_none());
    }

    #[test]
    fn test_is_special_permission() {
        assert!(is_special_permission("authorize_product_special"));
        assert!(!is_special_permission("authorize_product_design"));
        assert!(!is_special_permission("special"));
    }
}
