//! Role Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Largest discount a client role may carry (100%)
pub const MAX_DISCOUNT_BASIS_POINTS: i32 = 10_000;

/// Role kind: staff (`team`) or customer (`client`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "role_type", rename_all = "lowercase"))]
pub enum RoleType {
    Team,
    Client,
}

/// Role entity (RBAC)
///
/// `discount` only applies to client roles, `hierarchy` only to team roles;
/// the repository stores the other one as NULL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub role_type: RoleType,
    /// Discount in basis points (10000 = 100%)
    pub discount: Option<i32>,
    /// Rank among team roles, lower is more senior
    pub hierarchy: Option<i32>,
    /// Whether `*_special` permissions may be granted to this role
    pub special: bool,
    pub permissions: Vec<String>,
    pub created_at: i64,
}

impl Role {
    /// Discount applied at quotation/order time (team roles never get one)
    pub fn effective_discount(&self) -> i32 {
        match self.role_type {
            RoleType::Client => self.discount.unwrap_or(0),
            RoleType::Team => 0,
        }
    }
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoleCreate {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[serde(rename = "type")]
    pub role_type: RoleType,
    #[validate(range(min = 0, max = 10000))]
    pub discount: Option<i32>,
    #[validate(range(min = 0))]
    pub hierarchy: Option<i32>,
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Update role payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RoleUpdate {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 10000))]
    pub discount: Option<i32>,
    #[validate(range(min = 0))]
    pub hierarchy: Option<i32>,
    pub special: Option<bool>,
    pub permissions: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(role_type: RoleType, discount: Option<i32>) -> Role {
        Role {
            id: 1,
            name: "mayorista".into(),
            role_type,
            discount,
            hierarchy: None,
            special: false,
            permissions: vec![],
            created_at: 0,
        }
    }

    #[test]
    fn test_effective_discount() {
        assert_eq!(role(RoleType::Client, Some(2500)).effective_discount(), 2500);
        assert_eq!(role(RoleType::Client, None).effective_discount(), 0);
        assert_eq!(role(RoleType::Team, Some(2500)).effective_discount(), 0);
    }

    #[test]
    fn test_role_type_serializes_as_type() {
        let json = serde_json::to_value(role(RoleType::Client, Some(100))).unwrap();
        assert_eq!(json["type"], "client");
        assert_eq!(json["discount"], 100);
    }

    #[test]
    fn test_create_validation_rejects_discount_over_100_percent() {
        let payload = RoleCreate {
            name: "vip".into(),
            role_type: RoleType::Client,
            discount: Some(10_001),
            hierarchy: None,
            special: false,
            permissions: vec![],
        };
        assert!(payload.validate().is_err());
    }
}
