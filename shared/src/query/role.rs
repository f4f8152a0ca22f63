//! Role list selection

use serde::{Deserialize, Serialize};

use super::pagination::{DEFAULT_PAGE_SIZE, PaginatedResponse, paginate};
use crate::models::{Role, RoleType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSort {
    Name,
    /// Most senior first; unranked roles last
    Hierarchy,
    /// Largest discount first
    Discount,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub role_type: Option<RoleType>,
    pub sort: Option<RoleSort>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl RoleQuery {
    pub fn matches(&self, role: &Role) -> bool {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        if needle.is_some_and(|n| !role.name.to_lowercase().contains(&n)) {
            return false;
        }
        self.role_type.is_none_or(|t| role.role_type == t)
    }

    pub fn select(&self, roles: &[Role]) -> PaginatedResponse<Role> {
        let mut selected: Vec<Role> = roles.iter().filter(|r| self.matches(r)).cloned().collect();
        match self.sort {
            Some(RoleSort::Name) => selected.sort_by_key(|r| r.name.to_lowercase()),
            Some(RoleSort::Hierarchy) => {
                selected.sort_by_key(|r| (r.hierarchy.is_none(), r.hierarchy))
            }
            Some(RoleSort::Discount) => {
                selected.sort_by_key(|r| std::cmp::Reverse(r.discount.unwrap_or(0)))
            }
            None => {}
        }
        paginate(
            &selected,
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            self.page.unwrap_or(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: i64, name: &str, role_type: RoleType, hierarchy: Option<i32>, discount: Option<i32>) -> Role {
        Role {
            id,
            name: name.into(),
            role_type,
            discount,
            hierarchy,
            special: false,
            permissions: vec![],
            created_at: id,
        }
    }

    fn roles() -> Vec<Role> {
        vec![
            role(1, "Gerente", RoleType::Team, Some(1), None),
            role(2, "Mayorista", RoleType::Client, None, Some(2500)),
            role(3, "Ventas", RoleType::Team, Some(3), None),
            role(4, "Minorista", RoleType::Client, None, Some(500)),
        ]
    }

    #[test]
    fn test_filter_by_type_and_search() {
        let query = RoleQuery {
            role_type: Some(RoleType::Client),
            search: Some("MAY".into()),
            ..Default::default()
        };
        let page = query.select(&roles());
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, 2);
    }

    #[test]
    fn test_hierarchy_sort_puts_unranked_last() {
        let query = RoleQuery {
            sort: Some(RoleSort::Hierarchy),
            ..Default::default()
        };
        let ids: Vec<i64> = query.select(&roles()).data.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_discount_sort() {
        let query = RoleQuery {
            sort: Some(RoleSort::Discount),
            role_type: Some(RoleType::Client),
            ..Default::default()
        };
        let ids: Vec<i64> = query.select(&roles()).data.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }
}
