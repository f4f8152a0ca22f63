//! Permission Definitions
//!
//! Tokens follow `verb_object[_qualifier]`. Anything ending in `_special`
//! can only be granted to roles flagged `special`.

use shared::error::{AppError, ErrorCode};
use shared::models::{ApprovalTag, RoleType};
use shared::permission::PermissionName;

/// Every assignable permission
pub const ALL_PERMISSIONS: &[&str] = &[
    // === Roles & users (team only) ===
    "view_role",
    "create_role",
    "update_role",
    "delete_role",
    "view_user",
    "create_user",
    "update_user",
    "delete_user",
    // === Catalog ===
    "view_category",
    "create_category",
    "update_category",
    "delete_category",
    "view_producer",
    "create_producer",
    "update_producer",
    "delete_producer",
    "view_product",
    "create_product",
    "update_product",
    "delete_product",
    // === Product approval ===
    "authorize_product_design",
    "authorize_product_seo",
    "authorize_product_special", // publish (admin tag)
    // === Files ===
    "upload_file",
    "delete_file",
    // === Quotations ===
    "view_quotation",
    "create_quotation",
    "update_quotation",
    "delete_quotation",
    "comment_quotation",
    // === Orders & payments ===
    "view_order",
    "create_order",
    "update_order",
    "delete_order_special",
    "pay_order",
];

/// Objects whose permissions only make sense for staff
const TEAM_ONLY_OBJECTS: &[&str] = &["role", "user"];

/// Default permissions for a new client role
pub const DEFAULT_CLIENT_PERMISSIONS: &[&str] = &[
    "view_product",
    "view_category",
    "view_producer",
    "view_quotation",
    "create_quotation",
    "update_quotation",
    "comment_quotation",
    "view_order",
    "create_order",
    "pay_order",
];

/// Default permissions for a new (non-special) team role
pub const DEFAULT_TEAM_PERMISSIONS: &[&str] = &[
    "view_product",
    "create_product",
    "update_product",
    "view_category",
    "view_producer",
    "view_quotation",
    "comment_quotation",
    "view_order",
    "upload_file",
];

pub fn get_default_permissions(role_type: RoleType) -> Vec<String> {
    let defaults = match role_type {
        RoleType::Team => DEFAULT_TEAM_PERMISSIONS,
        RoleType::Client => DEFAULT_CLIENT_PERMISSIONS,
    };
    defaults.iter().map(|s| s.to_string()).collect()
}

pub fn is_valid_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
}

/// Permission required to toggle an approval tag
pub fn approval_permission(tag: ApprovalTag) -> &'static str {
    match tag {
        ApprovalTag::Design => "authorize_product_design",
        ApprovalTag::Seo => "authorize_product_seo",
        ApprovalTag::Admin => "authorize_product_special",
    }
}

/// Check a permission list before it is stored on a role
///
/// - every token must be in [`ALL_PERMISSIONS`]
/// - `*_special` tokens need `special = true`
/// - client roles cannot hold role/user management tokens
pub fn validate_role_permissions(
    role_type: RoleType,
    special: bool,
    permissions: &[String],
) -> Result<(), AppError> {
    for perm in permissions {
        let parsed = PermissionName::parse(perm)
            .filter(|_| is_valid_permission(perm))
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidPermission,
                    format!("Invalid permission: {perm}"),
                )
                .with_detail("permission", perm.as_str())
            })?;

        if parsed.is_special() && !special {
            return Err(AppError::with_message(
                ErrorCode::SpecialPermissionRequired,
                format!("Permission '{perm}' requires a special role"),
            )
            .with_detail("permission", perm.as_str()));
        }

        if role_type == RoleType::Client && TEAM_ONLY_OBJECTS.contains(&parsed.object.as_str()) {
            return Err(AppError::with_message(
                ErrorCode::InvalidPermission,
                format!("Permission '{perm}' cannot be granted to a client role"),
            )
            .with_detail("permission", perm.as_str()));
        }
    }
    Ok(())
}
