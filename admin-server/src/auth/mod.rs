//! Authentication and authorization
//!
//! - [`jwt`]: token issue / validation
//! - [`middleware`]: `require_auth` (token + session reload) and `require_permission`
//! - [`permissions`]: permission catalog and role assignment rules
//! - [`policy`]: [`AuthorizationPolicy`] and the hierarchy rule

pub mod jwt;
pub mod middleware;
pub mod permissions;
pub mod policy;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};
pub use policy::{AuthorizationPolicy, RolePolicy};

/// Authenticated user injected by [`require_auth`]
pub use shared::models::SessionUser as CurrentUser;
