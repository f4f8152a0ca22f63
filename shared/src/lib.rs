//! Shared types for the admin backend
//!
//! Domain models, the unified error system, the permission evaluator and
//! the pure list-selection logic (filter / sort / paginate) used by both
//! the server and any client.

pub mod error;
pub mod models;
pub mod permission;
pub mod query;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use permission::{PermissionCheck, PermissionName, Session, has_permission};
pub use query::{PaginatedResponse, ProductQuery, RoleQuery, paginate};
pub use serde::{Deserialize, Serialize};
