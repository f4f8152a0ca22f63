//! Admin Server - e-commerce administration backend
//!
//! # Modules
//!
//! ```text
//! admin-server/src/
//! ├── api/       # HTTP routes and handlers
//! ├── auth/      # JWT, permission catalog, authorization policy
//! ├── catalog/   # approval workflow, product images
//! ├── db/        # PostgreSQL repositories
//! ├── payment/   # payment gateway (Openpay)
//! ├── pricing/   # discounts, tax, order snapshots
//! ├── storage/   # S3 object storage
//! └── utils/     # logging, password hashing
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod payment;
pub mod pricing;
pub mod state;
pub mod storage;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use config::{BoxError, Config};
pub use error::{RepoError, RepoResult};
pub use state::ServerState;
pub use utils::init_logger_with_file;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Security event, routed to the `security` log target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
