//! Data models
//!
//! Shared between admin-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, timestamps are Unix millis, money is cents.

pub mod category;
pub mod order;
pub mod producer;
pub mod product;
pub mod quotation;
pub mod role;
pub mod user;

// Re-exports
pub use category::*;
pub use order::*;
pub use producer::*;
pub use product::*;
pub use quotation::*;
pub use role::*;
pub use user::*;
