//! PostgreSQL repositories
//!
//! One module per table family. Functions take the pool explicitly and
//! return [`RepoResult`]; multi-row writes run in a single transaction.

pub mod categories;
pub mod orders;
pub mod producers;
pub mod products;
pub mod quotations;
pub mod roles;
pub mod users;

pub use crate::error::{RepoError, RepoResult};
