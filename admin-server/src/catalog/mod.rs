//! Catalog domain logic: approval workflow and product image processing

pub mod approval;
pub mod images;

pub use approval::{is_published, toggle_approval};
