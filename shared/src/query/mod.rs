//! List selection: filter, sort and paginate in-memory lists
//!
//! A query object is deserialized once from request parameters and never
//! mutated; [`ProductQuery::select`] / [`RoleQuery::select`] are pure.

mod pagination;
mod params;
mod product;
mod role;

pub use pagination::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PaginatedResponse, clamp_page_size, paginate,
};
pub use product::{ApprovalFilter, ProductQuery, ProductSort};
pub use role::{RoleQuery, RoleSort};
