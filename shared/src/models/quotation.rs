//! Quotation Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Quotation lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "quotation_status", rename_all = "lowercase"))]
pub enum QuotationStatus {
    Open,
    /// An order was created from it; items are frozen
    Ordered,
}

/// Maximum allowed quantity per quotation line
pub const MAX_QUANTITY: i32 = 100_000;

/// Quotation item (product + quantity, priced live)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct QuotationItem {
    pub product_id: i64,
    #[validate(range(min = 1, max = MAX_QUANTITY))]
    pub quantity: i32,
}

/// Quotation entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Quotation {
    pub id: i64,
    /// Client user the quotation is priced for
    pub user_id: i64,
    pub status: QuotationStatus,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<QuotationItem>,
    pub created_at: i64,
}

/// Create quotation payload
///
/// `user_id` defaults to the caller; staff may quote on behalf of a client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuotationCreate {
    pub user_id: Option<i64>,
    #[validate(length(min = 1), nested)]
    pub items: Vec<QuotationItem>,
}

/// Replace the items of an open quotation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuotationUpdate {
    #[validate(length(min = 1), nested)]
    pub items: Vec<QuotationItem>,
}

/// Comment left on a quotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct QuotationComment {
    pub id: i64,
    pub quotation_id: i64,
    pub user_id: i64,
    pub body: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentCreate {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}
