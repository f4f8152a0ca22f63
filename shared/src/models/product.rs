//! Product Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Maximum allowed unit price in cents ($10,000,000.00)
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// Approval tag carried by a product
///
/// `admin` marks the product as published.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "approval_tag", rename_all = "lowercase"))]
pub enum ApprovalTag {
    Admin,
    Seo,
    Design,
}

impl ApprovalTag {
    pub const ALL: [ApprovalTag; 3] = [Self::Admin, Self::Seo, Self::Design];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Seo => "seo",
            Self::Design => "design",
        }
    }
}

impl fmt::Display for ApprovalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "seo" => Ok(Self::Seo),
            "design" => Ok(Self::Design),
            other => Err(format!("unknown approval tag: {other}")),
        }
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub description: Option<String>,
    /// Unit price in cents
    pub price: i64,
    pub stock: i32,
    pub category_id: i64,
    pub producer_id: i64,
    pub approval: Vec<ApprovalTag>,
    /// Object storage keys
    pub images: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    pub fn has_approval(&self, tag: ApprovalTag) -> bool {
        self.approval.contains(&tag)
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = MAX_PRICE_CENTS))]
    pub price: i64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: i32,
    pub category_id: i64,
    pub producer_id: i64,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub sku: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = MAX_PRICE_CENTS))]
    pub price: Option<i64>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub category_id: Option<i64>,
    pub producer_id: Option<i64>,
}

/// Approval toggle request (`POST /api/products/{id}/authorize`)
///
/// The tag is kept as a string so unknown tags surface as a domain error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalToggle {
    pub tag: String,
}
