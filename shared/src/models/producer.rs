//! Producer Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Producer (brand / manufacturer) entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Producer {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: i64,
}

/// Create / update producer payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProducerInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
}
