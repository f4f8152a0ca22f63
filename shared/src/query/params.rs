//! Query-string list decoding
//!
//! Query strings carry lists as comma-separated values (`categories=1,2`),
//! which `serde_urlencoded` cannot decode into a `Vec` by itself.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::str::FromStr;

use crate::models::ApprovalTag;
use super::product::ApprovalFilter;

fn split(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// `"1,2,3"` → `vec![1, 2, 3]`; missing or empty → empty
pub fn comma_separated<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.as_deref()
        .map(|s| split(s).map(|v| v.parse().map_err(de::Error::custom)).collect())
        .unwrap_or_else(|| Ok(Vec::new()))
}

/// `"seo:true,admin:false"` → approval filters; a bare tag means `approved`
pub fn approval_filters<'de, D>(deserializer: D) -> Result<Vec<ApprovalFilter>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    split(&raw)
        .map(|entry| {
            let (tag, approved) = match entry.split_once(':') {
                Some((tag, flag)) => {
                    let approved = flag.parse::<bool>().map_err(de::Error::custom)?;
                    (tag, approved)
                }
                None => (entry, true),
            };
            let tag = tag.parse::<ApprovalTag>().map_err(de::Error::custom)?;
            Ok(ApprovalFilter { tag, approved })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::models::ApprovalTag;
    use crate::query::ProductQuery;

    #[test]
    fn test_decode_lists() {
        let query: ProductQuery = serde_json::from_value(serde_json::json!({
            "categories": "1, 2,,3",
            "approval": "seo:true,admin:false,design",
            "sort": "price_asc"
        }))
        .unwrap();
        assert_eq!(query.categories, vec![1, 2, 3]);
        assert!(query.producers.is_empty());
        assert_eq!(query.approval.len(), 3);
        assert_eq!(query.approval[1].tag, ApprovalTag::Admin);
        assert!(!query.approval[1].approved);
        assert!(query.approval[2].approved);
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        let result: Result<ProductQuery, _> =
            serde_json::from_value(serde_json::json!({ "approval": "published" }));
        assert!(result.is_err());
    }
}
