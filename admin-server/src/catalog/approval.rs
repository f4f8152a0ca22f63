//! Product approval workflow
//!
//! A product carries a set of approval tags. Each tag is toggled
//! independently; `admin` marks the product as published.

use shared::models::{ApprovalTag, Product};

/// Remove `tag` if present, otherwise append it
///
/// Other tags keep their relative order. Applying the same toggle twice
/// returns the original set.
pub fn toggle_approval(approval: &[ApprovalTag], tag: ApprovalTag) -> Vec<ApprovalTag> {
    if approval.contains(&tag) {
        approval.iter().copied().filter(|t| *t != tag).collect()
    } else {
        let mut next = approval.to_vec();
        next.push(tag);
        next
    }
}

pub fn is_published(product: &Product) -> bool {
    product.has_approval(ApprovalTag::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn as_set(tags: &[ApprovalTag]) -> HashSet<ApprovalTag> {
        tags.iter().copied().collect()
    }

    #[test]
    fn test_toggle_adds_missing_tag() {
        let next = toggle_approval(&[ApprovalTag::Design], ApprovalTag::Seo);
        assert_eq!(next, vec![ApprovalTag::Design, ApprovalTag::Seo]);
    }

    #[test]
    fn test_toggle_removes_present_tag() {
        let next = toggle_approval(&[ApprovalTag::Design, ApprovalTag::Seo], ApprovalTag::Design);
        assert_eq!(next, vec![ApprovalTag::Seo]);
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let start = vec![ApprovalTag::Seo, ApprovalTag::Admin];
        for tag in ApprovalTag::ALL {
            let twice = toggle_approval(&toggle_approval(&start, tag), tag);
            assert_eq!(as_set(&twice), as_set(&start), "{tag}");
        }
        let empty: Vec<ApprovalTag> = vec![];
        assert_eq!(
            toggle_approval(&toggle_approval(&empty, ApprovalTag::Admin), ApprovalTag::Admin),
            empty
        );
    }

    #[test]
    fn test_published_means_admin_tag() {
        let mut product = Product {
            id: 1,
            name: "Mezcal".into(),
            slug: "mezcal".into(),
            sku: "MZ-1".into(),
            description: None,
            price: 45_000,
            stock: 3,
            category_id: 1,
            producer_id: 1,
            approval: vec![ApprovalTag::Seo, ApprovalTag::Design],
            images: vec![],
            created_at: 0,
            updated_at: 0,
        };
        assert!(!is_published(&product));
        product.approval = toggle_approval(&product.approval, ApprovalTag::Admin);
        assert!(is_published(&product));
    }

    #[test]
    fn test_tags_are_independent() {
        let a = toggle_approval(&toggle_approval(&[], ApprovalTag::Seo), ApprovalTag::Design);
        let b = toggle_approval(&toggle_approval(&[], ApprovalTag::Design), ApprovalTag::Seo);
        assert_eq!(as_set(&a), as_set(&b));
    }
}
