//! Product list selection

use serde::{Deserialize, Serialize};

use super::pagination::{DEFAULT_PAGE_SIZE, PaginatedResponse, paginate};
use super::params;
use crate::models::{ApprovalTag, Product};

/// Require (`approved = true`) or exclude (`approved = false`) an approval tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalFilter {
    pub tag: ApprovalTag,
    pub approved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    StockAsc,
    StockDesc,
    Newest,
    Oldest,
}

/// Immutable product list query
///
/// Every filter is optional; inactive filters (empty list, `None`, blank
/// search) match everything and active ones are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive substring over name, sku and slug
    pub search: Option<String>,
    #[serde(default, deserialize_with = "params::comma_separated")]
    pub categories: Vec<i64>,
    #[serde(default, deserialize_with = "params::comma_separated")]
    pub producers: Vec<i64>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    #[serde(default, deserialize_with = "params::approval_filters")]
    pub approval: Vec<ApprovalFilter>,
    /// `None` keeps the input order
    pub sort: Option<ProductSort>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ProductQuery {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(needle) = self.search_needle() {
            let hit = [&product.name, &product.sku, &product.slug]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if !self.categories.is_empty() && !self.categories.contains(&product.category_id) {
            return false;
        }
        if !self.producers.is_empty() && !self.producers.contains(&product.producer_id) {
            return false;
        }
        if self.min_stock.is_some_and(|min| product.stock < min) {
            return false;
        }
        if self.max_stock.is_some_and(|max| product.stock > max) {
            return false;
        }
        self.approval
            .iter()
            .all(|f| product.has_approval(f.tag) == f.approved)
    }

    fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Apply the filters, keeping input order
    pub fn filter(&self, products: &[Product]) -> Vec<Product> {
        products.iter().filter(|p| self.matches(p)).cloned().collect()
    }

    /// Filter, sort and paginate
    pub fn select(&self, products: &[Product]) -> PaginatedResponse<Product> {
        let mut selected = self.filter(products);
        if let Some(sort) = self.sort {
            sort_products(&mut selected, sort);
        }
        paginate(
            &selected,
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            self.page.unwrap_or(1),
        )
    }
}

fn sort_products(products: &mut [Product], sort: ProductSort) {
    match sort {
        ProductSort::NameAsc => products.sort_by_key(|p| p.name.to_lowercase()),
        ProductSort::NameDesc => {
            products.sort_by_key(|p| std::cmp::Reverse(p.name.to_lowercase()))
        }
        ProductSort::PriceAsc => products.sort_by_key(|p| p.price),
        ProductSort::PriceDesc => products.sort_by_key(|p| std::cmp::Reverse(p.price)),
        ProductSort::StockAsc => products.sort_by_key(|p| p.stock),
        ProductSort::StockDesc => products.sort_by_key(|p| std::cmp::Reverse(p.stock)),
        ProductSort::Newest => products.sort_by_key(|p| std::cmp::Reverse(p.created_at)),
        ProductSort::Oldest => products.sort_by_key(|p| p.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, category: i64, producer: i64, stock: i32) -> Product {
        Product {
            id,
            name: name.to_string(),
            slug: crate::util::slugify(name),
            sku: format!("SKU-{id}"),
            description: None,
            price: 1000 * id,
            stock,
            category_id: category,
            producer_id: producer,
            approval: vec![],
            images: vec![],
            created_at: id,
            updated_at: id,
        }
    }

    fn catalog() -> Vec<Product> {
        let mut items = vec![
            product(1, "Mezcal Espadín", 1, 10, 5),
            product(2, "Café de Olla", 2, 10, 0),
            product(3, "Mezcal Tobalá", 1, 11, 40),
            product(4, "Chocolate Oaxaqueño", 2, 11, 12),
        ];
        items[0].approval = vec![ApprovalTag::Admin, ApprovalTag::Seo];
        items[2].approval = vec![ApprovalTag::Design];
        items
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let items = catalog();
        assert_eq!(ProductQuery::default().filter(&items), items);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let query = ProductQuery {
            search: Some("  MEZCAL ".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.filter(&catalog())), vec![1, 3]);

        let query = ProductQuery {
            search: Some("sku-4".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.filter(&catalog())), vec![4]);
    }

    #[test]
    fn test_blank_search_is_inactive() {
        let query = ProductQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(query.filter(&catalog()).len(), 4);
    }

    #[test]
    fn test_category_and_producer_membership() {
        let query = ProductQuery {
            categories: vec![1],
            producers: vec![11],
            ..Default::default()
        };
        assert_eq!(ids(&query.filter(&catalog())), vec![3]);
    }

    #[test]
    fn test_stock_thresholds_inclusive() {
        let query = ProductQuery {
            min_stock: Some(5),
            max_stock: Some(12),
            ..Default::default()
        };
        assert_eq!(ids(&query.filter(&catalog())), vec![1, 4]);
    }

    #[test]
    fn test_approval_filters() {
        let published = ProductQuery {
            approval: vec![ApprovalFilter {
                tag: ApprovalTag::Admin,
                approved: true,
            }],
            ..Default::default()
        };
        assert_eq!(ids(&published.filter(&catalog())), vec![1]);

        let missing_design = ProductQuery {
            approval: vec![ApprovalFilter {
                tag: ApprovalTag::Design,
                approved: false,
            }],
            ..Default::default()
        };
        assert_eq!(ids(&missing_design.filter(&catalog())), vec![1, 2, 4]);
    }

    #[test]
    fn test_filters_commute() {
        let items = catalog();
        let by_category = ProductQuery {
            categories: vec![1, 2],
            ..Default::default()
        };
        let by_stock = ProductQuery {
            min_stock: Some(1),
            ..Default::default()
        };
        let by_search = ProductQuery {
            search: Some("o".into()),
            ..Default::default()
        };

        let abc = by_search.filter(&by_stock.filter(&by_category.filter(&items)));
        let cba = by_category.filter(&by_stock.filter(&by_search.filter(&items)));
        let combined = ProductQuery {
            categories: vec![1, 2],
            min_stock: Some(1),
            search: Some("o".into()),
            ..Default::default()
        }
        .filter(&items);

        assert_eq!(abc, cba);
        assert_eq!(abc, combined);
    }

    #[test]
    fn test_select_sorts_then_paginates() {
        let query = ProductQuery {
            sort: Some(ProductSort::PriceDesc),
            page: Some(2),
            page_size: Some(3),
            ..Default::default()
        };
        let page = query.select(&catalog());
        assert_eq!(ids(&page.data), vec![1]);
        assert_eq!(page.total, 4);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_sort_by_name() {
        let query = ProductQuery {
            sort: Some(ProductSort::NameAsc),
            ..Default::default()
        };
        assert_eq!(ids(&query.select(&catalog()).data), vec![2, 4, 1, 3]);
    }
}
