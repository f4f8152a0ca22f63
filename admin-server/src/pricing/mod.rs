//! Quotation and order pricing
//!
//! Quotations are priced live from current product prices and the owner's
//! role discount. Creating an order freezes the discounted unit price of
//! every line into [`OrderLine::current_price`]; nothing recomputes it later.

pub mod money;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{OrderLine, Product, QuotationItem};

pub use money::{PricingError, effective_price, line_total, tax_for};

/// One priced quotation line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricedLine {
    pub product_id: i64,
    pub name: String,
    pub quantity: i32,
    /// Catalog price (cents)
    pub base_price: i64,
    /// Discounted unit price (cents)
    pub current_price: i64,
    pub line_total: i64,
}

/// Live pricing of a quotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotationPricing {
    /// Discount applied, in basis points
    pub discount: i32,
    pub lines: Vec<PricedLine>,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
}

/// Subtotal, tax and total of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
}

impl Totals {
    /// Sum exact line totals, then apply tax once
    pub fn from_line_totals(line_totals: impl IntoIterator<Item = i64>) -> Result<Self, PricingError> {
        let subtotal = line_totals
            .into_iter()
            .try_fold(0i64, |acc, t| acc.checked_add(t))
            .ok_or(PricingError::Overflow)?;
        let tax = tax_for(subtotal)?;
        let total = subtotal.checked_add(tax).ok_or(PricingError::Overflow)?;
        Ok(Self {
            subtotal,
            tax,
            total,
        })
    }
}

/// Price `items` against `products` with `discount_bp`
///
/// Fails with `QuotationEmpty` on no items and `ProductNotFound` when an
/// item references a product missing from `products`.
pub fn price_quotation(
    items: &[QuotationItem],
    products: &HashMap<i64, Product>,
    discount_bp: i32,
) -> Result<QuotationPricing, AppError> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::QuotationEmpty));
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let product = products.get(&item.product_id).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ProductNotFound,
                format!("Product {} not found", item.product_id),
            )
            .with_detail("product_id", item.product_id)
        })?;
        let current_price = effective_price(product.price, discount_bp)?;
        lines.push(PricedLine {
            product_id: product.id,
            name: product.name.clone(),
            quantity: item.quantity,
            base_price: product.price,
            current_price,
            line_total: line_total(current_price, item.quantity)?,
        });
    }

    let totals = Totals::from_line_totals(lines.iter().map(|l| l.line_total))?;
    Ok(QuotationPricing {
        discount: discount_bp,
        lines,
        subtotal: totals.subtotal,
        tax: totals.tax,
        total: totals.total,
    })
}

impl QuotationPricing {
    /// Freeze into order lines
    pub fn snapshot_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|l| OrderLine {
                product_id: l.product_id,
                name: l.name.clone(),
                quantity: l.quantity,
                current_price: l.current_price,
            })
            .collect()
    }

    pub fn totals(&self) -> Totals {
        Totals {
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
        }
    }
}

/// Recompute totals from frozen lines
pub fn order_totals(lines: &[OrderLine]) -> Result<Totals, PricingError> {
    Totals::from_line_totals(
        lines
            .iter()
            .map(|l| line_total(l.current_price, l.quantity))
            .collect::<Result<Vec<_>, _>>()?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price: i64) -> Product {
        Product {
            id,
            name: format!("Producto {id}"),
            slug: format!("producto-{id}"),
            sku: format!("P-{id}"),
            description: None,
            price,
            stock: 10,
            category_id: 1,
            producer_id: 1,
            approval: vec![],
            images: vec![],
            created_at: 0,
            updated_at: 0,
        }
    }

    fn catalog(products: &[Product]) -> HashMap<i64, Product> {
        products.iter().map(|p| (p.id, p.clone())).collect()
    }

    #[test]
    fn test_quarter_discount_two_units() {
        let products = catalog(&[product(1, 10_000)]);
        let items = vec![QuotationItem {
            product_id: 1,
            quantity: 2,
        }];

        let pricing = price_quotation(&items, &products, 2_500).unwrap();
        assert_eq!(pricing.lines[0].current_price, 7_500);
        assert_eq!(pricing.subtotal, 15_000);
        assert_eq!(pricing.tax, 2_400);
        assert_eq!(pricing.total, 17_400);
    }

    #[test]
    fn test_tax_rounded_once_on_aggregate() {
        // 16% of 3 cents rounds to 0 per line, 16% of 9 cents is 1.44
        let products = catalog(&[product(1, 3), product(2, 3), product(3, 3)]);
        let items: Vec<QuotationItem> = (1..=3)
            .map(|id| QuotationItem {
                product_id: id,
                quantity: 1,
            })
            .collect();
        let pricing = price_quotation(&items, &products, 0).unwrap();
        assert_eq!(pricing.subtotal, 9);
        assert_eq!(pricing.tax, 1);
        assert_eq!(pricing.total, 10);
    }

    #[test]
    fn test_empty_quotation() {
        let err = price_quotation(&[], &HashMap::new(), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::QuotationEmpty);
    }

    #[test]
    fn test_missing_product() {
        let items = vec![QuotationItem {
            product_id: 99,
            quantity: 1,
        }];
        let err = price_quotation(&items, &HashMap::new(), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }

    #[test]
    fn test_invalid_discount() {
        let products = catalog(&[product(1, 100)]);
        let items = vec![QuotationItem {
            product_id: 1,
            quantity: 1,
        }];
        let err = price_quotation(&items, &products, 12_000).unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleInvalidDiscount);
    }

    #[test]
    fn test_snapshot_matches_order_totals() {
        let products = catalog(&[product(1, 12_345), product(2, 999)]);
        let items = vec![
            QuotationItem {
                product_id: 1,
                quantity: 3,
            },
            QuotationItem {
                product_id: 2,
                quantity: 7,
            },
        ];
        let pricing = price_quotation(&items, &products, 1_500).unwrap();
        let lines = pricing.snapshot_lines();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].current_price, 849);
        assert_eq!(order_totals(&lines).unwrap(), pricing.totals());
    }
}
