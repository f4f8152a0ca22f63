//! Quotation -> pricing -> order snapshot, without a database

use std::collections::HashMap;

use admin_server::ErrorCode;
use admin_server::pricing::{order_totals, price_quotation};
use shared::models::{ApprovalTag, Product, QuotationItem, Role, RoleType};

fn product(id: i64, name: &str, price: i64) -> Product {
    Product {
        id,
        name: name.to_string(),
        slug: shared::util::slugify(name),
        sku: format!("SKU-{id}"),
        description: None,
        price,
        stock: 10,
        category_id: 1,
        producer_id: 1,
        approval: vec![ApprovalTag::Admin],
        images: Vec::new(),
        created_at: 0,
        updated_at: 0,
    }
}

fn role(role_type: RoleType, discount: Option<i32>) -> Role {
    Role {
        id: 1,
        name: "Mayorista".into(),
        role_type,
        discount,
        hierarchy: None,
        special: false,
        permissions: Vec::new(),
        created_at: 0,
    }
}

fn catalog(products: Vec<Product>) -> HashMap<i64, Product> {
    products.into_iter().map(|p| (p.id, p)).collect()
}

#[test]
fn test_client_discount_end_to_end() {
    let products = catalog(vec![product(10, "Silla plegable", 10_000)]);
    let items = vec![QuotationItem {
        product_id: 10,
        quantity: 2,
    }];
    let client = role(RoleType::Client, Some(2_500));

    let pricing = price_quotation(&items, &products, client.effective_discount()).unwrap();
    assert_eq!(pricing.lines[0].current_price, 7_500);
    assert_eq!(pricing.subtotal, 15_000);
    assert_eq!(pricing.tax, 2_400);
    assert_eq!(pricing.total, 17_400);

    let lines = pricing.snapshot_lines();
    assert_eq!(order_totals(&lines).unwrap(), pricing.totals());
}

#[test]
fn test_snapshot_ignores_later_price_changes() {
    let mut products = catalog(vec![product(1, "Mesa", 1_999), product(2, "Banco", 333)]);
    let items = vec![
        QuotationItem {
            product_id: 1,
            quantity: 3,
        },
        QuotationItem {
            product_id: 2,
            quantity: 1,
        },
    ];

    let pricing = price_quotation(&items, &products, 1_000).unwrap();
    let frozen = pricing.snapshot_lines();

    if let Some(p) = products.get_mut(&1) {
        p.price = 5_000;
    }
    let repriced = price_quotation(&items, &products, 1_000).unwrap();
    assert_ne!(repriced.total, pricing.total);

    // 1999 * 0.9 = 1799.1 -> 1799 ; 333 * 0.9 = 299.7 -> 300
    assert_eq!(frozen[0].current_price, 1_799);
    assert_eq!(frozen[1].current_price, 300);
    assert_eq!(order_totals(&frozen).unwrap(), pricing.totals());
}

#[test]
fn test_team_roles_pay_list_price() {
    let products = catalog(vec![product(1, "Mesa", 10_000)]);
    let items = vec![QuotationItem {
        product_id: 1,
        quantity: 1,
    }];
    let team = role(RoleType::Team, Some(5_000));

    let pricing = price_quotation(&items, &products, team.effective_discount()).unwrap();
    assert_eq!(pricing.discount, 0);
    assert_eq!(pricing.total, 11_600);
}

#[test]
fn test_unknown_product_fails() {
    let items = vec![QuotationItem {
        product_id: 404,
        quantity: 1,
    }];
    let err = price_quotation(&items, &HashMap::new(), 0).unwrap_err();
    assert_eq!(err.code, ErrorCode::ProductNotFound);
}
