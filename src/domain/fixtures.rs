//! Shared test fixtures.

use rust_decimal::Decimal;

use crate::domain::aggregates::product::{ColorVariant, Product, SizeVariant, VariantImage};
use crate::domain::value_objects::{Money, Quantity, Sku};

fn size(id: &str, name: &str, label: &str, cents: i64, qty: u32, active: bool) -> SizeVariant {
    SizeVariant {
        size_id: id.into(),
        size_name: name.into(),
        size_label: label.into(),
        sku: Sku::new(format!("CAS-TOP-{}", name)).ok(),
        price: Money::from_cents(cents, "USD"),
        quantity: Quantity::new(qty),
        is_active: active,
    }
}

/// Two-color scrub top: navy (S out of stock, M=5, XL inactive) and sage (M=2).
pub(crate) fn scrub_top() -> Product {
    Product {
        id: "prod-001".into(),
        name: "Classic Scrub Top".into(),
        slug: "classic-scrub-top".into(),
        description: "Four-way stretch scrub top".into(),
        price: Money::new(Decimal::new(4200, 2), "USD"),
        compare_at_price: Some(Money::new(Decimal::new(5500, 2), "USD")),
        rating: 4.6,
        review_count: 128,
        colors: vec![
            ColorVariant {
                id: "col-navy".into(),
                color_name: "Navy".into(),
                color_code: "#1f2a44".into(),
                images: vec![
                    VariantImage { url: "/img/navy-side.jpg".into(), alt_text: None, is_main: false },
                    VariantImage { url: "/img/navy-front.jpg".into(), alt_text: Some("Navy front".into()), is_main: true },
                    VariantImage { url: "/img/navy-back.jpg".into(), alt_text: None, is_main: false },
                ],
                sizes: vec![
                    size("sz-s", "S", "Small", 4200, 0, true),
                    size("sz-m", "M", "Medium", 4500, 5, true),
                    size("sz-xl", "XL", "Extra Large", 4200, 3, false),
                ],
            },
            ColorVariant {
                id: "col-sage".into(),
                color_name: "Sage".into(),
                color_code: "#9caf88".into(),
                images: vec![
                    VariantImage { url: "/img/sage-front.jpg".into(), alt_text: None, is_main: true },
                ],
                sizes: vec![size("sz-m2", "M", "Medium", 4200, 2, true)],
            },
        ],
    }
}
