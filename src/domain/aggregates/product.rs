//! Catalog read model: product with its color/size variant tree.
//!
//! The storefront never mutates these; they are rebuilt from the fetched
//! payload on every product load. Availability queries (`size_in_stock`,
//! `images_for`) answer directly off the in-memory tree, no caching.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Money, Quantity, Sku};

/// One product image under a color variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantImage {
    pub url: String,
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_main: bool,
}

/// A specific size's stock, price and active status within a color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeVariant {
    pub size_id: String,
    pub size_name: String,
    pub size_label: String,
    pub sku: Option<Sku>,
    /// May differ from the product's base price.
    pub price: Money,
    pub quantity: Quantity,
    pub is_active: bool,
}

impl SizeVariant {
    /// Selectable only when active with stock on hand.
    pub fn in_stock(&self) -> bool { self.is_active && !self.quantity.is_zero() }
}

/// A product's color-specific bundle of images and sizes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorVariant {
    pub id: String,
    pub color_name: String,
    pub color_code: String,
    pub images: Vec<VariantImage>,
    pub sizes: Vec<SizeVariant>,
}

impl ColorVariant {
    /// The image flagged `isMain`, falling back to the first image.
    pub fn main_image(&self) -> Option<&VariantImage> {
        self.images.iter().find(|i| i.is_main).or_else(|| self.images.first())
    }

    pub fn find_size(&self, size_name: &str) -> Option<&SizeVariant> {
        self.sizes.iter().find(|s| s.size_name == size_name)
    }

    pub fn size_in_stock(&self, size_name: &str) -> bool {
        self.find_size(size_name).map(SizeVariant::in_stock).unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub review_count: u32,
    pub colors: Vec<ColorVariant>,
}

impl Product {
    pub fn color(&self, index: usize) -> Option<&ColorVariant> { self.colors.get(index) }

    /// Ordered images for a color; an empty slice is valid (placeholder case).
    pub fn images_for(&self, color_index: usize) -> &[VariantImage] {
        self.color(color_index).map(|c| c.images.as_slice()).unwrap_or(&[])
    }

    pub fn size_in_stock(&self, color_index: usize, size_name: &str) -> bool {
        self.color(color_index).map(|c| c.size_in_stock(size_name)).unwrap_or(false)
    }

    /// Sum of stock across every size of every color.
    pub fn total_stock(&self) -> u32 {
        self.colors
            .iter()
            .flat_map(|c| c.sizes.iter())
            .map(|s| s.quantity.value())
            .sum()
    }

    pub fn is_in_stock(&self) -> bool { self.total_stock() > 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::scrub_top;
    use rust_decimal::Decimal;

    #[test]
    fn test_main_image_prefers_flagged() {
        let product = scrub_top();
        let main = product.colors[0].main_image().unwrap();
        assert_eq!(main.url, "/img/navy-front.jpg");
        assert!(main.is_main);
    }

    #[test]
    fn test_main_image_falls_back_to_first() {
        let mut product = scrub_top();
        for img in &mut product.colors[0].images { img.is_main = false; }
        assert_eq!(product.colors[0].main_image().unwrap().url, "/img/navy-side.jpg");
    }

    #[test]
    fn test_size_in_stock() {
        let product = scrub_top();
        assert!(product.size_in_stock(0, "M"));
        // XL has stock but is inactive
        assert!(!product.size_in_stock(0, "XL"));
        // S is active but out of stock
        assert!(!product.size_in_stock(0, "S"));
        assert!(!product.size_in_stock(0, "XXXL"));
        assert!(!product.size_in_stock(9, "M"));
    }

    #[test]
    fn test_images_for_missing_color_is_empty() {
        let product = scrub_top();
        assert!(product.images_for(9).is_empty());
    }

    #[test]
    fn test_total_stock() {
        let product = scrub_top();
        // navy: S=0, M=5, XL=3(inactive); sage: M=2
        assert_eq!(product.total_stock(), 10);
        assert!(product.is_in_stock());
    }

    #[test]
    fn test_size_price_overrides_base() {
        let product = scrub_top();
        let m = product.colors[0].find_size("M").unwrap();
        assert_eq!(m.price.amount(), Decimal::new(4500, 2));
        assert_ne!(m.price, product.price);
    }
}
