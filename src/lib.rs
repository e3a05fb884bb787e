//! Casalogy Storefront
//!
//! Core of the Casalogy medical-apparel shop: the catalog read model with
//! its color/size variant tree, the product-page variant selector, and the
//! session cart with pluggable persistence.
//!
//! ## Features
//! - Product catalog with per-color images and per-size stock/pricing
//! - Variant selector state machine (color, gallery, size, quantity)
//! - Cart store with merge-on-duplicate-add and stock-ceiling clamping
//! - Pluggable cart persistence (in-memory, JSON file per session)

pub mod domain;
pub mod storage;

pub use domain::aggregates::{
    AddItemSpec, CartLineItem, CartStore, ColorVariant, Customization, Product, SelectionError,
    SizeVariant, VariantImage, VariantSelector, MAX_PER_LINE,
};
pub use domain::events::CartEvent;
pub use domain::value_objects::{Money, Quantity, Sku};
pub use storage::{CartRepository, InMemoryCartRepository, JsonFileCartRepository, StorageError};
