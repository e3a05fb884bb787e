//! Aggregates module
pub mod product;
pub mod cart;
pub mod selector;

pub use product::{ColorVariant, Product, SizeVariant, VariantImage};
pub use cart::{AddItemSpec, CartLineItem, CartStore, Customization, MAX_PER_LINE};
pub use selector::{SelectionError, VariantSelector};
