//! Variant selector
//!
//! Tracks the shopper's color/image/size/quantity choices on a product page,
//! constrained by the product's variant tree. Size availability is
//! color-dependent, so changing color clears the selected size and forces a
//! re-pick instead of carrying a possibly-invalid size across.

use thiserror::Error;

use crate::domain::aggregates::cart::{AddItemSpec, CartStore, Customization, MAX_PER_LINE};
use crate::domain::aggregates::product::Product;

/// Validation rejections surfaced to the shopper. Messages are the inline
/// copy shown next to the add-to-cart button.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please select a size")]
    NoSizeSelected,

    #[error("Color \"{0}\" is not available for this product")]
    UnknownColor(String),

    #[error("Size \"{0}\" is currently unavailable")]
    SizeUnavailable(String),

    #[error("Quantity must be between 1 and {max}")]
    InvalidQuantity { max: u32 },

    #[error("Only {available} left in stock")]
    InsufficientStock { available: u32 },
}

pub struct VariantSelector {
    product: Product,
    color_index: usize,
    image_index: usize,
    selected_size: Option<String>,
    quantity: u32,
    customization: Option<Customization>,
}

impl VariantSelector {
    /// Fresh selector on product load: first color, first image, no size,
    /// quantity one.
    pub fn new(product: Product) -> Self {
        Self {
            product,
            color_index: 0,
            image_index: 0,
            selected_size: None,
            quantity: 1,
            customization: None,
        }
    }

    pub fn product(&self) -> &Product { &self.product }
    pub fn color_index(&self) -> usize { self.color_index }
    pub fn image_index(&self) -> usize { self.image_index }
    pub fn selected_size(&self) -> Option<&str> { self.selected_size.as_deref() }
    pub fn quantity(&self) -> u32 { self.quantity }

    /// Switch color. Resets the gallery to the first image and clears the
    /// selected size: the previous size may not exist or be stocked here.
    pub fn change_color(&mut self, index: usize) -> Result<(), SelectionError> {
        if self.product.color(index).is_none() {
            return Err(SelectionError::UnknownColor(index.to_string()));
        }
        self.color_index = index;
        self.image_index = 0;
        self.selected_size = None;
        Ok(())
    }

    /// Switch color by display name, the form the cart API receives.
    pub fn change_color_named(&mut self, color_name: &str) -> Result<(), SelectionError> {
        let index = self
            .product
            .colors
            .iter()
            .position(|c| c.color_name == color_name)
            .ok_or_else(|| SelectionError::UnknownColor(color_name.to_string()))?;
        self.change_color(index)
    }

    /// Jump to a gallery image; out-of-range clicks are ignored.
    pub fn set_image(&mut self, index: usize) {
        if index < self.product.images_for(self.color_index).len() {
            self.image_index = index;
        }
    }

    /// Circular gallery: advancing past the last image wraps to the first.
    pub fn next_image(&mut self) {
        let count = self.product.images_for(self.color_index).len();
        if count == 0 { return; }
        self.image_index = (self.image_index + 1) % count;
    }

    /// Circular gallery: stepping before the first image wraps to the last.
    pub fn prev_image(&mut self) {
        let count = self.product.images_for(self.color_index).len();
        if count == 0 { return; }
        self.image_index = if self.image_index == 0 { count - 1 } else { self.image_index - 1 };
    }

    /// Pick a size under the current color. Rejected if the size is missing,
    /// inactive, or out of stock; the previous selection stands.
    pub fn select_size(&mut self, size_name: &str) -> Result<(), SelectionError> {
        if !self.product.size_in_stock(self.color_index, size_name) {
            return Err(SelectionError::SizeUnavailable(size_name.to_string()));
        }
        self.selected_size = Some(size_name.to_string());
        Ok(())
    }

    /// Stock of the currently selected size under the current color, if any.
    fn selected_variant_stock(&self) -> Option<u32> {
        let size_name = self.selected_size.as_deref()?;
        self.product
            .color(self.color_index)?
            .find_size(size_name)
            .map(|v| v.quantity.value())
    }

    /// Per-line ceiling: the size's stock, capped at [`MAX_PER_LINE`]. Before
    /// a size is picked the only bound is the hard cap.
    pub fn max_selectable(&self) -> u32 {
        self.selected_variant_stock().unwrap_or(MAX_PER_LINE).min(MAX_PER_LINE)
    }

    /// Clamp into `[1, max_selectable]`; never rejects.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.min(self.max_selectable()).max(1);
    }

    pub fn set_customization(&mut self, customization: Option<Customization>) {
        self.customization = customization;
    }

    /// Build the cart line for the current selection, re-checking stock at
    /// submit time. The price, image and stock ceiling are snapshotted here.
    pub fn line_spec(&self) -> Result<AddItemSpec, SelectionError> {
        self.line_spec_for(self.quantity)
    }

    /// Same as [`line_spec`](Self::line_spec) but with an explicit quantity,
    /// used where the quantity arrives from a request rather than the
    /// clamped UI control.
    pub fn line_spec_for(&self, quantity: u32) -> Result<AddItemSpec, SelectionError> {
        let size_name = self.selected_size.as_deref().ok_or(SelectionError::NoSizeSelected)?;
        let color = self
            .product
            .color(self.color_index)
            .ok_or_else(|| SelectionError::UnknownColor(self.color_index.to_string()))?;
        let variant = color
            .find_size(size_name)
            .filter(|v| v.in_stock())
            .ok_or_else(|| SelectionError::SizeUnavailable(size_name.to_string()))?;

        if quantity == 0 || quantity > MAX_PER_LINE {
            return Err(SelectionError::InvalidQuantity { max: MAX_PER_LINE });
        }
        let available = variant.quantity.value();
        if quantity > available {
            return Err(SelectionError::InsufficientStock { available });
        }

        Ok(AddItemSpec {
            product_id: self.product.id.clone(),
            product_name: self.product.name.clone(),
            product_slug: self.product.slug.clone(),
            price: variant.price.clone(),
            color: color.color_name.clone(),
            size: variant.size_name.clone(),
            quantity,
            image: color.main_image().map(|i| i.url.clone()),
            max_quantity: available,
            customization: self.customization.clone(),
        })
    }

    /// Terminal action: validate, then hand the snapshot to the cart.
    pub fn add_to_cart(&self, cart: &mut CartStore) -> Result<String, SelectionError> {
        Ok(cart.add_item(self.line_spec()?))
    }
}
