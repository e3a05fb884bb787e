//! Cart store
//!
//! Single source of truth for the cart within one session. Lines are
//! add-time snapshots: price and stock ceiling are captured when the item
//! goes in and are not re-priced if the catalog changes afterwards.
//! Every mutation persists the full line list through the configured
//! [`CartRepository`](crate::storage::CartRepository) before returning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::events::CartEvent;
use crate::domain::value_objects::{Money, Quantity};
use crate::storage::CartRepository;

/// Hard per-line ceiling, regardless of stock on hand.
pub const MAX_PER_LINE: u32 = 10;

/// Optional embroidery/personalization attached to a line. Part of the line
/// identity: the same product+color+size with different customization is a
/// different line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub text: String,
    pub placement: Option<String>,
}

/// One entry in the cart: a product+color+size(+customization) snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_slug: String,
    pub price: Money,
    pub color: String,
    pub size: String,
    pub quantity: Quantity,
    pub image: Option<String>,
    /// Stock ceiling snapshotted at add time.
    pub max_quantity: u32,
    pub customization: Option<Customization>,
}

impl CartLineItem {
    pub fn line_total(&self) -> Money { self.price.multiply(self.quantity.value()) }

    fn matches(&self, spec: &AddItemSpec) -> bool {
        self.product_id == spec.product_id
            && self.color == spec.color
            && self.size == spec.size
            && self.customization == spec.customization
    }
}

/// Everything `add_item` needs; produced by the variant selector after its
/// own validation has passed.
#[derive(Clone, Debug, PartialEq)]
pub struct AddItemSpec {
    pub product_id: String,
    pub product_name: String,
    pub product_slug: String,
    pub price: Money,
    pub color: String,
    pub size: String,
    pub quantity: u32,
    pub image: Option<String>,
    pub max_quantity: u32,
    pub customization: Option<Customization>,
}

pub struct CartStore {
    items: Vec<CartLineItem>,
    repository: Box<dyn CartRepository>,
    events: Vec<CartEvent>,
}

impl CartStore {
    /// Hydrate from the repository. An unreadable or shape-mismatched payload
    /// resets to an empty cart rather than failing the session.
    pub fn open(repository: Box<dyn CartRepository>) -> Self {
        let items = match repository.load() {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable cart payload");
                vec![]
            }
        };
        Self { items, repository, events: vec![] }
    }

    pub fn items(&self) -> &[CartLineItem] { &self.items }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity.value()).sum()
    }

    // The first line's currency wins; a line snapshotted in another currency
    // is left out of the total and logged, never silently resets the sum.
    fn total(&self) -> Money {
        let mut acc: Option<Money> = None;
        for item in &self.items {
            let line = item.line_total();
            acc = Some(match acc {
                None => line,
                Some(sum) => match sum.add(&line) {
                    Ok(sum) => sum,
                    Err(e) => {
                        tracing::warn!(line_id = %item.id, error = %e, "cart line excluded from total");
                        sum
                    }
                },
            });
        }
        acc.unwrap_or_default()
    }

    /// Exact sum of price × quantity across all lines.
    pub fn total_amount(&self) -> Decimal { self.total().amount() }

    /// Two-decimal figure for display only.
    pub fn display_total(&self) -> Decimal { self.total().rounded() }

    /// Add a line, merging into an existing line with the same
    /// (product, color, size, customization) identity. Quantity is clamped
    /// to the line's stock ceiling in either path.
    pub fn add_item(&mut self, spec: AddItemSpec) -> String {
        let line_id = if let Some(existing) = self.items.iter_mut().find(|i| i.matches(&spec)) {
            existing.quantity = existing
                .quantity
                .add(spec.quantity)
                .clamped(1, existing.max_quantity);
            let id = existing.id.clone();
            self.events.push(CartEvent::ItemAdded { line_id: id.clone(), merged: true });
            id
        } else {
            let id = Uuid::new_v4().to_string();
            let quantity = Quantity::new(spec.quantity).clamped(1, spec.max_quantity);
            self.items.push(CartLineItem {
                id: id.clone(),
                product_id: spec.product_id,
                product_name: spec.product_name,
                product_slug: spec.product_slug,
                price: spec.price,
                color: spec.color,
                size: spec.size,
                quantity,
                image: spec.image,
                max_quantity: spec.max_quantity,
                customization: spec.customization,
            });
            self.events.push(CartEvent::ItemAdded { line_id: id.clone(), merged: false });
            id
        };
        self.persist();
        line_id
    }

    /// Clamp the line to `[1, max_quantity]`; zero removes the line.
    /// Unknown ids are a no-op.
    pub fn update_quantity(&mut self, line_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_item(line_id);
            return;
        }
        let Some(item) = self.items.iter_mut().find(|i| i.id == line_id) else { return };
        item.quantity = Quantity::new(quantity).clamped(1, item.max_quantity);
        let event = CartEvent::QuantityChanged { line_id: line_id.to_string(), quantity: item.quantity.value() };
        self.events.push(event);
        self.persist();
    }

    /// Unconditional and idempotent.
    pub fn remove_item(&mut self, line_id: &str) {
        let before = self.items.len();
        self.items.retain(|i| i.id != line_id);
        if self.items.len() == before { return; }
        self.events.push(CartEvent::ItemRemoved { line_id: line_id.to_string() });
        self.persist();
    }

    /// Empty the cart. Checkout completion calls this on success.
    pub fn clear(&mut self) {
        if self.items.is_empty() { return; }
        self.items.clear();
        self.events.push(CartEvent::Cleared);
        self.persist();
    }

    pub fn take_events(&mut self) -> Vec<CartEvent> { std::mem::take(&mut self.events) }

    // Cart operations are infallible; a failed save is logged and the
    // in-memory state stands.
    fn persist(&self) {
        if let Err(e) = self.repository.save(&self.items) {
            tracing::warn!(error = %e, "cart save failed");
        }
    }
}
