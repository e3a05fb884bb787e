//! Domain events
//!
//! In-process signals drained by the UI layer via `take_events()`. The
//! `ItemAdded` event is what pops the cart dropdown after a successful add.

#[derive(Clone, Debug, PartialEq)]
pub enum CartEvent {
    /// A line was added, or an existing line absorbed the add (`merged`).
    ItemAdded { line_id: String, merged: bool },
    QuantityChanged { line_id: String, quantity: u32 },
    ItemRemoved { line_id: String },
    Cleared,
}
