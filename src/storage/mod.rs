//! Cart persistence
//!
//! The cart survives reloads through a pluggable repository so the store
//! logic stays testable without real storage. The persisted shape is the
//! plain JSON array of line items, no version envelope; anything that no
//! longer parses is reported as `Corrupt` and the store starts over empty.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

use crate::domain::aggregates::cart::CartLineItem;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("persisted cart payload is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub trait CartRepository: Send {
    fn load(&self) -> Result<Vec<CartLineItem>, StorageError>;
    fn save(&self, items: &[CartLineItem]) -> Result<(), StorageError>;
}

/// Volatile backing, used in tests and anywhere persistence is unwanted.
#[derive(Default)]
pub struct InMemoryCartRepository {
    items: Mutex<Vec<CartLineItem>>,
}

impl CartRepository for InMemoryCartRepository {
    fn load(&self) -> Result<Vec<CartLineItem>, StorageError> {
        Ok(self.items.lock().unwrap().clone())
    }

    fn save(&self, items: &[CartLineItem]) -> Result<(), StorageError> {
        *self.items.lock().unwrap() = items.to_vec();
        Ok(())
    }
}

/// One JSON file per cart, the session-local analogue of a browser's
/// storage key. A missing file is an empty cart, not an error.
pub struct JsonFileCartRepository {
    path: PathBuf,
}

impl JsonFileCartRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CartRepository for JsonFileCartRepository {
    fn load(&self) -> Result<Vec<CartLineItem>, StorageError> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, items: &[CartLineItem]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(items)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::cart::{AddItemSpec, CartStore};
    use crate::domain::value_objects::Money;
    use std::sync::Arc;

    fn add_spec(quantity: u32) -> AddItemSpec {
        AddItemSpec {
            product_id: "P1".into(),
            product_name: "Classic Scrub Top".into(),
            product_slug: "classic-scrub-top".into(),
            price: Money::from_cents(4500, "USD"),
            color: "Navy".into(),
            size: "M".into(),
            quantity,
            image: None,
            max_quantity: 5,
            customization: None,
        }
    }

    // Arc wrapper so a test can hold the same backing the store writes to.
    struct SharedRepo(Arc<InMemoryCartRepository>);
    impl CartRepository for SharedRepo {
        fn load(&self) -> Result<Vec<CartLineItem>, StorageError> { self.0.load() }
        fn save(&self, items: &[CartLineItem]) -> Result<(), StorageError> { self.0.save(items) }
    }

    #[test]
    fn test_in_memory_round_trip() {
        let backing = Arc::new(InMemoryCartRepository::default());
        let mut cart = CartStore::open(Box::new(SharedRepo(backing.clone())));
        cart.add_item(add_spec(3));
        let rehydrated = CartStore::open(Box::new(SharedRepo(backing)));
        assert_eq!(rehydrated.items(), cart.items());
        assert_eq!(rehydrated.item_count(), 3);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        let mut cart = CartStore::open(Box::new(JsonFileCartRepository::new(&path)));
        cart.add_item(add_spec(2));
        cart.add_item(add_spec(1));

        let rehydrated = CartStore::open(Box::new(JsonFileCartRepository::new(&path)));
        assert_eq!(rehydrated.items(), cart.items());
        assert_eq!(rehydrated.total_amount(), cart.total_amount());
    }

    #[test]
    fn test_missing_file_is_empty_cart() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileCartRepository::new(dir.path().join("absent.json"));
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_payload_resets_cart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, "{\"not\": \"a cart\"}").unwrap();
        let cart = CartStore::open(Box::new(JsonFileCartRepository::new(&path)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_shape_mismatch_resets_cart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        // An older line-item shape missing required fields.
        fs::write(&path, "[{\"id\": \"x\", \"qty\": 2}]").unwrap();
        let cart = CartStore::open(Box::new(JsonFileCartRepository::new(&path)));
        assert!(cart.is_empty());
    }
}
