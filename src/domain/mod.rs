//! Storefront domain
pub mod aggregates;
pub mod events;
pub mod value_objects;

#[cfg(test)]
pub(crate) mod fixtures;
