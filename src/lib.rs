//! ecsnap - Registry-driven snapshots of an entity-component store
//!
//! This crate re-exports all layers of the ecsnap system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: ecsnap_serde         Document codec, filters, wire formats
//! Layer 1: ecsnap_storage       Entity pool, type registries, archetypes, resources
//! Layer 0: ecsnap_foundation    Core types (Entity, handles, Mask, Error)
//! ```

pub use ecsnap_foundation as foundation;
pub use ecsnap_serde as codec;
pub use ecsnap_storage as storage;
