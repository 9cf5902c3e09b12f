//! Entity pool, type registries, archetype storage, and resources for ecsnap.
//!
//! This crate provides:
//! - [`EntityPool`] - Generational entity allocation with an intrusive free list
//! - [`TypeRegistry`] - Name-keyed registries carrying per-type value codecs
//! - [`EntityBuilder`] - Atomic multi-component construction
//! - [`Resources`] - World-scoped singleton slots
//! - [`World`] - The store tying all of the above together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod archetype;
pub mod builder;
pub mod entity;
pub mod registry;
pub mod resource;
pub mod world;

pub use builder::{ComponentValue, EntityBuilder};
pub use entity::{EntityDump, EntityPool};
pub use registry::{Component, ErasedValue, Resource, TypeInfo, TypeRegistry, ValueCodec};
pub use resource::Resources;
pub use world::World;
