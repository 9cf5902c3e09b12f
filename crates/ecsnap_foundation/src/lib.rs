//! Core identifiers, masks, and error types for ecsnap.
//!
//! This crate provides:
//! - [`Entity`] - Generational entity identifiers
//! - [`ComponentId`] / [`ResourceId`] - Registry handles for the two type namespaces
//! - [`Mask`] - Fixed-width bit sets over registry handles
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod mask;
pub mod types;

pub use entity::Entity;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use mask::{MASK_TOTAL_BITS, Mask};
pub use types::{ComponentId, Namespace, RegistryId, ResourceId, TARGET_TAG};
