//! Type-registry-driven document codec for ecsnap worlds.
//!
//! This crate provides:
//! - [`to_document`] / [`from_document`] - Whole-world encode and decode
//! - [`Document`] - The structural snapshot, independent of any world
//! - [`Options`] - Filters applied identically on both paths
//! - [`TypeTable`] - Name and handle lookups against a world's registries
//! - [`serialize`] / [`deserialize`], [`to_string`] / [`from_str`], and
//!   [`save_to_file`] / [`load_from_file`] - Byte, text, and file front ends
//!
//! The codec knows no concrete type. Everything it encodes or decodes goes
//! through the value codecs the world captured when the types were
//! registered, so the destination must register every type a document uses
//! (and give every patched resource a placeholder value) before decoding.
//!
//! # Example
//! ```ignore
//! let text = ecsnap_serde::to_string(&world, &Options::new())?;
//!
//! let mut restored = World::new();
//! restored.register_component::<Position>()?;
//! restored.add_resource(Gravity(0.0))?;
//! ecsnap_serde::from_str(&text, &mut restored, &Options::new())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod codec;
mod components;
pub mod config;
pub mod document;
pub mod io;
pub mod options;
mod pool;
pub mod registry;
mod resources;

pub use codec::{from_document, to_document};
pub use config::{Format, SaveConfig};
pub use document::{Document, Record, TARGET_TAG};
pub use io::{deserialize, from_str, load_from_file, save_to_file, serialize, to_string};
pub use options::{Options, SkipSet};
pub use registry::TypeTable;
