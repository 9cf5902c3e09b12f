//! The structural document exchanged between encode and decode.

use ecsnap_foundation::{Error, Result};
use ecsnap_storage::EntityDump;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::Format;

pub use ecsnap_foundation::TARGET_TAG;

/// One entity's components, keyed by registered type name.
pub type Record = Map<String, Value>;

/// A self-describing snapshot of a world.
///
/// ```text
/// {
///   "Pool": { "Entities": [...], "Alive": [...], "Next": 0, "Available": 0 },
///   "Types": ["game::Position", ...],
///   "Components": [ { "ecsnap.relation.Target": [1, 0], "game::ChildOf": null }, ... ],
///   "Resources": { "game::Gravity": 9.81 }
/// }
/// ```
///
/// Component records line up with `Pool.Alive` one to one. Payloads are kept
/// as structural values so the document holds no reference into any world and
/// can be re-encoded in any [`Format`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Document {
    /// The entity pool, absent when entities were skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<EntityDump>,
    /// Names of the component types the records may use.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    /// One record per alive entity, in pool order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Record>,
    /// Resource values keyed by type name.
    #[serde(default)]
    pub resources: Map<String, Value>,
}

impl Document {
    /// Parses a document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MalformedDocument`](ecsnap_foundation::ErrorKind::MalformedDocument)
    /// if the bytes are not a document in the given format.
    pub fn from_bytes(bytes: &[u8], format: Format) -> Result<Self> {
        match format {
            Format::Json | Format::JsonPretty => {
                serde_json::from_slice(bytes).map_err(|e| Error::malformed_document(e.to_string()))
            }
            Format::MessagePack => {
                rmp_serde::from_slice(bytes).map_err(|e| Error::malformed_document(e.to_string()))
            }
        }
    }

    /// Encodes the document as bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_bytes(&self, format: Format) -> Result<Vec<u8>> {
        match format {
            Format::Json => serde_json::to_vec(self).map_err(|e| Error::serialization(e.to_string())),
            Format::JsonPretty => {
                serde_json::to_vec_pretty(self).map_err(|e| Error::serialization(e.to_string()))
            }
            Format::MessagePack => {
                rmp_serde::to_vec_named(self).map_err(|e| Error::serialization(e.to_string()))
            }
        }
    }

    /// Returns the number of alive entities the pool declares, if a pool is present.
    #[must_use]
    pub fn alive_count(&self) -> Option<usize> {
        self.pool.as_ref().map(|pool| pool.alive.len())
    }
}
