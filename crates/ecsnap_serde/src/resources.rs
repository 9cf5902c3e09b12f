//! Resource encoding and in-place patching.

use ecsnap_foundation::{Error, ErrorKind, Namespace, ResourceId, Result};
use ecsnap_storage::World;
use serde_json::{Map, Value};
use tracing::trace;

use crate::options::Options;
use crate::registry::TypeTable;

/// Encodes every non-skipped resource that currently holds a value.
pub(crate) fn encode(
    world: &World,
    table: &TypeTable<ResourceId>,
    options: &Options,
) -> Result<Map<String, Value>> {
    let mut resources = Map::new();
    if options.skip_all_resources {
        return Ok(resources);
    }
    let skip = table.mask(&options.skip_resources);
    for (id, info) in table.iter().filter(|(id, _)| !skip.get(*id)) {
        let Some(value) = world.resource_by_id(id) else {
            continue;
        };
        let value = info
            .codec()
            .encode(value)
            .map_err(|e| Error::serialization(format!("resource {}: {e}", info.name())))?;
        resources.insert(info.name().to_string(), value);
    }
    Ok(resources)
}

/// Overwrites existing resource values with the document's payloads.
///
/// Each payload is decoded into a temporary and moved into the slot the
/// world already holds for its type; no slot is ever created.
pub(crate) fn decode(
    world: &mut World,
    table: &TypeTable<ResourceId>,
    resources: Map<String, Value>,
    options: &Options,
) -> Result<()> {
    if options.skip_all_resources {
        return Ok(());
    }
    let skip = table.mask(&options.skip_resources);
    for (name, payload) in resources {
        let id = table.resolve(&name)?;
        if skip.get(id) {
            continue;
        }
        let info = table.info(id)?;
        let slot = world
            .resource_slot_mut(id)
            .ok_or_else(|| Error::new(ErrorKind::MissingResourceSlot(name.clone())))?;
        info.codec().patch(slot, payload).map_err(|e| {
            Error::new(ErrorKind::MalformedValue {
                namespace: Namespace::Resource,
                type_name: name.clone(),
                entity: None,
                message: e.to_string(),
            })
        })?;
        trace!(resource = %name, "patched resource");
    }
    Ok(())
}
