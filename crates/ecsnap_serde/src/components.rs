//! Per-entity component records, including relation targets.

use ecsnap_foundation::{ComponentId, Entity, Error, ErrorKind, Namespace, Result};
use ecsnap_storage::{ComponentValue, World};
use serde::Deserialize;
use tracing::trace;

use crate::document::{Record, TARGET_TAG};
use crate::options::Options;
use crate::pool::EntityMap;
use crate::registry::TypeTable;

/// Lists the names of all registered, non-skipped component types in handle order.
pub(crate) fn encode_types(table: &TypeTable<ComponentId>, options: &Options) -> Vec<String> {
    if options.skip_all_components {
        return Vec::new();
    }
    let skip = table.mask(&options.skip_components);
    table
        .iter()
        .filter(|(id, _)| !skip.get(*id))
        .map(|(_, info)| info.name().to_string())
        .collect()
}

/// Encodes one record per alive entity, in query order.
///
/// A relation component is preceded by [`TARGET_TAG`] holding its target.
/// Entities whose components are all filtered still get an empty record.
pub(crate) fn encode(
    world: &World,
    table: &TypeTable<ComponentId>,
    options: &Options,
) -> Result<Vec<Record>> {
    let skip = table.mask(&options.skip_components);
    let mut records = Vec::with_capacity(world.len());

    for entity in world.query() {
        let mut record = Record::new();
        if !options.skip_all_components {
            let ids = world.component_ids(entity).unwrap_or_default();
            for &id in ids.iter().filter(|id| !skip.get(**id)) {
                let info = table.info(id)?;
                if info.is_relation() {
                    let target = world.relation(entity, id)?;
                    let target = serde_json::to_value(target)
                        .map_err(|e| Error::serialization(e.to_string()))?;
                    record.insert(TARGET_TAG.to_string(), target);
                }
                let value = world
                    .get_by_id(entity, id)
                    .ok_or_else(|| Error::entity_not_found(entity))?;
                let value = info.codec().encode(value).map_err(|e| {
                    Error::serialization(format!("component {}: {e}", info.name()))
                })?;
                record.insert(info.name().to_string(), value);
            }
        }
        trace!(?entity, keys = record.len(), "encoded component record");
        records.push(record);
    }
    Ok(records)
}

fn malformed(type_name: &str, record: usize, error: &serde_json::Error) -> Error {
    Error::new(ErrorKind::MalformedValue {
        namespace: Namespace::Component,
        type_name: type_name.to_string(),
        entity: Some(record),
        message: error.to_string(),
    })
}

/// Attaches each record's components to its entity in one multi-add.
///
/// Keys are buffered per record, so the target tag may come before or after
/// its relation component. A target is only applied when the record also
/// decodes a relation component and the target is not the zero entity.
pub(crate) fn decode(
    world: &mut World,
    table: &TypeTable<ComponentId>,
    records: Vec<Record>,
    entities: &EntityMap,
    options: &Options,
) -> Result<()> {
    if options.skip_all_components {
        return Ok(());
    }
    let skip = table.mask(&options.skip_components);

    for (index, record) in records.into_iter().enumerate() {
        let entity = entities.entity(index);
        let mut target = Entity::ZERO;
        let mut has_relation = false;
        let mut values = Vec::with_capacity(record.len());

        for (name, payload) in record {
            if name == TARGET_TAG {
                target = Entity::deserialize(&payload)
                    .map_err(|e| malformed(TARGET_TAG, index, &e))?;
                continue;
            }
            let id = table.resolve(&name)?;
            if skip.get(id) {
                continue;
            }
            let info = table.info(id)?;
            let value = info
                .codec()
                .decode(payload)
                .map_err(|e| malformed(info.name(), index, &e))?;
            has_relation |= info.is_relation();
            values.push(ComponentValue::new(id, value));
        }

        if values.is_empty() {
            continue;
        }
        let target = (has_relation && !target.is_zero()).then(|| entities.target(target));
        let count = values.len();
        world
            .add_components(entity, values, target)
            .map_err(|e| e.with_frame(format!("while attaching component record {index}")))?;
        trace!(?entity, components = count, ?target, "decoded component record");
    }
    Ok(())
}
