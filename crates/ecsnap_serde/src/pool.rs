//! Entity pool encoding and the mapping from records to destination entities.

use std::collections::HashMap;

use ecsnap_foundation::{Entity, Error, ErrorKind, Result};
use ecsnap_storage::{EntityDump, World};
use tracing::debug;

/// Dumps a world's entity pool.
pub(crate) fn encode(world: &World) -> EntityDump {
    world.dump_entities()
}

/// Destination entities for each component record, plus the translation of
/// document entity references into destination entities.
#[derive(Debug, Default)]
pub(crate) struct EntityMap {
    entities: Vec<Entity>,
    remap: HashMap<Entity, Entity>,
}

impl EntityMap {
    /// The destination entity of a record.
    pub fn entity(&self, record: usize) -> Entity {
        self.entities[record]
    }

    /// Translates an entity reference from the document into the destination.
    pub fn target(&self, entity: Entity) -> Entity {
        self.remap.get(&entity).copied().unwrap_or(entity)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entities.len()
    }
}

fn mismatch(records: usize, alive: usize) -> Error {
    Error::new(ErrorKind::EntityCountMismatch { records, alive })
}

/// Installs or overlays the document's pool and maps `records` records onto entities.
///
/// A fresh destination receives the whole pool, dead slots and free list
/// included, so every entity keeps its identity. A destination that already
/// has entities is overlaid: record `i` goes to the destination's `i`-th alive
/// entity in query order, and relation targets are translated the same way.
/// Without a pool, records are overlaid onto the destination as it is.
///
/// Every count is checked before the destination is touched.
pub(crate) fn decode(world: &mut World, pool: Option<&EntityDump>, records: usize) -> Result<EntityMap> {
    if let Some(dump) = pool {
        if dump.alive.len() != records {
            return Err(mismatch(records, dump.alive.len()));
        }
        if world.is_fresh() {
            let entities = world.load_entities(dump)?;
            return Ok(EntityMap {
                entities,
                remap: HashMap::new(),
            });
        }
    } else if records == 0 {
        return Ok(EntityMap::default());
    }

    let entities: Vec<Entity> = world.query().collect();
    if entities.len() != records {
        return Err(mismatch(records, entities.len()));
    }
    let remap = match pool {
        Some(dump) => dump
            .alive_entities()?
            .into_iter()
            .zip(entities.iter().copied())
            .filter(|(source, dest)| source != dest)
            .collect(),
        None => HashMap::new(),
    };
    debug!(records, remapped = remap.len(), "overlaying records onto existing entities");
    Ok(EntityMap { entities, remap })
}
