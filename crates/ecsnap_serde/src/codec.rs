//! Whole-world encode and decode through a [`Document`].

use ecsnap_foundation::Result;
use ecsnap_storage::World;
use tracing::debug;

use crate::document::Document;
use crate::options::Options;
use crate::registry::TypeTable;
use crate::{components, pool, resources};

/// Captures a world as a document.
///
/// Walks the world once: entity pool, component type names, one component
/// record per alive entity in query order, then resources.
///
/// # Errors
///
/// Returns an error if a component or resource value fails to serialize.
pub fn to_document(world: &World, options: &Options) -> Result<Document> {
    debug!(
        entities = world.len(),
        skip_entities = options.skip_entities,
        skip_all_components = options.skip_all_components,
        skip_all_resources = options.skip_all_resources,
        "encoding world"
    );
    let mut document = Document::default();

    if !options.skip_entities {
        let table = TypeTable::components(world);
        document.pool = Some(pool::encode(world));
        document.types = components::encode_types(&table, options);
        document.components = components::encode(world, &table, options)?;
    }
    document.resources = resources::encode(world, &TypeTable::resources(world), options)?;

    debug!(
        records = document.components.len(),
        types = document.types.len(),
        resources = document.resources.len(),
        "encoded world"
    );
    Ok(document)
}

/// Replays a document into a world.
///
/// The world must have every type the document uses registered, and every
/// resource it patches must already hold a value. A fresh world receives the
/// document's entity pool verbatim; a world that already has entities must
/// have exactly as many alive entities as the document has records, and
/// records are applied to them in query order.
///
/// Type names and entity counts are checked before the world is modified.
/// Any later failure leaves the world partially updated; reset or discard it.
///
/// # Errors
///
/// Returns an error if a type is unregistered, the counts disagree, a payload
/// does not decode, a component cannot be attached, or a resource has no slot.
pub fn from_document(document: Document, world: &mut World, options: &Options) -> Result<()> {
    let Document {
        pool,
        types,
        components,
        resources,
    } = document;
    debug!(
        fresh = world.is_fresh(),
        records = components.len(),
        types = types.len(),
        resources = resources.len(),
        "decoding world"
    );

    if !options.skip_entities {
        let table = TypeTable::components(world);
        if !options.skip_all_components {
            table.validate(&types)?;
        }
        let entities = pool::decode(world, pool.as_ref(), components.len())?;
        components::decode(world, &table, components, &entities, options)?;
    }

    let table = TypeTable::resources(world);
    resources::decode(world, &table, resources, options)?;

    debug!(entities = world.len(), "decoded world");
    Ok(())
}
