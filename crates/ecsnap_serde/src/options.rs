//! Inclusion and exclusion switches applied on both the encode and decode paths.

use std::any::TypeId;

use ecsnap_storage::{Component, Resource};

/// A set of types to skip, given by Rust type or by stable name.
///
/// Entries are resolved against a world's registry when a document is
/// encoded or decoded; entries naming unregistered types match nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkipSet {
    /// Types given by their Rust type.
    pub types: Vec<TypeId>,
    /// Types given by their registered name.
    pub names: Vec<String>,
}

impl SkipSet {
    /// Returns true if the set names nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.names.is_empty()
    }

    fn insert_type(&mut self, type_id: TypeId) {
        if !self.types.contains(&type_id) {
            self.types.push(type_id);
        }
    }

    fn insert_name(&mut self, name: String) {
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }
}

/// Filter switches for a single encode or decode call.
///
/// All switches are independent. A document written with some switches set
/// can be read with different ones: the reader simply finds nothing to do
/// for data that was omitted, and discards data it was told to skip.
///
/// | switch | encode | decode |
/// |---|---|---|
/// | `skip_entities` | no pool, type list, or component records | no pool install, no component decode |
/// | `skip_all_components` | every record is empty, type list is empty | every record attaches nothing |
/// | `skip_components` | named types left out of records and type list | payloads discarded undecoded |
/// | `skip_all_resources` | resource mapping is empty | resource mapping ignored |
/// | `skip_resources` | named resources left out | payloads discarded undecoded |
///
/// Types skipped by name or type must still be registered when decoding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Skip the entity pool and all component records.
    pub skip_entities: bool,
    /// Keep entity records but drop every component.
    pub skip_all_components: bool,
    /// Component types to drop.
    pub skip_components: SkipSet,
    /// Skip all resources.
    pub skip_all_resources: bool,
    /// Resource types to drop.
    pub skip_resources: SkipSet,
}

impl Options {
    /// Creates options that filter nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to skip entities and all of their components.
    #[must_use]
    pub fn skip_entities(mut self) -> Self {
        self.skip_entities = true;
        self
    }

    /// Builder method to skip all components while keeping entities.
    #[must_use]
    pub fn skip_all_components(mut self) -> Self {
        self.skip_all_components = true;
        self
    }

    /// Builder method to skip one component type.
    #[must_use]
    pub fn skip_component<T: Component>(mut self) -> Self {
        self.skip_components.insert_type(TypeId::of::<T>());
        self
    }

    /// Builder method to skip a component type by its registered name.
    #[must_use]
    pub fn skip_component_named(mut self, name: impl Into<String>) -> Self {
        self.skip_components.insert_name(name.into());
        self
    }

    /// Builder method to skip all resources.
    #[must_use]
    pub fn skip_all_resources(mut self) -> Self {
        self.skip_all_resources = true;
        self
    }

    /// Builder method to skip one resource type.
    #[must_use]
    pub fn skip_resource<T: Resource>(mut self) -> Self {
        self.skip_resources.insert_type(TypeId::of::<T>());
        self
    }

    /// Builder method to skip a resource type by its registered name.
    #[must_use]
    pub fn skip_resource_named(mut self, name: impl Into<String>) -> Self {
        self.skip_resources.insert_name(name.into());
        self
    }

    /// Returns true if no switch is set.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }
}
