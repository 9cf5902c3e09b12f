//! Name and handle lookups against a destination world's registries.

use std::collections::HashMap;

use ecsnap_foundation::{ComponentId, Error, Mask, RegistryId, ResourceId, Result};
use ecsnap_storage::{TypeInfo, TypeRegistry, World};

use crate::options::SkipSet;

/// Lookup tables for one namespace of a world's registered types.
///
/// Built by enumerating what the world has registered; the codec never
/// registers anything itself. Owning the tables keeps the world free for
/// mutation while records are replayed.
#[derive(Debug, Clone)]
pub struct TypeTable<I> {
    by_name: HashMap<String, I>,
    infos: Vec<(I, TypeInfo)>,
}

impl TypeTable<ComponentId> {
    /// Builds the component table of a world.
    #[must_use]
    pub fn components(world: &World) -> Self {
        Self::new(world.component_registry())
    }
}

impl TypeTable<ResourceId> {
    /// Builds the resource table of a world.
    #[must_use]
    pub fn resources(world: &World) -> Self {
        Self::new(world.resource_registry())
    }
}

impl<I: RegistryId> TypeTable<I> {
    /// Builds the table from a registry.
    #[must_use]
    pub fn new(registry: &TypeRegistry<I>) -> Self {
        let infos: Vec<(I, TypeInfo)> = registry
            .iter()
            .map(|(id, info)| (id, info.clone()))
            .collect();
        let by_name = infos
            .iter()
            .map(|(id, info)| (info.name().to_string(), *id))
            .collect();
        Self { by_name, infos }
    }

    /// Resolves a type name to its handle.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnregisteredType`](ecsnap_foundation::ErrorKind::UnregisteredType),
    /// naming this table's namespace, if the name is unknown.
    pub fn resolve(&self, name: &str) -> Result<I> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::unregistered_type(I::NAMESPACE, name))
    }

    /// Checks that every name is registered.
    ///
    /// # Errors
    ///
    /// Returns an error for the first unknown name.
    pub fn validate<'a>(&self, names: impl IntoIterator<Item = &'a String>) -> Result<()> {
        for name in names {
            self.resolve(name)?;
        }
        Ok(())
    }

    /// Returns the metadata of a handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle was not registered when the table was built.
    pub fn info(&self, id: I) -> Result<&TypeInfo> {
        self.infos
            .get(usize::from(id.index()))
            .map(|(_, info)| info)
            .ok_or_else(|| Error::unregistered_type(I::NAMESPACE, format!("{id:?}")))
    }

    /// Iterates over all types in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &TypeInfo)> {
        self.infos.iter().map(|(id, info)| (*id, info))
    }

    /// Resolves a skip set to the handles it names. Unregistered entries match nothing.
    #[must_use]
    pub fn mask(&self, skip: &SkipSet) -> Mask {
        let mut mask = Mask::new();
        for (id, info) in &self.infos {
            if skip.types.contains(&info.type_id()) || skip.names.iter().any(|n| n == info.name())
            {
                mask.set(*id, true);
            }
        }
        mask
    }

    /// Returns the number of types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}
