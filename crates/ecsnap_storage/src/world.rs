//! The store: registries, the entity pool, archetype tables, and resources.

use std::any::type_name;
use std::collections::HashMap;

use ecsnap_foundation::{ComponentId, Entity, Error, ErrorKind, Mask, ResourceId, Result};
use tracing::{debug, trace};

use crate::archetype::{Archetype, Location};
use crate::builder::{ComponentValue, EntityBuilder};
use crate::entity::{EntityDump, EntityPool};
use crate::registry::{Component, ErasedValue, Resource, TypeInfo, TypeRegistry};
use crate::resource::Resources;

/// An entity-component store with type registries and resources.
///
/// Entities are grouped into archetypes by their exact component set. The
/// query order (see [`World::query`]) is archetype creation order, then row
/// order within each archetype; it is deterministic for a given history of
/// operations.
pub struct World {
    components: TypeRegistry<ComponentId>,
    resource_types: TypeRegistry<ResourceId>,
    pool: EntityPool,
    archetypes: Vec<Archetype>,
    archetype_index: HashMap<Mask, usize>,
    /// Row location per entity slot; only meaningful for alive entities.
    locations: Vec<Location>,
    resources: Resources,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world with nothing registered.
    #[must_use]
    pub fn new() -> Self {
        let mut archetype_index = HashMap::new();
        archetype_index.insert(Mask::new(), 0);
        Self {
            components: TypeRegistry::new(),
            resource_types: TypeRegistry::new(),
            pool: EntityPool::new(),
            archetypes: vec![Archetype::new(Mask::new(), None)],
            archetype_index,
            locations: vec![Location::default()],
            resources: Resources::new(),
        }
    }

    // === Registration ===

    /// Registers a component type under its Rust type name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the registry is full.
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentId> {
        self.register_component_named::<T>(type_name::<T>())
    }

    /// Registers a component type under an explicit stable name.
    ///
    /// Registering an already registered type returns its existing handle and
    /// keeps the original name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the registry is full.
    pub fn register_component_named<T: Component>(
        &mut self,
        name: impl Into<String>,
    ) -> Result<ComponentId> {
        let id = self
            .components
            .register(TypeInfo::of::<T>(name, T::IS_RELATION))?;
        trace!(?id, relation = T::IS_RELATION, "registered component type");
        Ok(id)
    }

    /// Returns the handle of a component type, if registered.
    #[must_use]
    pub fn component_id<T: Component>(&self) -> Option<ComponentId> {
        self.components.id_of::<T>()
    }

    /// The component type registry.
    #[must_use]
    pub fn component_registry(&self) -> &TypeRegistry<ComponentId> {
        &self.components
    }

    /// Registers a resource type under its Rust type name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the registry is full.
    pub fn register_resource<T: Resource>(&mut self) -> Result<ResourceId> {
        self.register_resource_named::<T>(type_name::<T>())
    }

    /// Registers a resource type under an explicit stable name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the registry is full.
    pub fn register_resource_named<T: Resource>(
        &mut self,
        name: impl Into<String>,
    ) -> Result<ResourceId> {
        let id = self.resource_types.register(TypeInfo::of::<T>(name, false))?;
        trace!(?id, "registered resource type");
        Ok(id)
    }

    /// Returns the handle of a resource type, if registered.
    #[must_use]
    pub fn resource_id<T: Resource>(&self) -> Option<ResourceId> {
        self.resource_types.id_of::<T>()
    }

    /// The resource type registry.
    #[must_use]
    pub fn resource_registry(&self) -> &TypeRegistry<ResourceId> {
        &self.resource_types
    }

    // === Resources ===

    /// Stores a resource value, registering its type if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ResourceAlreadyPresent`] if the type already holds a value.
    pub fn add_resource<T: Resource>(&mut self, value: T) -> Result<ResourceId> {
        let id = self.register_resource::<T>()?;
        if self.resources.contains(id) {
            return Err(Error::new(ErrorKind::ResourceAlreadyPresent(
                self.resource_name(id),
            )));
        }
        self.resources.insert(id, Box::new(value));
        Ok(id)
    }

    /// Returns a resource value.
    #[must_use]
    pub fn resource<T: Resource>(&self) -> Option<&T> {
        let id = self.resource_id::<T>()?;
        self.resources.get(id)?.downcast_ref()
    }

    /// Returns a resource value mutably.
    pub fn resource_mut<T: Resource>(&mut self) -> Option<&mut T> {
        let id = self.resource_id::<T>()?;
        self.resources.get_mut(id)?.downcast_mut()
    }

    /// Takes a resource value out of its slot. The type stays registered.
    pub fn remove_resource<T: Resource>(&mut self) -> Option<T> {
        let id = self.resource_id::<T>()?;
        let value = self.resources.remove(id)?;
        value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Returns the type-erased value of a resource slot.
    #[must_use]
    pub fn resource_by_id(&self, id: ResourceId) -> Option<&ErasedValue> {
        self.resources.get(id)
    }

    /// Returns the type-erased value of a resource slot, for patching in place.
    pub fn resource_slot_mut(&mut self, id: ResourceId) -> Option<&mut ErasedValue> {
        self.resources.get_mut(id)
    }

    fn resource_name(&self, id: ResourceId) -> String {
        self.resource_types
            .info(id)
            .map_or_else(|| format!("{id:?}"), |info| info.name().to_string())
    }

    fn component_name(&self, id: ComponentId) -> String {
        self.components
            .info(id)
            .map_or_else(|| format!("{id:?}"), |info| info.name().to_string())
    }

    // === Entities ===

    /// Creates an entity without components.
    pub fn new_entity(&mut self) -> Entity {
        let entity = self.pool.get();
        let row = self.archetypes[0].push(entity, Vec::new(), Entity::ZERO);
        self.set_location(
            entity,
            Location {
                archetype: 0,
                row,
            },
        );
        entity
    }

    /// Creates an entity with all of the builder's components at once.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`World::add_components`]; no entity
    /// is created in that case.
    pub fn spawn(&mut self, builder: EntityBuilder) -> Result<Entity> {
        let (values, target) = builder.resolve(&mut self.components)?;
        self.validate_add(Entity::ZERO, &Mask::new(), None, &values, target)?;
        let entity = self.new_entity();
        self.insert_validated(entity, values, target);
        Ok(entity)
    }

    /// Adds a single typed component, registering its type if needed.
    ///
    /// # Errors
    ///
    /// See [`World::add_components`].
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> Result<ComponentId> {
        let id = self.register_component::<T>()?;
        self.add_components(entity, vec![ComponentValue::new(id, Box::new(value))], None)?;
        Ok(id)
    }

    /// Adds a relation component with its target, registering its type if needed.
    ///
    /// # Errors
    ///
    /// See [`World::add_components`].
    pub fn add_relation<T: Component>(
        &mut self,
        entity: Entity,
        value: T,
        target: Entity,
    ) -> Result<ComponentId> {
        let id = self.register_component::<T>()?;
        self.add_components(
            entity,
            vec![ComponentValue::new(id, Box::new(value))],
            Some(target),
        )?;
        Ok(id)
    }

    /// Adds several components to an entity in one atomic step.
    ///
    /// `target` is the relation target of the relation component among
    /// `values`, if one is supplied.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the world unchanged, if the entity is dead,
    /// a handle is unregistered or does not match its value's type, a
    /// component is already present or given twice, the entity would carry
    /// more than one relation, a target is supplied without a relation
    /// component, or the target is not alive.
    pub fn add_components(
        &mut self,
        entity: Entity,
        values: Vec<ComponentValue>,
        target: Option<Entity>,
    ) -> Result<()> {
        let location = self.location(entity)?;
        let archetype = &self.archetypes[location.archetype];
        let (mask, relation) = (*archetype.mask(), archetype.relation());
        self.validate_add(entity, &mask, relation, &values, target)?;
        self.insert_validated(entity, values, target);
        Ok(())
    }

    fn validate_add(
        &self,
        entity: Entity,
        mask: &Mask,
        relation: Option<ComponentId>,
        values: &[ComponentValue],
        target: Option<Entity>,
    ) -> Result<()> {
        let mut added = Mask::new();
        let mut new_relation = None;
        for value in values {
            let id = value.id();
            let info = self.components.info(id).ok_or_else(|| {
                Error::new(ErrorKind::ComponentNotRegistered(format!("{id:?}")))
            })?;
            if value.value().type_id() != info.type_id() {
                return Err(Error::new(ErrorKind::ComponentTypeMismatch(
                    info.name().to_string(),
                )));
            }
            if mask.get(id) || added.get(id) {
                return Err(Error::new(ErrorKind::ComponentAlreadyPresent {
                    entity,
                    component: info.name().to_string(),
                }));
            }
            added.set(id, true);
            if info.is_relation() {
                if relation.is_some() || new_relation.is_some() {
                    return Err(Error::new(ErrorKind::MultipleRelations(entity)));
                }
                new_relation = Some(id);
            }
        }

        if let Some(target) = target {
            if new_relation.is_none() {
                let names: Vec<String> = values
                    .iter()
                    .map(|v| self.component_name(v.id()))
                    .collect();
                return Err(Error::new(ErrorKind::NotARelation {
                    entity,
                    component: names.join(", "),
                }));
            }
            if !target.is_zero() && !self.pool.alive(target) {
                return Err(Error::new(ErrorKind::DeadRelationTarget(target)));
            }
        }
        Ok(())
    }

    /// Moves an alive entity to the archetype that also holds `values`.
    fn insert_validated(
        &mut self,
        entity: Entity,
        values: Vec<ComponentValue>,
        target: Option<Entity>,
    ) {
        if values.is_empty() {
            return;
        }
        let location = self.locations[entity.index as usize];
        let mut mask = *self.archetypes[location.archetype].mask();
        for value in &values {
            mask.set(value.id(), true);
        }
        let dest = self.archetype_for(mask);

        let taken = self.archetypes[location.archetype].swap_remove(location.row);
        if let Some(moved) = taken.moved {
            self.locations[moved.index as usize].row = location.row;
        }

        let mut row_values = taken.values;
        row_values.extend(values.into_iter().map(ComponentValue::into_parts));
        row_values.sort_unstable_by_key(|(id, _)| *id);

        let target = target.unwrap_or(taken.target);
        let row = self.archetypes[dest].push(entity, row_values, target);
        self.set_location(
            entity,
            Location {
                archetype: dest,
                row,
            },
        );
    }

    fn archetype_for(&mut self, mask: Mask) -> usize {
        if let Some(&index) = self.archetype_index.get(&mask) {
            return index;
        }
        let relation = mask
            .iter::<ComponentId>()
            .find(|id| self.components.info(*id).is_some_and(TypeInfo::is_relation));
        let index = self.archetypes.len();
        self.archetypes.push(Archetype::new(mask, relation));
        self.archetype_index.insert(mask, index);
        trace!(?mask, index, "created archetype");
        index
    }

    fn set_location(&mut self, entity: Entity, location: Location) {
        let index = entity.index as usize;
        if self.locations.len() <= index {
            self.locations.resize(index + 1, Location::default());
        }
        self.locations[index] = location;
    }

    fn location(&self, entity: Entity) -> Result<Location> {
        if !self.pool.alive(entity) {
            return Err(Error::entity_not_found(entity));
        }
        Ok(self.locations[entity.index as usize])
    }

    /// Removes an entity and all of its components.
    ///
    /// Relations targeting the removed entity are reset to the zero entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not alive.
    pub fn remove_entity(&mut self, entity: Entity) -> Result<()> {
        let location = self.location(entity)?;
        let taken = self.archetypes[location.archetype].swap_remove(location.row);
        if let Some(moved) = taken.moved {
            self.locations[moved.index as usize].row = location.row;
        }
        self.pool.recycle(entity)?;
        for archetype in &mut self.archetypes {
            if archetype.relation().is_some() {
                archetype.clear_target(entity);
            }
        }
        trace!(?entity, "removed entity");
        Ok(())
    }

    /// Changes the target of an entity's relation component.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is dead, the component is not the
    /// entity's relation, or the target is neither zero nor alive.
    pub fn set_relation(&mut self, entity: Entity, id: ComponentId, target: Entity) -> Result<()> {
        let location = self.relation_location(entity, id)?;
        if !target.is_zero() && !self.pool.alive(target) {
            return Err(Error::new(ErrorKind::DeadRelationTarget(target)));
        }
        self.archetypes[location.archetype].set_target(location.row, target);
        Ok(())
    }

    /// Returns the target of an entity's relation component.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is dead or the component is not the
    /// entity's relation.
    pub fn relation(&self, entity: Entity, id: ComponentId) -> Result<Entity> {
        let location = self.relation_location(entity, id)?;
        Ok(self.archetypes[location.archetype].target(location.row))
    }

    fn relation_location(&self, entity: Entity, id: ComponentId) -> Result<Location> {
        let location = self.location(entity)?;
        if self.archetypes[location.archetype].relation() != Some(id) {
            return Err(Error::new(ErrorKind::NotARelation {
                entity,
                component: self.component_name(id),
            }));
        }
        Ok(location)
    }

    /// Returns the entity's relation component and its target, if it has one.
    #[must_use]
    pub fn relation_of(&self, entity: Entity) -> Option<(ComponentId, Entity)> {
        let location = self.location(entity).ok()?;
        let archetype = &self.archetypes[location.archetype];
        archetype
            .relation()
            .map(|id| (id, archetype.target(location.row)))
    }

    /// Returns a component of an entity.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        let id = self.component_id::<T>()?;
        self.get_by_id(entity, id)?.downcast_ref()
    }

    /// Returns a component of an entity mutably.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let id = self.component_id::<T>()?;
        self.get_by_id_mut(entity, id)?.downcast_mut()
    }

    /// Returns a type-erased component of an entity.
    #[must_use]
    pub fn get_by_id(&self, entity: Entity, id: ComponentId) -> Option<&ErasedValue> {
        let location = self.location(entity).ok()?;
        self.archetypes[location.archetype].get(location.row, id)
    }

    /// Returns a type-erased component of an entity mutably.
    pub fn get_by_id_mut(&mut self, entity: Entity, id: ComponentId) -> Option<&mut ErasedValue> {
        let location = self.location(entity).ok()?;
        self.archetypes[location.archetype].get_mut(location.row, id)
    }

    /// Returns true if the entity is alive and has the component.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.component_id::<T>()
            .is_some_and(|id| self.has_id(entity, id))
    }

    /// Returns true if the entity is alive and has the component handle.
    #[must_use]
    pub fn has_id(&self, entity: Entity, id: ComponentId) -> bool {
        self.location(entity)
            .is_ok_and(|location| self.archetypes[location.archetype].mask().get(id))
    }

    /// Returns the component handles of an entity in ascending order.
    #[must_use]
    pub fn component_ids(&self, entity: Entity) -> Option<&[ComponentId]> {
        let location = self.location(entity).ok()?;
        Some(self.archetypes[location.archetype].ids())
    }

    /// Iterates over all alive entities in query order.
    pub fn query(&self) -> impl Iterator<Item = Entity> + '_ {
        self.archetypes
            .iter()
            .flat_map(|archetype| archetype.entities().iter().copied())
    }

    /// Iterates, in query order, over alive entities carrying every handle in `mask`.
    pub fn query_with<'a>(&'a self, mask: &'a Mask) -> impl Iterator<Item = Entity> + 'a {
        self.archetypes
            .iter()
            .filter(|archetype| archetype.mask().contains_all(mask))
            .flat_map(|archetype| archetype.entities().iter().copied())
    }

    /// Checks if an entity is alive.
    #[must_use]
    pub fn alive(&self, entity: Entity) -> bool {
        self.pool.alive(entity)
    }

    /// Returns the number of alive entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Returns true if there are no alive entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    // === Pool ===

    /// The entity pool.
    #[must_use]
    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    /// Returns true if no entity was ever created since construction or the last reset.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.pool.is_fresh()
    }

    /// Dumps the entity pool, with the alive list in query order.
    #[must_use]
    pub fn dump_entities(&self) -> EntityDump {
        self.pool.dump(self.query().map(|e| e.index).collect())
    }

    /// Installs a dumped entity pool into a fresh world.
    ///
    /// Alive entities are created without components, in the dump's alive
    /// order, which therefore becomes the query order. Returns them in that
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::PoolNotEmpty`] if the world is not fresh and
    /// [`ErrorKind::InvalidPool`] if the dump is inconsistent.
    pub fn load_entities(&mut self, dump: &EntityDump) -> Result<Vec<Entity>> {
        if !self.pool.is_fresh() {
            return Err(Error::new(ErrorKind::PoolNotEmpty));
        }
        let pool = EntityPool::from_dump(dump)?;
        let alive = dump.alive_entities()?;

        self.pool = pool;
        self.locations = vec![Location::default(); self.pool.total_slots()];
        for &entity in &alive {
            let row = self.archetypes[0].push(entity, Vec::new(), Entity::ZERO);
            self.locations[entity.index as usize] = Location { archetype: 0, row };
        }
        debug!(
            alive = alive.len(),
            slots = self.pool.total_slots(),
            available = self.pool.available(),
            "loaded entity pool"
        );
        Ok(alive)
    }

    /// Removes all entities and resource values. Registrations are kept.
    pub fn reset(&mut self) {
        let alive = self.len();
        self.pool = EntityPool::new();
        self.archetypes = vec![Archetype::new(Mask::new(), None)];
        self.archetype_index.clear();
        self.archetype_index.insert(Mask::new(), 0);
        self.locations = vec![Location::default()];
        self.resources.clear();
        debug!(removed = alive, "reset world");
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.len())
            .field("archetypes", &self.archetypes.len())
            .field("component_types", &self.components.len())
            .field("resource_types", &self.resource_types.len())
            .field("resources", &self.resources)
            .finish()
    }
}
