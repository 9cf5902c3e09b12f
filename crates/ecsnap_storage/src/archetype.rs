//! Archetype tables: entities grouped by the exact set of components they carry.
//!
//! Iterating archetypes in creation order and rows in insertion order defines
//! the world's query order.

use ecsnap_foundation::{ComponentId, Entity, Mask};

use crate::registry::ErasedValue;

/// Where an entity's row lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Location {
    pub archetype: usize,
    pub row: usize,
}

/// Everything a row owned, returned when it is taken out of its table.
pub(crate) struct TakenRow {
    pub values: Vec<(ComponentId, Box<ErasedValue>)>,
    pub target: Entity,
    /// The entity that was swapped into the vacated row, if any.
    pub moved: Option<Entity>,
}

/// Column storage for one component set.
pub(crate) struct Archetype {
    mask: Mask,
    /// Component handles in ascending order; `columns` is parallel to it.
    ids: Vec<ComponentId>,
    relation: Option<ComponentId>,
    entities: Vec<Entity>,
    columns: Vec<Vec<Box<ErasedValue>>>,
    /// Relation target per row, zero when unset or when there is no relation.
    targets: Vec<Entity>,
}

impl Archetype {
    pub fn new(mask: Mask, relation: Option<ComponentId>) -> Self {
        let ids: Vec<ComponentId> = mask.iter().collect();
        let columns = ids.iter().map(|_| Vec::new()).collect();
        Self {
            mask,
            ids,
            relation,
            entities: Vec::new(),
            columns,
            targets: Vec::new(),
        }
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn ids(&self) -> &[ComponentId] {
        &self.ids
    }

    pub fn relation(&self) -> Option<ComponentId> {
        self.relation
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    fn column(&self, id: ComponentId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    /// Appends a row. `values` must be sorted by handle and match `ids` exactly.
    pub fn push(
        &mut self,
        entity: Entity,
        values: Vec<(ComponentId, Box<ErasedValue>)>,
        target: Entity,
    ) -> usize {
        debug_assert_eq!(values.len(), self.ids.len());
        for (column, (id, value)) in self.columns.iter_mut().zip(values) {
            debug_assert!(self.ids.contains(&id));
            column.push(value);
        }
        self.entities.push(entity);
        self.targets.push(target);
        self.entities.len() - 1
    }

    /// Removes a row by swapping the last row into its place.
    pub fn swap_remove(&mut self, row: usize) -> TakenRow {
        let last = self.entities.len() - 1;
        self.entities.swap_remove(row);
        let target = self.targets.swap_remove(row);
        let values = self
            .ids
            .iter()
            .copied()
            .zip(self.columns.iter_mut().map(|column| column.swap_remove(row)))
            .collect();
        let moved = (row != last).then(|| self.entities[row]);
        TakenRow {
            values,
            target,
            moved,
        }
    }

    pub fn get(&self, row: usize, id: ComponentId) -> Option<&ErasedValue> {
        let column = self.column(id)?;
        self.columns[column].get(row).map(AsRef::as_ref)
    }

    pub fn get_mut(&mut self, row: usize, id: ComponentId) -> Option<&mut ErasedValue> {
        let column = self.column(id)?;
        self.columns[column].get_mut(row).map(AsMut::as_mut)
    }

    pub fn target(&self, row: usize) -> Entity {
        self.targets[row]
    }

    pub fn set_target(&mut self, row: usize, target: Entity) {
        self.targets[row] = target;
    }

    /// Resets every relation pointing at `target` to the zero entity.
    pub fn clear_target(&mut self, target: Entity) {
        for slot in self.targets.iter_mut().filter(|t| **t == target) {
            *slot = Entity::ZERO;
        }
    }
}
