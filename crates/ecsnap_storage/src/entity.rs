//! Entity lifecycle management with generational indices.
//!
//! The `EntityPool` hands out entities and recycles their slots. Dead slots
//! form an intrusive free list: a dead slot's `index` field holds the index of
//! the next free slot, so the whole pool (dead slots included) can be dumped
//! and reinstalled verbatim.

use ecsnap_foundation::{Entity, Error, ErrorKind, Result};
use serde::{Deserialize, Serialize};

/// The entity stored in the reserved slot 0 of every pool.
const RESERVED: Entity = Entity::new(0, u32::MAX);

/// Manages entity allocation and generation tracking.
///
/// Recycled slots are reused last-in first-out. Recycling bumps the slot's
/// generation, so handles to the previous occupant are never alive again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPool {
    /// Every slot ever allocated. Slot 0 is reserved.
    entities: Vec<Entity>,
    /// Head of the free list (only meaningful while `available > 0`).
    next: u32,
    /// Number of slots on the free list.
    available: u32,
}

/// Serializable snapshot of an [`EntityPool`] plus the world's alive order.
///
/// `alive` lists the indices of all alive entities in query order; component
/// records of a document line up with it one to one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityDump {
    /// All slots, including the reserved slot and dead slots.
    pub entities: Vec<Entity>,
    /// Indices of alive entities, in query order.
    pub alive: Vec<u32>,
    /// Head of the free list.
    pub next: u32,
    /// Number of recyclable slots.
    pub available: u32,
}

impl EntityDump {
    /// Returns the alive entities in dump order.
    ///
    /// # Errors
    ///
    /// Returns an error if an alive index points outside the slot table.
    pub fn alive_entities(&self) -> Result<Vec<Entity>> {
        self.alive
            .iter()
            .map(|&index| {
                self.entities.get(index as usize).copied().ok_or_else(|| {
                    Error::new(ErrorKind::InvalidPool(format!(
                        "alive index {index} is outside the pool of {} slots",
                        self.entities.len()
                    )))
                })
            })
            .collect()
    }
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityPool {
    /// Creates a new pool holding only the reserved slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: vec![RESERVED],
            next: 0,
            available: 0,
        }
    }

    /// Allocates an entity, reusing a recycled slot when one is available.
    pub fn get(&mut self) -> Entity {
        if self.available == 0 {
            return self.get_new();
        }
        let curr = self.next;
        let slot = &mut self.entities[curr as usize];
        self.next = slot.index;
        slot.index = curr;
        self.available -= 1;
        *slot
    }

    // Slot count is bounded by u32 entity indices.
    #[allow(clippy::cast_possible_truncation)]
    fn get_new(&mut self) -> Entity {
        let entity = Entity::new(self.entities.len() as u32, 0);
        self.entities.push(entity);
        entity
    }

    /// Returns an entity's slot to the free list.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not alive (stale, reserved, or never allocated).
    pub fn recycle(&mut self, entity: Entity) -> Result<()> {
        if !self.alive(entity) {
            return Err(Error::entity_not_found(entity));
        }
        let slot = &mut self.entities[entity.index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.index = self.next;
        self.next = entity.index;
        self.available += 1;
        Ok(())
    }

    /// Checks if an entity is alive.
    #[must_use]
    pub fn alive(&self, entity: Entity) -> bool {
        entity.index != 0
            && self
                .entities
                .get(entity.index as usize)
                .is_some_and(|slot| *slot == entity)
    }

    /// Returns the alive entity stored at `index`, if any.
    #[must_use]
    pub fn entity_at(&self, index: u32) -> Option<Entity> {
        self.entities
            .get(index as usize)
            .copied()
            .filter(|e| e.index == index && index != 0)
            .filter(|e| self.alive(*e))
    }

    /// Returns the number of alive entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len() - 1 - self.available as usize
    }

    /// Returns true if there are no alive entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the pool never allocated a slot (or was reset).
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.entities.len() == 1 && self.available == 0
    }

    /// Returns the total number of slots, dead and alive, including the reserved one.
    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.entities.len()
    }

    /// Returns the number of recyclable slots.
    #[must_use]
    pub fn available(&self) -> u32 {
        self.available
    }

    /// Dumps the pool, recording `alive` as the alive order.
    #[must_use]
    pub fn dump(&self, alive: Vec<u32>) -> EntityDump {
        EntityDump {
            entities: self.entities.clone(),
            alive,
            next: self.next,
            available: self.available,
        }
    }

    /// Rebuilds a pool from a dump, validating its internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidPool`] if the slot table, free list, and
    /// alive list do not describe the same pool.
    pub fn from_dump(dump: &EntityDump) -> Result<Self> {
        let invalid = |msg: String| Error::new(ErrorKind::InvalidPool(msg));
        let len = dump.entities.len();

        match dump.entities.first() {
            Some(reserved) if reserved.index == 0 => {}
            _ => return Err(invalid("slot 0 must be the reserved entity".to_string())),
        }

        let mut state = vec![SlotState::Unclaimed; len];
        state[0] = SlotState::Reserved;

        for &index in &dump.alive {
            let i = index as usize;
            if i == 0 || i >= len {
                return Err(invalid(format!("alive index {index} is out of range")));
            }
            if state[i] != SlotState::Unclaimed {
                return Err(invalid(format!("alive index {index} is listed twice")));
            }
            if dump.entities[i].index != index {
                return Err(invalid(format!("alive slot {index} does not hold its own index")));
            }
            state[i] = SlotState::Alive;
        }

        let mut cursor = dump.next;
        for _ in 0..dump.available {
            let i = cursor as usize;
            if i == 0 || i >= len || state[i] != SlotState::Unclaimed {
                return Err(invalid(format!("free list is broken at slot {cursor}")));
            }
            state[i] = SlotState::Free;
            cursor = dump.entities[i].index;
        }
        // The last free slot, or `next` of an empty list, points at slot 0.
        if cursor != 0 {
            return Err(invalid(format!("free list does not end at slot 0 (ends at {cursor})")));
        }

        if let Some(orphan) = state.iter().position(|s| *s == SlotState::Unclaimed) {
            return Err(invalid(format!("slot {orphan} is neither alive nor free")));
        }

        Ok(Self {
            entities: dump.entities.clone(),
            next: dump.next,
            available: dump.available,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Unclaimed,
    Reserved,
    Alive,
    Free,
}
