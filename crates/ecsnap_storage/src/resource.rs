//! World-scoped singleton slots.

use ecsnap_foundation::ResourceId;

use crate::registry::ErasedValue;

/// One optional value slot per registered resource type.
///
/// A registered type whose slot is empty has no value to read or patch.
#[derive(Default)]
pub struct Resources {
    slots: Vec<Option<Box<ErasedValue>>>,
}

impl Resources {
    /// Creates an empty resource table.
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Returns the value stored for a handle.
    #[must_use]
    pub fn get(&self, id: ResourceId) -> Option<&ErasedValue> {
        self.slots.get(usize::from(id.0))?.as_deref()
    }

    /// Returns the value stored for a handle, mutably.
    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut ErasedValue> {
        self.slots.get_mut(usize::from(id.0))?.as_deref_mut()
    }

    /// Returns true if the handle's slot holds a value.
    #[must_use]
    pub fn contains(&self, id: ResourceId) -> bool {
        self.get(id).is_some()
    }

    /// Stores a value, returning the previous one.
    pub fn insert(&mut self, id: ResourceId, value: Box<ErasedValue>) -> Option<Box<ErasedValue>> {
        let index = usize::from(id.0);
        if self.slots.len() <= index {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index].replace(value)
    }

    /// Empties a slot, returning its value.
    pub fn remove(&mut self, id: ResourceId) -> Option<Box<ErasedValue>> {
        self.slots.get_mut(usize::from(id.0))?.take()
    }

    /// Returns the number of slots holding a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns true if no slot holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources").field("len", &self.len()).finish()
    }
}
