//! Entity identifiers with generational indices.

use std::fmt;

/// Entity identifier with generational index for stale reference detection.
///
/// The generation counter increments when an entity index is recycled,
/// so a handle to a removed entity never matches the slot's new occupant.
///
/// # Layout
/// - `index`: 32-bit slot index into the entity pool
/// - `generation`: 32-bit generation counter
///
/// The zero entity (`[0, 0]`) means "no entity". Slot 0 of every pool is
/// reserved, so the zero entity is never alive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct Entity {
    /// Index into the entity pool.
    pub index: u32,
    /// Generation counter for stale reference detection.
    pub generation: u32,
}

impl Entity {
    /// The reserved "no entity" value.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new entity ID with the given index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns true if this is the zero entity.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.index == 0 && self.generation == 0
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            write!(f, "Entity(zero)")
        } else {
            write!(f, "Entity({}v{})", self.index, self.generation)
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            write!(f, "Entity(zero)")
        } else {
            write!(f, "Entity({})", self.index)
        }
    }
}

// Entities travel as a two-element `[index, generation]` array.
#[cfg(feature = "serde")]
mod serde_support {
    use super::Entity;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Entity {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            [self.index, self.generation].serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Entity {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let [index, generation] = <[u32; 2]>::deserialize(deserializer)?;
            Ok(Entity::new(index, generation))
        }
    }
}
