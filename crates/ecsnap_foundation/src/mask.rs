//! Fixed-width bit sets over registry handles.

use std::fmt;

use crate::types::RegistryId;

/// Number of distinct handles a [`Mask`] can hold, and therefore the
/// maximum number of types per registry namespace.
pub const MASK_TOTAL_BITS: usize = 256;

const WORDS: usize = MASK_TOTAL_BITS / 64;

/// A 256-bit set of registry handles.
///
/// Used as the identity of an archetype (which component types an entity
/// carries) and for the codec's per-type skip sets.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Mask {
    bits: [u64; WORDS],
}

impl Mask {
    /// Creates an empty mask.
    #[must_use]
    pub const fn new() -> Self {
        Self { bits: [0; WORDS] }
    }

    /// Creates a mask with the given handles set.
    pub fn from_ids<I>(ids: impl IntoIterator<Item = I>) -> Self
    where
        I: RegistryId,
    {
        let mut mask = Self::new();
        for id in ids {
            mask.set(id, true);
        }
        mask
    }

    /// Returns whether the handle is set.
    #[must_use]
    pub fn get<I: RegistryId>(&self, id: I) -> bool {
        let bit = usize::from(id.index());
        self.bits[bit / 64] & (1 << (bit % 64)) != 0
    }

    /// Sets or clears the handle.
    pub fn set<I: RegistryId>(&mut self, id: I, value: bool) {
        let bit = usize::from(id.index());
        if value {
            self.bits[bit / 64] |= 1 << (bit % 64);
        } else {
            self.bits[bit / 64] &= !(1 << (bit % 64));
        }
    }

    /// Returns true if no handle is set.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    /// Returns the number of set handles.
    #[must_use]
    pub fn total_bits_set(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if every handle in `other` is also set in `self`.
    #[must_use]
    pub fn contains_all(&self, other: &Mask) -> bool {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .all(|(a, b)| a & b == *b)
    }

    /// Returns true if any handle is set in both masks.
    #[must_use]
    pub fn intersects(&self, other: &Mask) -> bool {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .any(|(a, b)| a & b != 0)
    }

    /// Returns the union of both masks.
    #[must_use]
    pub fn or(&self, other: &Mask) -> Mask {
        let mut bits = self.bits;
        for (word, o) in bits.iter_mut().zip(other.bits.iter()) {
            *word |= o;
        }
        Mask { bits }
    }

    /// Iterates over the set handles in ascending order.
    pub fn iter<I: RegistryId>(&self) -> impl Iterator<Item = I> + '_ {
        (0..MASK_TOTAL_BITS).filter_map(move |bit| {
            // `bit` < 256, so the cast is lossless
            #[allow(clippy::cast_possible_truncation)]
            let id = I::from_index(bit as u8);
            self.get(id).then_some(id)
        })
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<usize> = (0..MASK_TOTAL_BITS)
            .filter(|bit| self.bits[bit / 64] & (1 << (bit % 64)) != 0)
            .collect();
        write!(f, "Mask{set:?}")
    }
}
