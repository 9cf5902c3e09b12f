//! Registry handles and the namespaces they live in.

use std::fmt;

/// The two disjoint type namespaces of a world.
///
/// A component and a resource may share a Rust type (and therefore a name),
/// but they are registered, resolved, and reported separately.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Entity-scoped component types.
    Component,
    /// World-scoped singleton resource types.
    Resource,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component => write!(f, "component"),
            Self::Resource => write!(f, "resource"),
        }
    }
}

/// Reserved record key holding the target of an entity's relation component.
///
/// Rust type names never contain a `.`, so no default name can collide with
/// it, and registries refuse it as an explicit name.
pub const TARGET_TAG: &str = "ecsnap.relation.Target";

/// A compact handle into one of the world's type registries.
///
/// Handles are dense, starting at zero in registration order, and always
/// fit into a [`Mask`](crate::Mask).
pub trait RegistryId: Copy + Eq + fmt::Debug {
    /// The namespace this kind of handle belongs to.
    const NAMESPACE: Namespace;

    /// Creates a handle from its raw index.
    fn from_index(index: u8) -> Self;

    /// Returns the raw index of this handle.
    fn index(self) -> u8;
}

/// Handle of a registered component type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u8);

/// Handle of a registered resource type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u8);

impl RegistryId for ComponentId {
    const NAMESPACE: Namespace = Namespace::Component;

    fn from_index(index: u8) -> Self {
        Self(index)
    }

    fn index(self) -> u8 {
        self.0
    }
}

impl RegistryId for ResourceId {
    const NAMESPACE: Namespace = Namespace::Resource;

    fn from_index(index: u8) -> Self {
        Self(index)
    }

    fn index(self) -> u8 {
        self.0
    }
}
