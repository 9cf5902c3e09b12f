//! Atomic multi-component construction.

use std::any::type_name;

use ecsnap_foundation::{ComponentId, Entity, Result};

use crate::registry::{Component, ErasedValue, TypeInfo, TypeRegistry};

/// A type-erased component value paired with its registry handle.
///
/// This is the unit the world's atomic multi-add works on; decoders produce
/// these from structural values without knowing the concrete type.
#[derive(Debug)]
pub struct ComponentValue {
    id: ComponentId,
    value: Box<ErasedValue>,
}

impl ComponentValue {
    /// Pairs a value with the handle it is stored under.
    ///
    /// The world checks that the value's type matches the handle when the
    /// component is attached.
    #[must_use]
    pub fn new(id: ComponentId, value: Box<ErasedValue>) -> Self {
        Self { id, value }
    }

    /// The registry handle.
    #[must_use]
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The stored value.
    #[must_use]
    pub fn value(&self) -> &ErasedValue {
        self.value.as_ref()
    }

    pub(crate) fn into_parts(self) -> (ComponentId, Box<ErasedValue>) {
        (self.id, self.value)
    }
}

type RegisterFn = fn(&mut TypeRegistry<ComponentId>) -> Result<ComponentId>;

enum Pending {
    Typed(RegisterFn, Box<ErasedValue>),
    Erased(ComponentValue),
}

/// Builder for spawning an entity with all of its components at once.
///
/// Typed components are registered on demand (under their Rust type name)
/// when the builder is spawned.
///
/// # Example
/// ```ignore
/// let child = world.spawn(
///     EntityBuilder::new()
///         .with(Position { x: 3.0, y: 4.0 })
///         .with_relation(ChildOf, parent),
/// )?;
/// ```
#[derive(Default)]
pub struct EntityBuilder {
    components: Vec<Pending>,
    target: Option<Entity>,
}

impl EntityBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            target: None,
        }
    }

    /// Adds a typed component.
    #[must_use]
    pub fn with<T: Component>(mut self, value: T) -> Self {
        let register: RegisterFn =
            |registry| registry.register(TypeInfo::of::<T>(type_name::<T>(), T::IS_RELATION));
        self.components
            .push(Pending::Typed(register, Box::new(value)));
        self
    }

    /// Adds a relation component together with its target entity.
    #[must_use]
    pub fn with_relation<T: Component>(mut self, value: T, target: Entity) -> Self {
        self.target = Some(target);
        self.with(value)
    }

    /// Adds an already type-erased component.
    #[must_use]
    pub fn with_value(mut self, value: ComponentValue) -> Self {
        self.components.push(Pending::Erased(value));
        self
    }

    /// Returns the number of components in the builder.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the builder holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Resolves all components against the registry, registering typed ones.
    pub(crate) fn resolve(
        self,
        registry: &mut TypeRegistry<ComponentId>,
    ) -> Result<(Vec<ComponentValue>, Option<Entity>)> {
        let mut values = Vec::with_capacity(self.components.len());
        for pending in self.components {
            match pending {
                Pending::Typed(register, value) => {
                    let id = register(registry)?;
                    values.push(ComponentValue::new(id, value));
                }
                Pending::Erased(value) => values.push(value),
            }
        }
        Ok((values, self.target))
    }
}
