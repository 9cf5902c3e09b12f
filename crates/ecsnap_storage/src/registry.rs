//! Type registries mapping stable names to handles, layouts, and value codecs.
//!
//! A world keeps one registry per namespace. Every entry captures, at the
//! moment the concrete Rust type is known, a [`ValueCodec`]: plain function
//! pointers that move values between their type-erased storage form and the
//! structural [`serde_json::Value`] form. Code that only holds a handle (such
//! as a document codec) goes through these pointers and never needs the type.

use std::alloc::Layout;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use ecsnap_foundation::{Error, ErrorKind, RegistryId, Result, TARGET_TAG};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A value stored type-erased inside a world.
pub type ErasedValue = dyn Any + Send + Sync;

/// Marker for types that can be attached to entities.
///
/// Relation components additionally carry a target entity, which the world
/// stores next to the component value. An entity can carry at most one
/// relation component.
///
/// # Example
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Position { x: f64, y: f64 }
/// impl Component for Position {}
///
/// #[derive(Serialize, Deserialize)]
/// struct ChildOf;
/// impl Component for ChildOf { const IS_RELATION: bool = true; }
/// ```
pub trait Component: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Whether this component type is a relation.
    const IS_RELATION: bool = false;
}

/// Types that can be stored as world-scoped singletons.
///
/// This trait has a blanket impl for all applicable types.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Resource for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

type EncodeFn = fn(&ErasedValue) -> serde_json::Result<Value>;
type DecodeFn = fn(Value) -> serde_json::Result<Box<ErasedValue>>;
type PatchFn = fn(&mut ErasedValue, Value) -> serde_json::Result<()>;

/// Function pointers converting one registered type to and from structural values.
#[derive(Clone, Copy)]
pub struct ValueCodec {
    encode: EncodeFn,
    decode: DecodeFn,
    patch: PatchFn,
}

impl ValueCodec {
    /// Builds the codec for `T`.
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let encode: EncodeFn = |value| match value.downcast_ref::<T>() {
            Some(value) => serde_json::to_value(value),
            None => Err(serde::ser::Error::custom(format!(
                "stored value is not a {}",
                type_name::<T>()
            ))),
        };
        let decode: DecodeFn = |value| {
            let decoded: T = serde_json::from_value(value)?;
            Ok(Box::new(decoded) as Box<ErasedValue>)
        };
        let patch: PatchFn = |slot, value| {
            let decoded: T = serde_json::from_value(value)?;
            match slot.downcast_mut::<T>() {
                Some(slot) => {
                    *slot = decoded;
                    Ok(())
                }
                None => Err(serde::de::Error::custom(format!(
                    "slot does not hold a {}",
                    type_name::<T>()
                ))),
            }
        };
        Self {
            encode,
            decode,
            patch,
        }
    }

    /// Converts a stored value into its structural form.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has the wrong type or fails to serialize.
    pub fn encode(&self, value: &ErasedValue) -> serde_json::Result<Value> {
        (self.encode)(value)
    }

    /// Decodes a structural value into a freshly allocated instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not fit the type.
    pub fn decode(&self, value: Value) -> serde_json::Result<Box<ErasedValue>> {
        (self.decode)(value)
    }

    /// Decodes a structural value and overwrites the existing instance in `slot`.
    ///
    /// The slot keeps its identity; only its content changes. On error the
    /// slot is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not fit the type or the slot holds another type.
    pub fn patch(&self, slot: &mut ErasedValue, value: Value) -> serde_json::Result<()> {
        (self.patch)(slot, value)
    }
}

impl std::fmt::Debug for ValueCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValueCodec")
    }
}

/// Metadata of one registered type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    name: String,
    type_id: TypeId,
    layout: Layout,
    is_relation: bool,
    codec: ValueCodec,
}

impl TypeInfo {
    /// Describes `T` under the given stable name.
    #[must_use]
    pub fn of<T>(name: impl Into<String>, is_relation: bool) -> Self
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            layout: Layout::new::<T>(),
            is_relation,
            codec: ValueCodec::of::<T>(),
        }
    }

    /// The stable name the type is known by in documents.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The Rust type behind this entry.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Memory layout of the Rust type.
    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Whether this is a relation component type.
    #[must_use]
    pub fn is_relation(&self) -> bool {
        self.is_relation
    }

    /// The value codec of this type.
    #[must_use]
    pub fn codec(&self) -> &ValueCodec {
        &self.codec
    }
}

/// Registry of the types of one namespace, keyed by handle, name, and `TypeId`.
#[derive(Debug, Clone)]
pub struct TypeRegistry<I> {
    infos: Vec<TypeInfo>,
    by_type: HashMap<TypeId, I>,
    by_name: HashMap<String, I>,
}

impl<I: RegistryId> Default for TypeRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: RegistryId> TypeRegistry<I> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            infos: Vec::new(),
            by_type: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registers a type, returning its handle.
    ///
    /// Registering the same Rust type again returns the existing handle.
    ///
    /// # Errors
    ///
    /// Returns an error if another type already uses the name, the name is
    /// [`TARGET_TAG`], or the registry is full.
    pub fn register(&mut self, info: TypeInfo) -> Result<I> {
        if let Some(&id) = self.by_type.get(&info.type_id) {
            return Ok(id);
        }
        if info.name == TARGET_TAG {
            return Err(Error::new(ErrorKind::ReservedTypeName {
                namespace: I::NAMESPACE,
                name: info.name,
            }));
        }
        if self.by_name.contains_key(&info.name) {
            return Err(Error::new(ErrorKind::DuplicateTypeName {
                namespace: I::NAMESPACE,
                name: info.name,
            }));
        }
        // Handles are u8, which is exactly the width of a `Mask`.
        let index = u8::try_from(self.infos.len())
            .map_err(|_| Error::new(ErrorKind::TooManyTypes(I::NAMESPACE)))?;
        let id = I::from_index(index);
        self.by_type.insert(info.type_id, id);
        self.by_name.insert(info.name.clone(), id);
        self.infos.push(info);
        Ok(id)
    }

    /// Returns the handle of a Rust type, if registered.
    #[must_use]
    pub fn id_of<T: 'static>(&self) -> Option<I> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Returns the handle of a `TypeId`, if registered.
    #[must_use]
    pub fn id_by_type_id(&self, type_id: TypeId) -> Option<I> {
        self.by_type.get(&type_id).copied()
    }

    /// Returns the handle registered under a name.
    #[must_use]
    pub fn id_by_name(&self, name: &str) -> Option<I> {
        self.by_name.get(name).copied()
    }

    /// Returns the metadata of a handle.
    #[must_use]
    pub fn info(&self, id: I) -> Option<&TypeInfo> {
        self.infos.get(usize::from(id.index()))
    }

    /// Iterates over all registered types in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &TypeInfo)> {
        self.infos.iter().enumerate().map(|(index, info)| {
            // Registration caps the registry at 256 entries.
            #[allow(clippy::cast_possible_truncation)]
            let id = I::from_index(index as u8);
            (id, info)
        })
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}
