//! Error types for ecsnap.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::entity::Entity;
use crate::types::Namespace;

/// Result alias used throughout ecsnap.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for ecsnap operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Pushes a frame onto this error's context, creating it if needed.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates a malformed document error.
    #[must_use]
    pub fn malformed_document(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedDocument(message.into()))
    }

    /// Creates an unregistered type error.
    #[must_use]
    pub fn unregistered_type(namespace: Namespace, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnregisteredType {
            namespace,
            name: name.into(),
        })
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(entity: Entity) -> Self {
        Self::new(ErrorKind::EntityNotFound(entity))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SerializationError(message.into()))
    }

    /// Returns the namespace a type-related error refers to, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<Namespace> {
        match &self.kind {
            ErrorKind::UnregisteredType { namespace, .. }
            | ErrorKind::MalformedValue { namespace, .. }
            | ErrorKind::DuplicateTypeName { namespace, .. }
            | ErrorKind::ReservedTypeName { namespace, .. } => Some(*namespace),
            ErrorKind::TooManyTypes(namespace) => Some(*namespace),
            ErrorKind::MissingResourceSlot(_) | ErrorKind::ResourceAlreadyPresent(_) => {
                Some(Namespace::Resource)
            }
            _ => None,
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The document could not be parsed, at the top level or within a sub-value.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A type name in the document has no handle in the destination registry.
    #[error("{namespace} type is not registered: {name}")]
    UnregisteredType {
        /// Which registry the lookup failed in.
        namespace: Namespace,
        /// The unresolved type name.
        name: String,
    },

    /// The number of component records differs from the number of alive entities.
    #[error("found components for {records} entities, but world has {alive} alive entities")]
    EntityCountMismatch {
        /// Number of component records in the document.
        records: usize,
        /// Number of alive entities the records must map onto.
        alive: usize,
    },

    /// A component or resource payload does not decode into its resolved type.
    #[error(
        "malformed {namespace} value for {type_name}{}: {message}",
        entity_suffix(.entity)
    )]
    MalformedValue {
        /// Which namespace the type was resolved in.
        namespace: Namespace,
        /// The registered name of the type.
        type_name: String,
        /// Position of the owning entity record, for components.
        entity: Option<usize>,
        /// The underlying structural decode error.
        message: String,
    },

    /// A resource type is registered but the world holds no value to patch.
    #[error("resource type registered but has no value: {0}")]
    MissingResourceSlot(String),

    /// Encoding a value or writing the document failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Reading or writing a document file failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Entity is not alive in the world.
    #[error("entity not found: {0:?}")]
    EntityNotFound(Entity),

    /// Component type was used before it was registered.
    #[error("component type is not registered: {0}")]
    ComponentNotRegistered(String),

    /// The entity already carries the component.
    #[error("entity {entity:?} already has component {component}")]
    ComponentAlreadyPresent {
        /// The entity that was modified.
        entity: Entity,
        /// The component name.
        component: String,
    },

    /// A type-erased value does not have the Rust type its handle was registered with.
    #[error("value does not match the registered type {0}")]
    ComponentTypeMismatch(String),

    /// A different Rust type is already registered under this name.
    #[error("{namespace} type name is already taken by another type: {name}")]
    DuplicateTypeName {
        /// Which registry rejected the name.
        namespace: Namespace,
        /// The conflicting name.
        name: String,
    },

    /// The name is reserved for document bookkeeping.
    #[error("{namespace} type name is reserved: {name}")]
    ReservedTypeName {
        /// Which registry rejected the name.
        namespace: Namespace,
        /// The reserved name.
        name: String,
    },

    /// The registry ran out of handles.
    #[error("too many {0} types registered (limit is 256)")]
    TooManyTypes(Namespace),

    /// An entity would end up with more than one relation component.
    #[error("entity {0:?} can carry at most one relation component")]
    MultipleRelations(Entity),

    /// A relation target was supplied for a component that is not a relation.
    #[error("component {component} on entity {entity:?} is not a relation")]
    NotARelation {
        /// The entity that was modified.
        entity: Entity,
        /// The component name.
        component: String,
    },

    /// A relation target is not alive.
    #[error("relation target is not alive: {0:?}")]
    DeadRelationTarget(Entity),

    /// An entity pool can only be installed into a world that never allocated entities.
    #[error("entity pool can only be loaded into a fresh or reset world")]
    PoolNotEmpty,

    /// An entity pool dump is internally inconsistent.
    #[error("invalid entity pool: {0}")]
    InvalidPool(String),

    /// A resource of this type already holds a value.
    #[error("resource already present: {0}")]
    ResourceAlreadyPresent(String),
}

fn entity_suffix(entity: &Option<usize>) -> String {
    entity.map(|e| format!(" at entity record {e}")).unwrap_or_default()
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Outermost-last description of what was being done.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.stack {
            writeln!(f, "  {frame}")?;
        }
        Ok(())
    }
}
