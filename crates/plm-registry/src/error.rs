//! Error types for registry, resolution, and list payload operations.

use std::fmt;

use plm_store::StoreError;
use thiserror::Error;

/// Boxed error returned by factories and initialization hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The role a registered type plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeRole {
    Provider,
    List,
}

impl fmt::Display for TypeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRole::Provider => write!(f, "provider"),
            TypeRole::List => write!(f, "list"),
        }
    }
}

/// Errors produced while turning a stored type name into a live instance.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// No type is registered under this name in any role.
    #[error("unknown {role} type: {name}")]
    UnknownType { role: TypeRole, name: String },

    /// The name is registered, but not in the role that was asked for.
    #[error("type {name} is registered as a {registered}, not a {expected}")]
    WrongRole {
        name: String,
        expected: TypeRole,
        registered: TypeRole,
    },

    /// The registered factory failed.
    #[error("failed to construct {role} type {name}: {reason}")]
    Construction {
        role: TypeRole,
        name: String,
        reason: String,
    },

    /// The instance's initialization tag differs from the one its type was
    /// registered with.
    #[error(
        "{role} type {name} is registered as {}, but the instance is tagged otherwise",
        capability(.registered_initializable)
    )]
    CapabilityMismatch {
        role: TypeRole,
        name: String,
        registered_initializable: bool,
    },

    /// The instance was built but its initialization hook failed.
    #[error("failed to initialize {role} type {name}: {reason}")]
    Initialization {
        role: TypeRole,
        name: String,
        reason: String,
    },
}

impl ResolutionError {
    /// The type name this error is about.
    pub fn type_name(&self) -> &str {
        match self {
            ResolutionError::UnknownType { name, .. }
            | ResolutionError::WrongRole { name, .. }
            | ResolutionError::Construction { name, .. }
            | ResolutionError::CapabilityMismatch { name, .. }
            | ResolutionError::Initialization { name, .. } => name,
        }
    }
}

fn capability(initializable: &bool) -> &'static str {
    if *initializable {
        "initializable"
    } else {
        "plain"
    }
}

/// Errors returned by [`PersistentListRegistry`](crate::PersistentListRegistry).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The caller passed an empty key or an unusable list.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A type name could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The backing store rejected or failed a call.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    /// The list's initialization hook failed during `ensure_list`.
    #[error("failed to initialize list '{key}': {reason}")]
    Initialization { key: String, reason: String },
}

/// Convenience type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors from list payload operations.
#[derive(Debug, Error)]
pub enum ListError {
    /// The list has not been wired to a provider.
    #[error("list '{key}' has no provider")]
    NoProvider { key: String },

    /// An insert position is past the end of the list.
    #[error("index {index} out of range for list '{key}' of length {len}")]
    IndexOutOfRange { key: String, index: usize, len: usize },

    /// The provider's storage failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for ListError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Convenience type alias for list payload operations.
pub type ListResult<T> = Result<T, ListError>;
