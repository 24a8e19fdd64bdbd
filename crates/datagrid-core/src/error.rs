//! Error types for the datagrid core library.

use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the datagrid library.
///
/// Every terminal failure of a truncate request maps to exactly one variant,
/// and every variant has a stable numeric code (see [`Error::code`]) so that
/// callers on the other side of a wire boundary can tell the failure kinds
/// apart without parsing messages.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed request fields
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Mutually exclusive targeting options supplied together
    #[error("'target_resource' and 'replica_number' are incompatible options.")]
    IncompatibleParameters,

    /// Admin mode requested by a non-privileged caller
    #[error("{0}")]
    InsufficientPrivilege(String),

    /// Zone determination or remote forwarding failed
    #[error("Remote routing error: {0}")]
    RemoteRouting(String),

    /// No replica matches the resolved hierarchy or caller constraints
    #[error("Replica not found: {0}")]
    ReplicaNotFound(String),

    /// Target object is held by an active conflicting operation
    #[error("Failed to truncate [{0}]: object is locked.")]
    LockedAccess(String),

    /// Physical resize failed with an unrecoverable condition
    #[error("Physical truncate failed: {0}")]
    PhysicalTruncate(String),

    /// Resize succeeded but the catalog update did not.
    ///
    /// The catalog may now disagree with the physical data. This is surfaced
    /// distinctly so operators know manual reconciliation is required.
    #[error("Catalog update failed, catalog may be inconsistent with physical data: {0}")]
    CatalogUpdate(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog read or persistence error outside the commit point
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Unknown error
    #[error("Unknown error occurred.")]
    Unknown,
}

/// Physical-storage errors.
///
/// `NotFound` and `PermissionDenied` are kept distinct from `Backend` because
/// the truncation executor tolerates them (the catalog is the source of
/// truth) while any other storage failure is fatal.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Physical object not found
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Permission denied by the storage layer
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Storage backend error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Invalid physical path
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl Error {
    /// Stable numeric code for the wire boundary. `0` is reserved for
    /// success and no-op outcomes.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidInput(_) => 1,
            Error::IncompatibleParameters => 2,
            Error::InsufficientPrivilege(_) => 3,
            Error::RemoteRouting(_) => 4,
            Error::ReplicaNotFound(_) => 5,
            Error::LockedAccess(_) => 6,
            Error::PhysicalTruncate(_) | Error::Storage(_) => 7,
            Error::CatalogUpdate(_) => 8,
            Error::Catalog(_) | Error::Config(_) | Error::Io(_) | Error::Internal(_) => 9,
            Error::Unknown => 10,
        }
    }
}
