//! Datagrid Core Library
//!
//! This crate provides the core replica truncate orchestration for a
//! zone-partitioned data catalog: given a logical path, it locates the
//! correct physical replica, resizes its physical storage, and reconciles
//! the catalog metadata with the new size, honoring locking, remote-zone
//! redirection, and privilege constraints.

pub mod catalog;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod locks;
pub mod object;
pub mod outcome;
pub mod request;
pub mod storage;
pub mod truncate;
pub mod wire;
pub mod zone;

pub use catalog::{create_catalog, Catalog, CatalogConfig, JsonFileCatalog, MemoryCatalog};
pub use config::{build_service, ServiceConfig, UserConfig, ZoneConfig};
pub use error::{Error, Result, StorageError};
pub use hierarchy::{HierarchyResolver, ResolvedHierarchy, TargetConstraint, VoteResolver};
pub use object::{DataObject, Replica, ReplicaStatus};
pub use outcome::{TruncateOutcome, TruncateReply};
pub use request::{ClientUser, TruncateRequest, ValidatedRequest};
pub use storage::{
    create_storage, FilesystemStorage, MemoryStorage, PhysicalStorage, StorageConfig,
};
pub use truncate::TruncateService;
pub use wire::{parse_request, WireResponse, WIRE_VERSION};
pub use zone::{RemotePeer, StaticZoneRouter, ZoneLocality, ZoneRouter};
