//! Replica truncate orchestration.
//!
//! Pipeline: validate → zone route → (remote: forward and return) →
//! hierarchy resolution → replica location → guard checks → physical
//! resize → catalog reconcile. Every stage can short-circuit with a
//! specific failure; there is no retry loop.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::StorageError;
use crate::hierarchy::{HierarchyResolver, ResolvedHierarchy, TargetConstraint};
use crate::locks::PathLocks;
use crate::object::ReplicaStatus;
use crate::outcome::TruncateReply;
use crate::request::{ClientUser, TruncateRequest, ValidatedRequest};
use crate::storage::PhysicalStorage;
use crate::wire::{self, WireResponse};
use crate::zone::{RemotePeer, ZoneLocality, ZoneRouter};
use crate::{Error, Result};

/// The truncate orchestration service.
///
/// All collaborators are injected as capability interfaces at construction;
/// the service itself holds no mutable global state. Requests are
/// request-scoped: nothing is cached across calls.
pub struct TruncateService {
    zone_router: Arc<dyn ZoneRouter>,
    remote_peer: Option<Arc<dyn RemotePeer>>,
    resolver: Arc<dyn HierarchyResolver>,
    catalog: Arc<dyn Catalog>,
    storage: Arc<dyn PhysicalStorage>,
    locks: PathLocks,
}

impl TruncateService {
    pub fn new(
        zone_router: Arc<dyn ZoneRouter>,
        resolver: Arc<dyn HierarchyResolver>,
        catalog: Arc<dyn Catalog>,
        storage: Arc<dyn PhysicalStorage>,
    ) -> Self {
        Self {
            zone_router,
            remote_peer: None,
            resolver,
            catalog,
            storage,
            locks: PathLocks::new(),
        }
    }

    /// Attach a peer used to forward requests for objects owned by remote
    /// zones. Without one, remote objects fail with a routing error.
    pub fn with_remote_peer(mut self, peer: Arc<dyn RemotePeer>) -> Self {
        self.remote_peer = Some(peer);
        self
    }

    /// Access to the catalog this service operates on.
    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Access to the physical storage this service operates on.
    pub fn storage(&self) -> &Arc<dyn PhysicalStorage> {
        &self.storage
    }

    /// Truncate a replica per `request`, on behalf of `caller`.
    pub async fn truncate(
        &self,
        caller: &ClientUser,
        request: &TruncateRequest,
    ) -> Result<TruncateReply> {
        let validated = request.validate(caller)?;

        match self.zone_router.route(&validated.path).await? {
            ZoneLocality::Local => {}
            ZoneLocality::Remote(zone) => {
                // The owning zone runs the whole pipeline; the original
                // request is forwarded verbatim and its result returned
                // unchanged.
                let peer = self.remote_peer.as_ref().ok_or_else(|| {
                    Error::RemoteRouting(format!(
                        "No peer connection available for zone [{}].",
                        zone
                    ))
                })?;
                info!("Forwarding truncate of [{}] to zone [{}]", validated.path, zone);
                return peer.forward(&zone, caller, request).await;
            }
        }

        // Serialize local truncates per logical path. Held through the
        // catalog commit.
        let _guard = self.locks.acquire(&validated.path).await;

        self.truncate_local(&validated).await
    }

    async fn truncate_local(&self, request: &ValidatedRequest) -> Result<TruncateReply> {
        let object = self.catalog.get_object(&request.path).await?;
        let hierarchy = self.resolve_hierarchy(&object, request).await?;

        let replica = object.replica_by_hierarchy(&hierarchy).ok_or_else(|| {
            Error::ReplicaNotFound(format!(
                "No replica of [{}] found under hierarchy [{}].",
                request.path, hierarchy
            ))
        })?;

        // An explicitly supplied hierarchy can disagree with the caller's
        // targeting options; that is a not-found condition, not an override.
        match &request.constraint {
            TargetConstraint::Resource(name) if hierarchy.root() != name => {
                return Err(Error::ReplicaNotFound(format!(
                    "Resolved hierarchy [{}] is not rooted at requested resource [{}].",
                    hierarchy, name
                )));
            }
            TargetConstraint::ReplicaNumber(number) if replica.number != *number => {
                return Err(Error::ReplicaNotFound(format!(
                    "Resolved replica {} of [{}] does not carry requested number [{}].",
                    replica.number, request.path, number
                )));
            }
            _ => {}
        }

        // Guard checks, first match wins.
        if object.locked || replica.status == ReplicaStatus::Intermediate {
            return Err(Error::LockedAccess(request.path.clone()));
        }

        if let Some(collection) = &object.special_collection {
            info!(
                "[{}] belongs to special collection [{}]; skipping truncate",
                request.path, collection
            );
            return Ok(TruncateReply::special_collection_skipped(
                &request.path,
                collection,
            ));
        }

        if replica.size == request.length {
            debug!(
                "Replica {} of [{}] already has size {}; nothing to do",
                replica.number, request.path, request.length
            );
            return Ok(TruncateReply::already_at_size(
                &request.path,
                replica.number,
                replica.size,
            ));
        }

        // Physical resize. A missing or unreadable physical object is
        // tolerated; the catalog is the source of truth.
        match self
            .storage
            .truncate(&replica.physical_path, request.length as u64)
            .await
        {
            Ok(()) => {}
            Err(Error::Storage(e @ (StorageError::NotFound(_) | StorageError::PermissionDenied(_)))) => {
                warn!(
                    "Tolerating physical truncate failure for replica {} of [{}]: {}",
                    replica.number, request.path, e
                );
            }
            Err(Error::Storage(e)) => return Err(Error::PhysicalTruncate(e.to_string())),
            Err(e) => return Err(e),
        }

        // Durable commit point. Failure past this line means the physical
        // size may be ahead of the catalog.
        self.catalog
            .reconcile_replica(&request.path, replica.number, request.length)
            .await
            .map_err(|e| match e {
                Error::CatalogUpdate(_) => e,
                other => Error::CatalogUpdate(other.to_string()),
            })?;

        info!(
            "Truncated replica {} of [{}] to {} bytes",
            replica.number, request.path, request.length
        );
        Ok(TruncateReply::truncated(
            &request.path,
            replica.number,
            request.length,
        ))
    }

    async fn resolve_hierarchy(
        &self,
        object: &crate::object::DataObject,
        request: &ValidatedRequest,
    ) -> Result<ResolvedHierarchy> {
        if let Some(hint) = &request.hierarchy_hint {
            // Audit trail: the hint skips voting and placement policy.
            warn!(
                "Hierarchy [{}] supplied explicitly for [{}]; policy-driven resolution bypassed",
                hint, request.path
            );
            return hint.parse();
        }

        self.resolver.resolve_write(object, &request.constraint).await
    }

    /// Outermost boundary adapter: parse a wire request, run the pipeline,
    /// and report the outcome as a status code plus a JSON body with the
    /// code embedded. Nothing escapes as a panic or raw error.
    pub async fn handle_wire(&self, caller: &ClientUser, input: &str) -> (i32, String) {
        let result = match wire::parse_request(input) {
            Ok(request) => self.truncate(caller, &request).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(reply) => {
                let code = reply.code();
                (code, WireResponse::with_code(code, reply.message).to_json())
            }
            Err(e) => {
                let code = e.code();
                (code, WireResponse::with_code(code, e.to_string()).to_json())
            }
        }
    }
}
