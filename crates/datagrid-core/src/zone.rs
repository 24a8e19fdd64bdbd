//! Zone routing.
//!
//! The first component of a logical path names the zone that owns the
//! object. Objects owned by a remote zone are not touched locally; the
//! original request is forwarded verbatim to a peer in that zone and the
//! peer's result is returned unchanged.

use async_trait::async_trait;

use crate::outcome::TruncateReply;
use crate::request::{ClientUser, TruncateRequest};
use crate::{Error, Result};

/// Where a logical path's authoritative zone lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneLocality {
    /// The object belongs to this server's zone.
    Local,
    /// The object belongs to the named remote zone.
    Remote(String),
}

/// Trait for zone-membership decisions.
#[async_trait]
pub trait ZoneRouter: Send + Sync {
    /// Decide whether `logical_path` is owned locally or by a remote zone.
    /// Failure here is a routing error, never retried.
    async fn route(&self, logical_path: &str) -> Result<ZoneLocality>;
}

/// Trait for forwarding a request to a remote zone peer.
#[async_trait]
pub trait RemotePeer: Send + Sync {
    /// Forward the original request to a peer in `zone` and return the
    /// peer's result unchanged.
    async fn forward(
        &self,
        zone: &str,
        caller: &ClientUser,
        request: &TruncateRequest,
    ) -> Result<TruncateReply>;
}

/// Router backed by a static zone-membership table.
#[derive(Debug, Clone)]
pub struct StaticZoneRouter {
    local_zone: String,
    remote_zones: Vec<String>,
}

impl StaticZoneRouter {
    pub fn new(local_zone: impl Into<String>, remote_zones: Vec<String>) -> Self {
        Self {
            local_zone: local_zone.into(),
            remote_zones,
        }
    }

    /// Zone component of an absolute logical path.
    fn zone_of(logical_path: &str) -> Option<&str> {
        logical_path
            .strip_prefix('/')
            .and_then(|rest| rest.split('/').next())
            .filter(|zone| !zone.is_empty())
    }
}

#[async_trait]
impl ZoneRouter for StaticZoneRouter {
    async fn route(&self, logical_path: &str) -> Result<ZoneLocality> {
        let zone = Self::zone_of(logical_path).ok_or_else(|| {
            Error::RemoteRouting(format!(
                "Could not determine zone for path [{}].",
                logical_path
            ))
        })?;

        if zone == self.local_zone {
            Ok(ZoneLocality::Local)
        } else if self.remote_zones.iter().any(|z| z == zone) {
            Ok(ZoneLocality::Remote(zone.to_string()))
        } else {
            Err(Error::RemoteRouting(format!(
                "Zone [{}] for path [{}] is not a known zone.",
                zone, logical_path
            )))
        }
    }
}
