//! Service configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{create_catalog, CatalogConfig};
use crate::hierarchy::VoteResolver;
use crate::request::ClientUser;
use crate::storage::{create_storage, StorageConfig};
use crate::truncate::TruncateService;
use crate::zone::StaticZoneRouter;
use crate::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Zone membership.
    pub zone: ZoneConfig,

    /// Catalog backend.
    pub catalog: CatalogConfig,

    /// Physical storage backend.
    pub storage: StorageConfig,

    /// The user requests run as.
    pub user: UserConfig,
}

/// Zone membership configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Name of the local zone.
    pub local: String,

    /// Known remote zones. Objects in these zones need a peer connection.
    #[serde(default)]
    pub remote: Vec<String>,
}

/// Identity configuration for the requesting user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// User name.
    pub name: String,

    /// Zone the user belongs to. Defaults to the local zone.
    #[serde(default)]
    pub zone: Option<String>,

    /// Whether the user holds administrative privilege.
    #[serde(default)]
    pub privileged: bool,
}

impl ServiceConfig {
    /// Validate configuration consistency.
    pub fn validate(&self) -> Result<()> {
        if self.zone.local.is_empty() {
            return Err(Error::Config("Local zone name is empty".to_string()));
        }

        if self.zone.remote.iter().any(|z| z == &self.zone.local) {
            return Err(Error::Config(format!(
                "Local zone [{}] also listed as a remote zone",
                self.zone.local
            )));
        }

        if self.user.name.is_empty() {
            return Err(Error::Config("User name is empty".to_string()));
        }

        Ok(())
    }

    /// The caller identity this configuration describes.
    pub fn client_user(&self) -> ClientUser {
        ClientUser {
            name: self.user.name.clone(),
            zone: self
                .user
                .zone
                .clone()
                .unwrap_or_else(|| self.zone.local.clone()),
            privileged: self.user.privileged,
        }
    }
}

/// Build a [`TruncateService`] from configuration, with the standard
/// write-intent resolver and a static zone router.
pub async fn build_service(config: &ServiceConfig) -> Result<TruncateService> {
    config.validate()?;

    let catalog = create_catalog(&config.catalog).await?;
    let storage = create_storage(&config.storage)?;
    let zone_router = Arc::new(StaticZoneRouter::new(
        config.zone.local.clone(),
        config.zone.remote.clone(),
    ));

    Ok(TruncateService::new(
        zone_router,
        Arc::new(VoteResolver::new()),
        catalog,
        storage,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServiceConfig {
        ServiceConfig {
            zone: ZoneConfig {
                local: "tempZone".to_string(),
                remote: vec!["otherZone".to_string()],
            },
            catalog: CatalogConfig::Memory,
            storage: StorageConfig::Memory,
            user: UserConfig {
                name: "alice".to_string(),
                zone: None,
                privileged: false,
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_local_zone_cannot_be_remote() {
        let mut cfg = config();
        cfg.zone.remote.push("tempZone".to_string());
        assert!(matches!(cfg.validate().unwrap_err(), Error::Config(_)));
    }

    #[test]
    fn test_client_user_defaults_to_local_zone() {
        let user = config().client_user();
        assert_eq!(user.zone, "tempZone");
        assert_eq!(user.qualified_name(), "alice#tempZone");
    }

    #[tokio::test]
    async fn test_build_service_from_memory_config() {
        let service = build_service(&config()).await.unwrap();
        // Nothing registered yet; any path misses.
        let err = service.catalog().get_object("/tempZone/x").await.unwrap_err();
        assert!(matches!(err, Error::ReplicaNotFound(_)));
    }
}
