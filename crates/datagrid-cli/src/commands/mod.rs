pub mod describe;
pub mod truncate;

use anyhow::{Context, Result};
use datagrid_core::{build_service, ClientUser, ServiceConfig, TruncateService};

/// Load the service configuration and build the service and caller identity.
pub async fn load_service(config_path: &str) -> Result<(TruncateService, ClientUser)> {
    let config_content = tokio::fs::read_to_string(config_path)
        .await
        .with_context(|| format!("Could not read configuration file [{}]", config_path))?;
    let config: ServiceConfig = serde_yaml::from_str(&config_content)
        .with_context(|| format!("Could not parse configuration file [{}]", config_path))?;

    let caller = config.client_user();
    let service = build_service(&config).await?;
    Ok((service, caller))
}

/// Make a logical path absolute. Relative paths are anchored at the
/// caller's home collection.
pub fn canonical(logical_path: &str, caller: &ClientUser) -> Result<String> {
    if logical_path.is_empty() {
        anyhow::bail!("Missing LOGICAL_PATH");
    }

    if logical_path.starts_with('/') {
        return Ok(logical_path.to_string());
    }

    Ok(format!(
        "/{}/home/{}/{}",
        caller.zone, caller.name, logical_path
    ))
}
