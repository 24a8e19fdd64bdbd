use anyhow::Result;
use datagrid_core::TruncateRequest;
use tracing::debug;

use super::{canonical, load_service};

pub async fn run(
    config_path: &str,
    logical_path: &str,
    size: i64,
    resource: Option<&str>,
    replica_number: Option<i32>,
    admin_mode: bool,
) -> Result<()> {
    let (service, caller) = load_service(config_path).await?;
    let path = canonical(logical_path, &caller)?;

    let request = TruncateRequest {
        path,
        length: size,
        target_resource: resource.map(str::to_string),
        replica_number,
        resource_hierarchy: None,
        admin_mode,
    };

    debug!("Sending truncate request: {:?}", request);

    let reply = service
        .truncate(&caller, &request)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", reply.message);
    Ok(())
}
