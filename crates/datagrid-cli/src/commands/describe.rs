use anyhow::Result;

use super::{canonical, load_service};

pub async fn run(config_path: &str, logical_path: &str, format: &str) -> Result<()> {
    let (service, caller) = load_service(config_path).await?;
    let path = canonical(logical_path, &caller)?;

    let object = service
        .catalog()
        .get_object(&path)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&object)?),
        _ => {
            println!("Logical path: {}", object.logical_path);
            if object.locked {
                println!("Locked: yes");
            }
            if let Some(collection) = &object.special_collection {
                println!("Special collection: {}", collection);
            }
            println!("Replicas:");
            for replica in &object.replicas {
                println!(
                    "  - {} [{}] {} bytes ({:?}) at {}",
                    replica.number,
                    replica.hierarchy,
                    replica.size,
                    replica.status,
                    replica.physical_path
                );
            }
        }
    }

    Ok(())
}
