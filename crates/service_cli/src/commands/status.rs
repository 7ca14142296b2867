//! goAML bridge status command

use crate::config::ClientConfig;
use crate::Result;

/// Run the goaml-status command
pub async fn run(config: &ClientConfig, actor: &str) -> Result<()> {
    let pipeline = super::connect(config, actor, false).await?;
    let status = pipeline.goaml_status().await?;

    println!(
        "goAML bridge: {}",
        if status.connected { "connected" } else { "disconnected" }
    );
    if let Some(last_sync) = status.last_sync {
        println!("Last sync: {}", last_sync.to_rfc3339());
    }
    if let Some(message) = &status.message {
        println!("Message: {}", message);
    }
    println!("Sync available: {}", if status.can_sync() { "yes" } else { "no" });
    Ok(())
}
