//! Backend health check command

use std::path::Path;

use anyhow::Result;
use glimpse_core::VisionBackend;

use super::{build_client, load_settings, settings_path};

/// Check that the configured vision backend is reachable
pub async fn cmd_check(settings_file: Option<&Path>, backend: Option<&str>) -> Result<()> {
    let settings = load_settings(&settings_path(settings_file)?)?;
    let client = build_client(&settings, backend)?;

    println!("🔍 Checking vision backend...\n");
    println!("  Host:  {}", client.host());
    println!("  Model: {}\n", client.model());

    print!("Checking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach {}", client.host());
        println!("\nCheck that:");
        println!("  1. The API key or host environment variable is set");
        println!("  2. The model name exists for this backend");
        println!("  3. The network allows outbound HTTPS");
    }

    Ok(())
}
