use anyhow::{bail, Result};
use std::env;
use tracing::info;

use crate::Config;

pub async fn run(force: bool) -> Result<()> {
    let root = env::current_dir()?;
    let path = Config::config_path(&root);

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::default().save(&root)?;

    info!("Wrote default configuration to {:?}", path);
    println!("✓ Created {} with default configuration", path.display());
    println!("\nNext steps:");
    println!("  1. Point [gateway].url at your Elasticsearch cluster (or set ELASTICSEARCH_URL)");
    println!("  2. Run 'kindsearch serve' to start the search API");

    Ok(())
}
