//! Stats command: read the metrics of a running search API.

use anyhow::{bail, Context, Result};
use std::time::Duration;

use crate::Config;

/// Run the stats command
///
/// Fetches `/metrics` from the API configured in `[server]`.
///
/// # Arguments
/// * `prometheus` - If true, print the raw Prometheus exposition text
pub async fn run(config: &Config, prometheus: bool) -> Result<()> {
    let url = metrics_url(config);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.gateway.timeout_secs))
        .build()?;

    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to reach {} (is 'kindsearch serve' running?)", url))?;

    if !response.status().is_success() {
        bail!("{} returned {}", url, response.status());
    }

    let body = response.text().await?;

    if prometheus {
        print!("{}", body);
        return Ok(());
    }

    println!("kindsearch metrics ({})", url);
    println!("==========================\n");
    for line in summarize(&body) {
        println!("  {}", line);
    }

    Ok(())
}

fn metrics_url(config: &Config) -> String {
    let host = match config.server.host.as_str() {
        "0.0.0.0" | "::" => "127.0.0.1",
        host => host,
    };
    format!("http://{}:{}/metrics", host, config.server.port)
}

/// Sample lines for this service's metrics, without comments or histogram buckets.
fn summarize(body: &str) -> Vec<&str> {
    body.lines()
        .filter(|line| line.starts_with("kindsearch_"))
        .filter(|line| !line.contains("_bucket{"))
        .collect()
}
