//! `kindsearch search`: one-shot federated search from the command line.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::gateway::ElasticsearchGateway;
use crate::search::{FederatedSearch, SearchFilter, SearchResult};
use crate::Config;

/// Run the search command
///
/// # Arguments
///
/// * `config` - Loaded configuration
/// * `query` - The search query
/// * `username` - Optional display name whose articles get boosted
/// * `json` - Print the raw JSON result list instead of a summary
pub async fn run(config: &Config, query: &str, username: Option<String>, json: bool) -> Result<()> {
    let gateway = ElasticsearchGateway::new(&config.gateway)
        .context("Failed to create Elasticsearch client")?;
    let search = FederatedSearch::from_gateway(Arc::new(gateway), config);

    let filter = SearchFilter::new(query).with_boost_name(username);
    let timeout = Duration::from_millis(config.search.timeout_ms);

    let results = search
        .search_with_timeout(&filter, timeout)
        .await
        .with_context(|| format!("Search for \"{}\" failed", query))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results found for: {}", query);
        return Ok(());
    }

    println!("Found {} results for: \"{}\"\n", results.len(), query);
    for (i, result) in results.iter().enumerate() {
        println!("{}", format_result(i + 1, result));
    }

    Ok(())
}

fn format_result(position: usize, result: &SearchResult) -> String {
    format!(
        "{}. [{}] {} (score: {:.3}, id: {})\n   {}\n",
        position,
        result.kind,
        result.title,
        result.score,
        result.id,
        format_preview(&result.content, 160)
    )
}

/// Collapse whitespace and cut the content to at most `max_chars` characters.
fn format_preview(content: &str, max_chars: usize) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(max_chars).collect();
    format!("{}...", cut)
}
