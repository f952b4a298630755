use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kindsearch")]
#[command(author, version, about = "Federated people + article search")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a config file (defaults to ./kindsearch.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default kindsearch.toml in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Start the HTTP search API
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one federated search and print the merged results
    Search {
        /// Search query
        query: String,

        /// Boost articles written by the person with this name
        #[arg(short, long)]
        username: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show metrics of a running search API
    Stats {
        /// Output in Prometheus format
        #[arg(long)]
        prometheus: bool,
    },
}
