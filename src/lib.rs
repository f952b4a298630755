pub mod cli;
pub mod commands;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod metrics;
pub mod search;
pub mod web;

pub use config::Config;
