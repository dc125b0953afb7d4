//! Starter script for the Cafe Scraper platform.
//!
//! Shows the usual shape of a script: read the run input, fetch through the
//! platform's SOCKS5 egress proxy, then declare the output table and push
//! rows. Copy it and replace the fetch and the rows with real scraping.

pub mod config;
pub mod fetch;
pub mod proxy;
pub mod run;

pub use config::ScriptConfig;
pub use proxy::ProxySettings;
pub use run::{run, Article, RunOptions, RunSummary};
