//! The script body: read input, fetch through the proxy, publish results.
//!
//! Failing to read input, configure the proxy, fetch, or push a row ends the
//! run early with an error logged to the platform. Failing to write a log
//! line never does.

use crate::config::ScriptConfig;
use crate::fetch::{build_http_client, fetch_text};
use crate::proxy::{redacted, ProxySettings};
use anyhow::{anyhow, Result};
use cafe_sdk::{CafeClient, CallContext, LogLevel, PlatformTransport, TableHeaderItem};
use serde::Serialize;
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Knobs for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub target_url: String,
    pub http_timeout: Duration,
    pub proxy: ProxySettings,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            target_url: ScriptConfig::TARGET_URL.to_string(),
            http_timeout: ScriptConfig::HTTP_TIMEOUT,
            proxy: ProxySettings::disabled(),
        }
    }
}

impl RunOptions {
    /// Defaults with proxy credentials from the environment.
    pub fn from_env() -> Self {
        Self {
            proxy: ProxySettings::from_env(),
            ..Self::default()
        }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub content: String,
}

/// Columns matching [`Article`].
pub fn article_header() -> Vec<TableHeaderItem> {
    vec![
        TableHeaderItem::text("Title", "title"),
        TableHeaderItem::text("Content", "content"),
    ]
}

/// Placeholder rows; a real script derives these from what it fetched.
pub fn sample_articles() -> Vec<Article> {
    (1..=2)
        .map(|n| Article {
            title: format!("Sample title {}", n),
            content: format!("Sample content {}", n),
        })
        .collect()
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub status: u16,
    pub ip: String,
    pub rows_pushed: usize,
}

/// Sends each message to the platform log and mirrors it locally.
struct Reporter<'a, T: PlatformTransport> {
    client: &'a CafeClient<T>,
    ctx: &'a CallContext,
}

impl<'a, T: PlatformTransport> Reporter<'a, T> {
    async fn emit(&self, level: LogLevel, text: String) {
        match level {
            LogLevel::Debug => debug!("{}", text),
            LogLevel::Info => info!("{}", text),
            LogLevel::Warn => warn!("{}", text),
            LogLevel::Error => error!("{}", text),
        }
        if let Err(err) = self.client.log().emit(self.ctx, level, text).await {
            warn!("Platform log unavailable: {}", err);
        }
    }

    async fn debug(&self, text: impl Into<String>) {
        self.emit(LogLevel::Debug, text.into()).await
    }

    async fn info(&self, text: impl Into<String>) {
        self.emit(LogLevel::Info, text.into()).await
    }

    /// Log `what` with its cause at error level and build the run error.
    async fn fail(&self, what: &str, cause: impl Display) -> anyhow::Error {
        let message = format!("{}: {}", what, cause);
        self.emit(LogLevel::Error, message.clone()).await;
        anyhow!(message)
    }
}

/// Execute the script once.
pub async fn run<T: PlatformTransport>(
    client: &CafeClient<T>,
    ctx: &CallContext,
    options: &RunOptions,
) -> Result<RunSummary> {
    let report = Reporter { client, ctx };
    report.info("Script started").await;

    // 1. Input
    let input = match client.parameter().get_input_json(ctx).await {
        Ok(input) => input,
        Err(err) => return Err(report.fail("Failed to fetch input parameters", err).await),
    };
    report.debug(format!("Input parameters: {}", input)).await;

    // 2. Proxy
    let proxy_url = match options.proxy.url() {
        Ok(url) => url,
        Err(err) => return Err(report.fail("Invalid proxy settings", format!("{:#}", err)).await),
    };
    match &proxy_url {
        Some(url) => report.info(format!("Proxy: {}", redacted(url))).await,
        None => report.info("Proxy: none, connecting directly").await,
    }

    // 3. Fetch
    let http = match build_http_client(proxy_url.as_ref(), options.http_timeout) {
        Ok(http) => http,
        Err(err) => return Err(report.fail("Failed to build HTTP client", format!("{:#}", err)).await),
    };
    report.info(format!("Requesting {}", options.target_url)).await;
    let outcome = match fetch_text(&http, ctx, &options.target_url).await {
        Ok(outcome) => outcome,
        Err(err) => return Err(report.fail("Request failed", format!("{:#}", err)).await),
    };
    report.info(format!("Response status: {}", outcome.status)).await;
    let ip = outcome.body.trim().to_string();
    report.info(format!("Current IP address: {}", ip)).await;

    // 4. Results
    if let Err(err) = client.result().set_table_header(ctx, &article_header()).await {
        return Err(report.fail("Failed to set table header", err).await);
    }
    let mut rows_pushed = 0;
    for article in sample_articles() {
        match client.result().push_record(ctx, &article).await {
            Ok(res) => {
                debug!("PushData response: {:?}", res);
                rows_pushed += 1;
            }
            Err(err) => return Err(report.fail("Failed to push data", err).await),
        }
    }

    report.info("Script finished").await;
    Ok(RunSummary {
        status: outcome.status,
        ip,
        rows_pushed,
    })
}
