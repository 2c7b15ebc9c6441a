//! Page loading.
//!
//! This module reads the dashboard markup from a saved file, from stdin, or
//! from the live portal over HTTP.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{COOKIE, USER_AGENT};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Where the dashboard markup comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    /// A saved copy of the page.
    File(PathBuf),
    /// Markup piped on stdin.
    Stdin,
    /// The live dashboard.
    Url(String),
}

/// Options for fetching the live dashboard.
#[derive(Clone)]
pub struct FetchOptions {
    /// Session cookie header value, e.g. `ASP.NET_SessionId=...`.
    pub cookie: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether to show a spinner while waiting.
    pub show_progress: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            cookie: None,
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

impl std::fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOptions")
            .field("cookie", &self.cookie.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("show_progress", &self.show_progress)
            .finish()
    }
}

/// Load the page markup from `source`.
pub async fn load_page(source: &PageSource, options: &FetchOptions) -> Result<String> {
    let page = match source {
        PageSource::File(path) => {
            info!("Reading page from: {}", path.display());
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read page file: {}", path.display()))?
        }
        PageSource::Stdin => {
            info!("Reading page from stdin");
            let mut page = String::new();
            tokio::io::stdin()
                .read_to_string(&mut page)
                .await
                .context("Failed to read page from stdin")?;
            page
        }
        PageSource::Url(url) => fetch_page(url, options).await?,
    };

    debug!("Loaded {} bytes of markup", page.len());
    Ok(page)
}

/// Whether `url` points at the configured dashboard page.
pub fn is_dashboard_url(url: &str, dashboard_url: &str) -> bool {
    url.starts_with(dashboard_url)
}

async fn fetch_page(url: &str, options: &FetchOptions) -> Result<String> {
    info!("Fetching dashboard: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(options.timeout_seconds))
        .build()
        .context("Failed to create HTTP client")?;

    let mut request = client.get(url).header(
        USER_AGENT,
        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
    );
    if let Some(ref cookie) = options.cookie {
        request = request.header(COOKIE, cookie);
    }

    let spinner = options.show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Fetching {}", url));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = async {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to connect to {}", url))?
            .error_for_status()
            .with_context(|| format!("Dashboard request failed: {}", url))?;

        response
            .text()
            .await
            .context("Failed to read dashboard response body")
    }
    .await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    result
}
