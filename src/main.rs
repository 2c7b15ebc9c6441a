//! AttendTally - working-hour totals from an HR attendance dashboard
//!
//! A CLI tool that reads the daily attendance grid from the HR portal's
//! dashboard page and reports weekly and pay-period hours.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, unreadable page, HTTP failure, bad config)
//!   2 - The request was answered with an error (no table, no working days)

mod analysis;
mod cli;
mod config;
mod error;
mod message;
mod models;
mod page;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use message::RequestContext;
use models::AggregationResult;
use page::{FetchOptions, PageSource};
use report::ReportContext;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration first so its verbosity setting reaches the logger
    let (config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("AttendTally v{}", env!("CARGO_PKG_VERSION"));
    origin.log();

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .attendtally.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the dashboard URL, weekly target, and pay-period start day.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout carries only the report.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the whole pipeline. Returns the exit code (0 or 2).
async fn run(args: Args, mut config: Config) -> Result<i32> {
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    // Step 1: Get the page
    let source = args.page_source(&config);
    if let PageSource::Url(ref url) = source {
        if !page::is_dashboard_url(url, &config.source.dashboard_url) {
            warn!(
                "{} is not the configured dashboard ({}); the attendance table may be missing",
                url, config.source.dashboard_url
            );
        }
    }

    let fetch_options = FetchOptions {
        cookie: args.cookie.clone(),
        timeout_seconds: config.source.timeout_seconds,
        show_progress: !args.quiet && !args.message,
    };
    debug!("Page source: {:?}, {:?}", source, fetch_options);

    let page = page::load_page(&source, &fetch_options).await?;

    // Step 2: Answer the request
    let now = args.reference_time();
    let ctx = RequestContext {
        page: &page,
        table_id: &config.source.table_id,
        now,
        policy: (&config.policy).into(),
    };
    info!("Reference time: {}", now.format("%Y-%m-%d %H:%M:%S"));

    if args.message {
        return handle_message(&ctx).await;
    }

    let outcome = ctx.attendance_summary();
    let exit_code = if outcome.is_ok() { 0 } else { 2 };

    // Step 3: Render and write the report
    let output = match config.report.format {
        OutputFormat::Json => {
            let result = match outcome {
                Ok(ref summary) => AggregationResult::from(summary),
                Err(ref err) => AggregationResult::from(err.clone()),
            };
            report::generate_json_report(&result)?
        }
        OutputFormat::Markdown => {
            let report_ctx = ReportContext {
                generated_at: now,
                weekly_target_hours: config.policy.weekly_target_hours,
                show_previous_period: config.report.show_previous_period,
            };
            report::generate_markdown_report(&outcome, &report_ctx)
        }
    };

    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path))?;
            info!("Report saved to: {}", path);
        }
        None => println!("{}", output),
    }

    if let Err(err) = outcome {
        warn!("{}", err);
    }

    Ok(exit_code)
}

/// Handle --message: answer one JSON request from stdin on stdout.
async fn handle_message(ctx: &RequestContext<'_>) -> Result<i32> {
    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .context("Failed to read request from stdin")?;

    let response = message::respond(&raw, ctx);
    if let Some(data) = response.data() {
        debug!(
            "Answered with {}h this week, {}h this period",
            data.weekly_hours, data.monthly_hours
        );
    }
    println!("{}", serde_json::to_string(&response)?);

    Ok(if response.is_success() { 0 } else { 2 })
}

/// Where the configuration was loaded from.
///
/// Loading happens before logging is set up, so this is reported afterwards.
enum ConfigOrigin {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    DefaultFileUnreadable(anyhow::Error),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigOrigin::Builtin => debug!("No config file found, using defaults"),
            ConfigOrigin::DefaultFileUnreadable(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Builtin)),
        Err(e) => Ok((Config::default(), ConfigOrigin::DefaultFileUnreadable(e))),
    }
}
