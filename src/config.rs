//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.attendtally.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::periods::MAX_PERIOD_START_DAY;
use crate::cli::OutputFormat;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".attendtally.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Where the dashboard lives and how to read it.
    #[serde(default)]
    pub source: SourceConfig,

    /// Weekly target and pay-period rules.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Write the report to this file instead of stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Dashboard source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Dashboard page fetched when no input is given.
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,

    /// Element id of the attendance grid.
    #[serde(default = "default_table_id")]
    pub table_id: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dashboard_url: default_dashboard_url(),
            table_id: default_table_id(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_dashboard_url() -> String {
    "http://hr.bubt.edu.bd/bubt/Dashboard.aspx".to_string()
}

fn default_table_id() -> String {
    crate::page::DEFAULT_TABLE_ID.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Aggregation rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Hours expected per week.
    #[serde(default = "default_weekly_target")]
    pub weekly_target_hours: u32,

    /// Day of the month a pay period starts (1-28).
    #[serde(default = "default_period_start_day")]
    pub period_start_day: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            weekly_target_hours: default_weekly_target(),
            period_start_day: default_period_start_day(),
        }
    }
}

fn default_weekly_target() -> u32 {
    35
}

fn default_period_start_day() -> u32 {
    26
}

/// Report generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Include the previous pay period in Markdown reports.
    #[serde(default)]
    pub show_previous_period: bool,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref table_id) = args.table_id {
            self.source.table_id = table_id.clone();
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }

        if let Some(target) = args.weekly_target {
            self.policy.weekly_target_hours = target;
        }
        if let Some(day) = args.period_start_day {
            self.policy.period_start_day = day;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if args.show_previous {
            self.report.show_previous_period = true;
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check that the merged settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.policy.weekly_target_hours == 0 {
            bail!("weekly_target_hours must be at least 1");
        }
        if !(1..=MAX_PERIOD_START_DAY).contains(&self.policy.period_start_day) {
            bail!(
                "period_start_day must be between 1 and {}, got {}",
                MAX_PERIOD_START_DAY,
                self.policy.period_start_day
            );
        }
        if self.source.timeout_seconds == 0 {
            bail!("timeout_seconds must be at least 1");
        }
        if self.source.table_id.trim().is_empty() {
            bail!("table_id must not be empty");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
