//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::analysis::periods::MAX_PERIOD_START_DAY;
use crate::config::Config;
use crate::page::PageSource;

/// AttendTally - weekly and pay-period hours from the HR attendance dashboard
///
/// Reads the daily attendance grid from the HR portal's dashboard page and
/// reports hours worked this week, hours left to the weekly target, last
/// week, and the current and previous pay periods.
///
/// Examples:
///   attendtally --input Dashboard.html
///   attendtally --input Dashboard.html --now 2025-01-10T13:00 --format json
///   attendtally --url http://hr.bubt.edu.bd/bubt/Dashboard.aspx --cookie "ASP.NET_SessionId=..."
///   echo '{"action":"getAttendanceData"}' | attendtally --input Dashboard.html --message
///   attendtally --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Saved dashboard page to read (`-` for stdin)
    #[arg(short, long, value_name = "FILE", conflicts_with = "url")]
    pub input: Option<PathBuf>,

    /// Dashboard URL to fetch
    ///
    /// Defaults to the dashboard_url from the config file when neither
    /// --input nor --url is given.
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Session cookie sent when fetching the dashboard
    #[arg(long, env = "ATTENDTALLY_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Element id of the attendance table
    #[arg(long, value_name = "ID")]
    pub table_id: Option<String>,

    /// Reference time for "today" and in-progress days
    ///
    /// Accepts YYYY-MM-DD, YYYY-MM-DDTHH:MM or YYYY-MM-DDTHH:MM:SS.
    /// Defaults to the local clock.
    #[arg(long, value_name = "TIME", value_parser = parse_reference_time)]
    pub now: Option<NaiveDateTime>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Weekly target in hours
    #[arg(long, value_name = "HOURS")]
    pub weekly_target: Option<u32>,

    /// Day of the month a pay period starts (1-28)
    #[arg(long, value_name = "DAY")]
    pub period_start_day: Option<u32>,

    /// Include the previous pay period in the Markdown report
    #[arg(long)]
    pub show_previous: bool,

    /// Answer one JSON request read from stdin with a JSON response
    ///
    /// The only request understood is {"action":"getAttendanceData"}.
    #[arg(long)]
    pub message: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .attendtally.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Generate a default .attendtally.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Dashboard URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(ref input) = self.input {
            if self.reads_page_from_stdin() {
                if self.message {
                    return Err(
                        "--message reads the request from stdin; pass the page with a file path"
                            .to_string(),
                    );
                }
            } else if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        if self.weekly_target == Some(0) {
            return Err("Weekly target must be at least 1 hour".to_string());
        }

        if let Some(day) = self.period_start_day {
            if !(1..=MAX_PERIOD_START_DAY).contains(&day) {
                return Err(format!(
                    "Period start day must be between 1 and {}",
                    MAX_PERIOD_START_DAY
                ));
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the config file's `verbose` setting; `--quiet`
    /// overrides it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The reference moment: `--now` if given, else the local clock.
    pub fn reference_time(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Where to read the dashboard from.
    pub fn page_source(&self, config: &Config) -> PageSource {
        match (&self.input, &self.url) {
            (Some(_), _) if self.reads_page_from_stdin() => PageSource::Stdin,
            (Some(path), _) => PageSource::File(path.clone()),
            (None, Some(url)) => PageSource::Url(url.clone()),
            (None, None) => PageSource::Url(config.source.dashboard_url.clone()),
        }
    }

    fn reads_page_from_stdin(&self) -> bool {
        self.input.as_deref().is_some_and(|p| p.as_os_str() == "-")
    }
}

/// Parse a `--now` value.
fn parse_reference_time(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    let s = s.trim();
    for format in FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(time);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| format!("Invalid time '{}': expected YYYY-MM-DD[THH:MM[:SS]]", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: None,
            url: None,
            cookie: None,
            table_id: None,
            now: None,
            format: None,
            output: None,
            weekly_target: None,
            period_start_day: None,
            show_previous: false,
            message: false,
            config: None,
            verbose: false,
            quiet: false,
            timeout: None,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.url = Some("hr.example.com/Dashboard.aspx".to_string());
        assert!(args.validate().is_err());

        args.url = Some("https://hr.example.com/Dashboard.aspx".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_input_file() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("/no/such/Dashboard.html"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_message_with_stdin_page() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("-"));
        assert!(args.validate().is_ok());

        args.message = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_policy_values() {
        let mut args = make_args();
        args.period_start_day = Some(29);
        assert!(args.validate().is_err());

        args.period_start_day = Some(28);
        assert!(args.validate().is_ok());

        args.weekly_target = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_from_config_verbose() {
        let mut args = make_args();
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_parse_reference_time() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        assert_eq!(parse_reference_time("2025-01-10T09:30"), Ok(expected));
        assert_eq!(parse_reference_time("2025-01-10T09:30:00"), Ok(expected));
        assert_eq!(parse_reference_time("2025-01-10 09:30"), Ok(expected));
        assert_eq!(
            parse_reference_time("2025-01-10"),
            Ok(expected.date().and_time(NaiveTime::MIN))
        );
        assert!(parse_reference_time("10/01/2025").is_err());
    }

    #[test]
    fn test_reference_time_prefers_flag() {
        let mut args = make_args();
        let frozen = NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        args.now = Some(frozen);

        assert_eq!(args.reference_time(), frozen);
    }

    #[test]
    fn test_page_source() {
        let config = Config::default();
        let mut args = make_args();
        assert_eq!(
            args.page_source(&config),
            PageSource::Url(config.source.dashboard_url.clone())
        );

        args.url = Some("https://hr.example.com/Dashboard.aspx".to_string());
        assert_eq!(
            args.page_source(&config),
            PageSource::Url("https://hr.example.com/Dashboard.aspx".to_string())
        );

        args.url = None;
        args.input = Some(PathBuf::from("-"));
        assert_eq!(args.page_source(&config), PageSource::Stdin);

        args.input = Some(PathBuf::from("Dashboard.html"));
        assert_eq!(
            args.page_source(&config),
            PageSource::File(PathBuf::from("Dashboard.html"))
        );
    }
}
