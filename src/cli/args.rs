//! CLI argument definitions using clap

use crate::config::Settings;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ct-audit")]
#[command(version)]
#[command(
    about = "Find the certificates that were valid and unrevoked for a domain on a given date",
    long_about = None
)]
#[command(after_help = "Example: ct-audit tee.teleport.best 2024-08-30")]
pub struct Cli {
    /// Domain to audit (used verbatim in the CT log query)
    #[arg(value_name = "DOMAIN")]
    pub domain: String,

    /// Audit date
    #[arg(value_name = "DATE", value_parser = parse_audit_date)]
    pub date: NaiveDate,

    /// Directory in which the {domain}_{date} results folder is created
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Settings file (defaults to config/default.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the audit report as JSON instead of progress lines
    #[arg(long)]
    pub json: bool,

    /// Fetch the issuer for every certificate even when shared
    #[arg(long)]
    pub no_issuer_cache: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(dir) = &self.output_dir {
            settings.output.directory = dir.clone();
        }
        if self.no_issuer_cache {
            settings.issuer.cache = false;
        }
    }

    /// Default tracing filter for this invocation
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

/// Parse a `YYYY-MM-DD` audit date
pub fn parse_audit_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("expected a date in YYYY-MM-DD format ({})", e))
}
