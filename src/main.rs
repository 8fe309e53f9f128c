//! ct-audit - point-in-time Certificate Transparency audit
//!
//! Usage: ct-audit <DOMAIN> <YYYY-MM-DD>
//!
//! Finds every certificate valid for the domain on that date, drops the
//! ones revoked by then according to OCSP, and saves the rest as PEM files.

use clap::Parser;
use console::style;
use ct_audit::cli::Cli;
use ct_audit::{commands, config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Argument errors exit here, before any network activity
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = config::load_settings(cli.config.as_deref())?;
    cli.apply_overrides(&mut settings);

    commands::run_audit(&cli.domain, cli.date, &settings, cli.json).await?;
    Ok(())
}
