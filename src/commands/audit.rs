//! Audit command implementation

use crate::config::Settings;
use crate::models::AuditReport;
use crate::output::print_json;
use crate::runner::{AuditEvent, Auditor};
use crate::utils::progress::{create_spinner, print_fail, print_info, print_pass, print_warning};
use chrono::NaiveDate;

/// Run the audit command, printing progress unless `json` is set
pub async fn run_audit(
    domain: &str,
    date: NaiveDate,
    settings: &Settings,
    json: bool,
) -> anyhow::Result<AuditReport> {
    let auditor = Auditor::from_settings(settings)?;

    let spinner = create_spinner(&format!("Searching CT logs for {}...", domain));
    if json {
        spinner.finish_and_clear();
    }

    let on_event = |event: AuditEvent| {
        if json {
            return;
        }
        match event {
            AuditEvent::SearchStarted => {}
            AuditEvent::SearchFailed(message) => {
                spinner.finish_and_clear();
                print_warning(&format!("CT search failed: {}", message));
            }
            AuditEvent::SearchComplete { total, in_window } => {
                spinner.finish_and_clear();
                print_info(&format!(
                    "Found {} certificates in CT logs, {} valid on {}",
                    total, in_window, date
                ));
            }
            AuditEvent::Fetching { id } => {
                println!("fetching {}", id);
            }
            AuditEvent::FetchFailed { id, reason } => {
                print_fail(&format!("Skipped {}: {}", id, reason));
            }
            AuditEvent::VerdictReached {
                id,
                subject,
                verdict,
            } => {
                let line = format!("{} {}: {}", id, subject, verdict);
                if verdict.is_valid_at_date() {
                    print_pass(&line);
                } else if verdict.is_unknown() {
                    print_warning(&line);
                } else {
                    print_fail(&line);
                }
            }
            AuditEvent::Saved(path) => {
                println!("Saved certificate: {}", path.display());
            }
        }
    };

    let report = auditor.run(domain, date, &on_event).await?;
    spinner.finish_and_clear();

    if json {
        print_json(&report)?;
    } else {
        println!("{}", report.summary());
    }

    Ok(report)
}
