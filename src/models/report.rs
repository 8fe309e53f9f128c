//! Audit report models

use super::certificate::{CertificateMetadata, CertificateRecord, RevocationVerdict};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

/// What happened to a single in-window certificate
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CertificateOutcome {
    /// Valid at the audit date and kept for the result store
    Accepted {
        #[serde(flatten)]
        record: CertificateRecord,
        verdict: RevocationVerdict,
    },
    /// Body fetched, but revoked before the date or status unknown
    Rejected {
        #[serde(flatten)]
        record: CertificateRecord,
        verdict: RevocationVerdict,
    },
    /// Body could not be fetched or decoded
    Skipped {
        #[serde(flatten)]
        metadata: CertificateMetadata,
        reason: String,
    },
}

impl CertificateOutcome {
    pub fn accepted(&self) -> Option<&CertificateRecord> {
        match self {
            CertificateOutcome::Accepted { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// Result of a complete audit run
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub domain: String,
    pub date: NaiveDate,
    /// Entries returned by the aggregator
    pub total_candidates: usize,
    /// Entries whose validity interval contains the date
    pub in_window: usize,
    pub outcomes: Vec<CertificateOutcome>,
    pub saved: Vec<PathBuf>,
}

impl AuditReport {
    /// Accepted certificates in the order they were processed
    pub fn accepted(&self) -> Vec<&CertificateRecord> {
        self.outcomes.iter().filter_map(|o| o.accepted()).collect()
    }

    /// Final summary line
    pub fn summary(&self) -> String {
        format!(
            "Found and saved {} active certificates for {} on {}",
            self.saved.len(),
            self.domain,
            self.date.format("%Y-%m-%d")
        )
    }
}
