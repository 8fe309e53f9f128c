//! Audit orchestration engine
//!
//! Drives CT search → date filter → body fetch → OCSP check → result store
//! and reports progress through events so any frontend can render it.
//! Certificates are processed one at a time; each stage returns new values
//! instead of mutating shared state.

use crate::checks::{filter_valid_on, IssuerResolver, OcspChecker};
use crate::config::Settings;
use crate::ct::CtLogClient;
use crate::models::{
    AuditReport, CertificateMetadata, CertificateOutcome, RevocationVerdict,
};
use crate::report::ResultStore;
use crate::utils::Result;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;

/// Events emitted during an audit run
#[derive(Debug, Clone)]
pub enum AuditEvent {
    SearchStarted,
    SearchFailed(String),
    SearchComplete {
        total: usize,
        in_window: usize,
    },
    Fetching {
        id: i64,
    },
    FetchFailed {
        id: i64,
        reason: String,
    },
    VerdictReached {
        id: i64,
        subject: String,
        verdict: RevocationVerdict,
    },
    Saved(PathBuf),
}

/// Runs audits against a CT aggregator, OCSP responders and a result store
pub struct Auditor {
    ct: CtLogClient,
    ocsp: OcspChecker,
    store: ResultStore,
}

impl Auditor {
    pub fn new(ct: CtLogClient, ocsp: OcspChecker, store: ResultStore) -> Self {
        Self { ct, ocsp, store }
    }

    /// Wire up every stage from settings, sharing one HTTP client
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.http.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let issuers = IssuerResolver::new(client.clone(), settings.issuer.cache);
        Ok(Self::new(
            CtLogClient::new(client.clone(), &settings.ct),
            OcspChecker::new(client, issuers),
            ResultStore::new(&settings.output.directory),
        ))
    }

    /// Audit `domain` as of `date` and persist the accepted certificates
    ///
    /// Per-certificate failures never abort the run; only a failure to
    /// write the result store is returned as an error.
    pub async fn run(
        &self,
        domain: &str,
        date: NaiveDate,
        on_event: &dyn Fn(AuditEvent),
    ) -> Result<AuditReport> {
        on_event(AuditEvent::SearchStarted);
        let candidates = match self.ct.fetch_candidates(domain).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("CT search for {} failed: {}", domain, e);
                on_event(AuditEvent::SearchFailed(e.to_string()));
                Vec::new()
            }
        };

        let total_candidates = candidates.len();
        let in_window = filter_valid_on(candidates, date);
        on_event(AuditEvent::SearchComplete {
            total: total_candidates,
            in_window: in_window.len(),
        });
        let in_window_count = in_window.len();

        let outcomes: Vec<CertificateOutcome> = stream::iter(in_window)
            .then(move |metadata| self.audit_certificate(metadata, date, on_event))
            .collect()
            .await;

        let mut report = AuditReport {
            domain: domain.to_string(),
            date,
            total_candidates,
            in_window: in_window_count,
            outcomes,
            saved: Vec::new(),
        };

        let saved = self.store.save(domain, date, &report.accepted())?;
        for path in &saved {
            on_event(AuditEvent::Saved(path.clone()));
        }
        report.saved = saved;

        Ok(report)
    }

    /// Fetch and check a single in-window certificate
    async fn audit_certificate(
        &self,
        metadata: CertificateMetadata,
        date: NaiveDate,
        on_event: &dyn Fn(AuditEvent),
    ) -> CertificateOutcome {
        on_event(AuditEvent::Fetching { id: metadata.id });

        let record = match self.ct.fetch_body(&metadata).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping certificate {}: {}", metadata.id, e);
                on_event(AuditEvent::FetchFailed {
                    id: metadata.id,
                    reason: e.to_string(),
                });
                return CertificateOutcome::Skipped {
                    metadata,
                    reason: e.to_string(),
                };
            }
        };

        let verdict = self.ocsp.check_revocation(&record, date).await;
        on_event(AuditEvent::VerdictReached {
            id: record.id,
            subject: record.subject.clone(),
            verdict: verdict.clone(),
        });

        if verdict.is_valid_at_date() {
            CertificateOutcome::Accepted { record, verdict }
        } else {
            CertificateOutcome::Rejected { record, verdict }
        }
    }
}
