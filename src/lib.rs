//! ct-audit Library
//!
//! Point-in-time Certificate Transparency audit:
//! - Searches the crt.sh aggregator for certificates issued to a domain
//! - Keeps those whose validity window contains the audit date
//! - Resolves each issuer through AIA and asks the OCSP responder whether
//!   the certificate had been revoked by that date
//! - Saves the surviving certificates as PEM files
//!
//! OCSP response signatures are not verified; verdicts are an audit aid,
//! not a trust decision.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ct_audit::{Auditor, Settings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let auditor = Auditor::from_settings(&Settings::default()).unwrap();
//!     let date = chrono::NaiveDate::from_ymd_opt(2024, 8, 30).unwrap();
//!     let report = auditor.run("example.com", date, &|_| {}).await.unwrap();
//!     println!("{}", report.summary());
//! }
//! ```

pub mod checks;
pub mod cli;
pub mod commands;
pub mod config;
pub mod ct;
pub mod models;
pub mod output;
pub mod report;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Settings;
pub use models::{AuditReport, CertificateOutcome, RevocationVerdict};
pub use runner::{AuditEvent, Auditor};
pub use utils::{AuditError, Result};
