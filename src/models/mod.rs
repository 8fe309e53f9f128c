//! Data models for ct-audit
//!
//! This module contains all the data structures used throughout the application.

pub mod certificate;
pub mod report;

pub use certificate::{
    CertificateMetadata, CertificateRecord, IssuerCertificate, RevocationVerdict,
};
pub use report::{AuditReport, CertificateOutcome};
