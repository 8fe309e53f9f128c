//! Certificate data models

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Certificate metadata as reported by the CT aggregator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateMetadata {
    /// Log-assigned identifier
    pub id: i64,
    pub not_before: NaiveDate,
    pub not_after: NaiveDate,
    pub common_name: Option<String>,
    pub issuer_name: Option<String>,
    pub serial_number: Option<String>,
}

/// A certificate whose body has been downloaded and decoded
#[derive(Debug, Clone, Serialize)]
pub struct CertificateRecord {
    pub id: i64,
    pub not_before: NaiveDate,
    pub not_after: NaiveDate,
    /// Subject distinguished name from the decoded certificate
    pub subject: String,
    /// PEM text exactly as served by the aggregator
    pub pem: String,
    /// DER bytes decoded from `pem`
    #[serde(skip)]
    pub der: Vec<u8>,
}

/// Issuing CA certificate fetched through the AIA CA-Issuers URL
#[derive(Debug, Clone)]
pub struct IssuerCertificate {
    pub url: String,
    pub subject: String,
    pub der: Vec<u8>,
}

/// Point-in-time revocation conclusion for a certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum RevocationVerdict {
    /// Responder reports the certificate as good
    Good,
    /// Revoked on or before the audit date
    RevokedBeforeDate {
        revoked_on: NaiveDate,
        reason: Option<String>,
    },
    /// Revoked, but only after the audit date
    RevokedAfterOrOnDate {
        revoked_on: NaiveDate,
        reason: Option<String>,
    },
    /// Status could not be determined
    Unknown { reason: String },
}

impl RevocationVerdict {
    /// Whether the certificate counts as valid on the audit date
    pub fn is_valid_at_date(&self) -> bool {
        matches!(
            self,
            RevocationVerdict::Good | RevocationVerdict::RevokedAfterOrOnDate { .. }
        )
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, RevocationVerdict::Unknown { .. })
    }
}

impl fmt::Display for RevocationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevocationVerdict::Good => write!(f, "Good"),
            RevocationVerdict::RevokedBeforeDate { revoked_on, reason } => match reason {
                Some(r) => write!(f, "Revoked on {} ({})", revoked_on, r),
                None => write!(f, "Revoked on {}", revoked_on),
            },
            RevocationVerdict::RevokedAfterOrOnDate { revoked_on, reason } => match reason {
                Some(r) => write!(f, "Revoked later, on {} ({})", revoked_on, r),
                None => write!(f, "Revoked later, on {}", revoked_on),
            },
            RevocationVerdict::Unknown { reason } => write!(f, "Unknown ({})", reason),
        }
    }
}
