//! Validity window filtering
//!
//! Dates are compared at calendar-day granularity with no timezone handling.

use crate::models::CertificateMetadata;
use chrono::NaiveDate;

/// Whether `date` falls inside the certificate's validity interval (inclusive)
pub fn is_valid_on(metadata: &CertificateMetadata, date: NaiveDate) -> bool {
    metadata.not_before <= date && date <= metadata.not_after
}

/// Keep only the candidates valid on `date`, preserving order
pub fn filter_valid_on(candidates: Vec<CertificateMetadata>, date: NaiveDate) -> Vec<CertificateMetadata> {
    candidates
        .into_iter()
        .filter(|metadata| is_valid_on(metadata, date))
        .collect()
}
