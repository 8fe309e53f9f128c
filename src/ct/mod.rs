//! Certificate Transparency log integration
//!
//! Queries the crt.sh aggregator for certificates matching a domain and
//! downloads individual certificate bodies by their log identifier.

use crate::config::CtSettings;
use crate::models::{CertificateMetadata, CertificateRecord};
use crate::utils::CtError;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use x509_parser::prelude::*;

/// Response entry from the crt.sh JSON API
#[derive(Debug, Deserialize)]
struct CrtShEntry {
    id: i64,
    issuer_name: Option<String>,
    common_name: Option<String>,
    not_before: Option<String>,
    not_after: Option<String>,
    serial_number: Option<String>,
}

/// Client for the CT aggregator
pub struct CtLogClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl CtLogClient {
    pub fn new(client: reqwest::Client, settings: &CtSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            user_agent: settings.user_agent.clone(),
        }
    }

    /// Search the aggregator for every certificate matching `domain`
    ///
    /// The domain is used verbatim. A non-success status yields an empty
    /// list rather than an error.
    pub async fn fetch_candidates(&self, domain: &str) -> Result<Vec<CertificateMetadata>, CtError> {
        let url = format!("{}/?match==&q={}&output=json", self.base_url, domain);
        tracing::debug!("Searching CT logs: {}", url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| CtError::Fetch {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            tracing::warn!("CT log query failed with status: {}", response.status());
            return Ok(Vec::new());
        }

        let text = response.text().await.map_err(|e| CtError::Fetch {
            url: url.clone(),
            message: e.to_string(),
        })?;

        parse_search_response(&text)
    }

    /// Download and decode the PEM body for a single certificate
    pub async fn fetch_body(&self, metadata: &CertificateMetadata) -> Result<CertificateRecord, CtError> {
        let url = format!("{}/?d={}", self.base_url, metadata.id);
        tracing::debug!("Fetching certificate body: {}", url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| CtError::Fetch {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(CtError::Fetch {
                url,
                message: format!("HTTP {}", response.status()),
            });
        }

        let pem_text = response.text().await.map_err(|e| CtError::Fetch {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let (der, subject) = decode_pem_certificate(&pem_text)?;

        Ok(CertificateRecord {
            id: metadata.id,
            not_before: metadata.not_before,
            not_after: metadata.not_after,
            subject,
            pem: pem_text,
            der,
        })
    }
}

/// Parse the aggregator's JSON search response
///
/// Entries with missing or unparsable validity dates are dropped.
pub fn parse_search_response(text: &str) -> Result<Vec<CertificateMetadata>, CtError> {
    if text.trim().is_empty() || text.trim() == "[]" {
        return Ok(Vec::new());
    }

    let entries: Vec<CrtShEntry> = serde_json::from_str(text).map_err(|e| CtError::Parse {
        message: format!("Failed to parse CT log response: {}", e),
    })?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| match convert_crt_entry(entry) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::warn!("Skipping CT entry: {}", e);
                None
            }
        })
        .collect())
}

fn convert_crt_entry(entry: CrtShEntry) -> Result<CertificateMetadata, CtError> {
    let date_field = |value: Option<&str>, field: &str| -> Result<NaiveDate, CtError> {
        let value = value.ok_or_else(|| CtError::Parse {
            message: format!("entry {} has no {}", entry.id, field),
        })?;
        parse_ct_date(value).ok_or_else(|| CtError::Parse {
            message: format!("entry {} has invalid {}: {}", entry.id, field, value),
        })
    };

    let not_before = date_field(entry.not_before.as_deref(), "not_before")?;
    let not_after = date_field(entry.not_after.as_deref(), "not_after")?;

    Ok(CertificateMetadata {
        id: entry.id,
        not_before,
        not_after,
        common_name: entry.common_name,
        issuer_name: entry.issuer_name,
        serial_number: entry.serial_number,
    })
}

/// Parse an aggregator timestamp, keeping only the calendar date
pub fn parse_ct_date(s: &str) -> Option<NaiveDate> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Decode a PEM certificate into DER bytes and its subject name
pub fn decode_pem_certificate(text: &str) -> Result<(Vec<u8>, String), CtError> {
    let block = ::pem::parse(text.trim()).map_err(|e| CtError::Parse {
        message: format!("Invalid PEM: {}", e),
    })?;

    if block.tag() != "CERTIFICATE" {
        return Err(CtError::Parse {
            message: format!("Unexpected PEM label: {}", block.tag()),
        });
    }

    let der = block.into_contents();
    let subject = {
        let (_, cert) = X509Certificate::from_der(&der).map_err(|e| CtError::Parse {
            message: format!("Failed to parse certificate: {:?}", e),
        })?;
        cert.subject().to_string()
    };

    Ok((der, subject))
}
