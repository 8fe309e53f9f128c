//! PEM export functionality
//!
//! Encodes DER certificates as PEM text.

use base64::Engine;

/// PEM exporter for certificates
pub struct PemExporter;

impl PemExporter {
    /// Export a single DER certificate to PEM format
    pub fn export_certificate(der: &[u8]) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(der);
        let mut pem = String::with_capacity(b64.len() + b64.len() / 64 + 64);
        pem.push_str("-----BEGIN CERTIFICATE-----\n");

        for chunk in b64.as_bytes().chunks(64) {
            pem.push_str(std::str::from_utf8(chunk).unwrap_or(""));
            pem.push('\n');
        }

        pem.push_str("-----END CERTIFICATE-----\n");
        pem
    }
}
