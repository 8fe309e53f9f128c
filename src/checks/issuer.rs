//! Issuer certificate resolution
//!
//! Follows the CA-Issuers URL in a leaf's AIA extension and decodes the
//! DER certificate served there. Issuers are cached per URL for the
//! lifetime of the resolver.

use super::aia::{access_location, AccessMethod};
use crate::models::IssuerCertificate;
use crate::utils::RevocationError;
use std::collections::HashMap;
use tokio::sync::RwLock;
use x509_parser::prelude::*;

/// Resolves the issuing CA for leaf certificates
pub struct IssuerResolver {
    client: reqwest::Client,
    cache: Option<RwLock<HashMap<String, IssuerCertificate>>>,
}

impl IssuerResolver {
    /// Create a resolver; `cache` enables per-URL reuse of fetched issuers
    pub fn new(client: reqwest::Client, cache: bool) -> Self {
        Self {
            client,
            cache: cache.then(|| RwLock::new(HashMap::new())),
        }
    }

    /// Fetch the issuer referenced by the leaf's CA-Issuers descriptor
    pub async fn resolve_issuer(
        &self,
        cert: &X509Certificate<'_>,
    ) -> Result<IssuerCertificate, RevocationError> {
        let url = access_location(cert, AccessMethod::CaIssuers)?;

        if let Some(cache) = &self.cache {
            if let Some(issuer) = cache.read().await.get(&url) {
                tracing::debug!("Issuer cache hit: {}", url);
                return Ok(issuer.clone());
            }
        }

        let issuer = self.fetch_issuer(&url).await?;

        if let Some(cache) = &self.cache {
            cache.write().await.insert(url, issuer.clone());
        }

        Ok(issuer)
    }

    async fn fetch_issuer(&self, url: &str) -> Result<IssuerCertificate, RevocationError> {
        tracing::debug!("Fetching issuer certificate: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RevocationError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RevocationError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let body = response.bytes().await.map_err(|e| RevocationError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        decode_issuer(url, &body)
    }
}

/// Decode a DER issuer certificate served from `url`
pub fn decode_issuer(url: &str, der: &[u8]) -> Result<IssuerCertificate, RevocationError> {
    let (_, cert) = X509Certificate::from_der(der).map_err(|e| RevocationError::Parse {
        message: format!("Failed to parse issuer certificate from {}: {:?}", url, e),
    })?;

    Ok(IssuerCertificate {
        url: url.to_string(),
        subject: cert.subject().to_string(),
        der: der.to_vec(),
    })
}
