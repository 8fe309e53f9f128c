//! Authority Information Access lookups

use crate::utils::RevocationError;
use x509_parser::prelude::*;

/// Access methods carried in the AIA extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMethod {
    /// id-ad-ocsp, 1.3.6.1.5.5.7.48.1
    Ocsp,
    /// id-ad-caIssuers, 1.3.6.1.5.5.7.48.2
    CaIssuers,
}

impl AccessMethod {
    pub fn oid(&self) -> &'static str {
        match self {
            AccessMethod::Ocsp => "1.3.6.1.5.5.7.48.1",
            AccessMethod::CaIssuers => "1.3.6.1.5.5.7.48.2",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AccessMethod::Ocsp => "OCSP access descriptor",
            AccessMethod::CaIssuers => "CA Issuers access descriptor",
        }
    }
}

/// Find the first URI in the AIA extension for the given access method
pub fn access_location(cert: &X509Certificate, method: AccessMethod) -> Result<String, RevocationError> {
    let ext = cert
        .extensions()
        .iter()
        .find(|ext| ext.oid == x509_parser::oid_registry::OID_PKIX_AUTHORITY_INFO_ACCESS)
        .ok_or_else(|| RevocationError::ExtensionMissing {
            extension: "Authority Information Access".to_string(),
        })?;

    let aia = match ext.parsed_extension() {
        ParsedExtension::AuthorityInfoAccess(aia) => aia,
        _ => {
            return Err(RevocationError::Parse {
                message: "Malformed Authority Information Access extension".to_string(),
            })
        }
    };

    aia.accessdescs
        .iter()
        .filter(|desc| desc.access_method.to_id_string() == method.oid())
        .find_map(|desc| match &desc.access_location {
            GeneralName::URI(uri) => Some(uri.to_string()),
            _ => None,
        })
        .ok_or_else(|| RevocationError::ExtensionMissing {
            extension: method.name().to_string(),
        })
}
