//! OCSP revocation checking
//!
//! Builds a SHA-1 CertID request for a (leaf, issuer) pair, posts it to the
//! responder named in the leaf's AIA extension, and turns the responder's
//! answer into a verdict for a specific audit date.
//!
//! The response signature is NOT verified. Only the reported status and
//! revocation time are read, so a forged response would be accepted.

use super::aia::{access_location, AccessMethod};
use super::issuer::IssuerResolver;
use crate::models::{CertificateRecord, RevocationVerdict};
use crate::utils::RevocationError;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use sha1::{Digest, Sha1};
use x509_parser::der_parser::asn1_rs::Class;
use x509_parser::der_parser::ber::{BerObject, BerObjectContent};
use x509_parser::prelude::*;

/// id-pkix-ocsp-basic
const OCSP_BASIC_RESPONSE_OID: &str = "1.3.6.1.5.5.7.48.1.1";

/// SHA-1 AlgorithmIdentifier: SEQUENCE { OID 1.3.14.3.2.26, NULL }
const SHA1_ALGORITHM_ID: [u8; 11] = [
    0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00,
];

const TAG_INTEGER: u8 = 0x02;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_GENERALIZED_TIME: u8 = 0x18;
const TAG_SEQUENCE: u8 = 0x30;

/// OCSP response status (RFC 6960 Section 4.2.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcspResponseStatus {
    Successful,
    MalformedRequest,
    InternalError,
    TryLater,
    SigRequired,
    Unauthorized,
}

impl OcspResponseStatus {
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            0 => Some(Self::Successful),
            1 => Some(Self::MalformedRequest),
            2 => Some(Self::InternalError),
            3 => Some(Self::TryLater),
            5 => Some(Self::SigRequired),
            6 => Some(Self::Unauthorized),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Successful => "successful",
            Self::MalformedRequest => "malformedRequest",
            Self::InternalError => "internalError",
            Self::TryLater => "tryLater",
            Self::SigRequired => "sigRequired",
            Self::Unauthorized => "unauthorized",
        }
    }
}

/// Certificate status as reported by the responder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertStatus {
    Good,
    Revoked {
        revocation_time: NaiveDateTime,
        reason: Option<String>,
    },
    Unknown,
}

/// OCSP checker for point-in-time revocation status
pub struct OcspChecker {
    client: reqwest::Client,
    issuers: IssuerResolver,
}

impl OcspChecker {
    pub fn new(client: reqwest::Client, issuers: IssuerResolver) -> Self {
        Self { client, issuers }
    }

    /// Determine the revocation verdict for `record` as of `date`
    ///
    /// Never fails: any error along the way becomes `RevocationVerdict::Unknown`.
    pub async fn check_revocation(&self, record: &CertificateRecord, date: NaiveDate) -> RevocationVerdict {
        match self.try_check_revocation(record, date).await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!("Revocation status unknown for {}: {}", record.subject, e);
                RevocationVerdict::Unknown {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Determine the revocation verdict, reporting why it could not be
    pub async fn try_check_revocation(
        &self,
        record: &CertificateRecord,
        date: NaiveDate,
    ) -> Result<RevocationVerdict, RevocationError> {
        let (_, cert) = X509Certificate::from_der(&record.der).map_err(|e| RevocationError::Parse {
            message: format!("Failed to parse certificate: {:?}", e),
        })?;

        let responder_url = access_location(&cert, AccessMethod::Ocsp)?;
        let issuer = self.issuers.resolve_issuer(&cert).await?;
        tracing::debug!(
            "Certificate {} issued by {} (from {})",
            record.id,
            issuer.subject,
            issuer.url
        );

        let (_, issuer_cert) =
            X509Certificate::from_der(&issuer.der).map_err(|e| RevocationError::Parse {
                message: format!("Failed to parse issuer certificate: {:?}", e),
            })?;

        let request = build_request(&cert, &issuer_cert);
        let body = self.query_responder(&responder_url, request).await?;
        let status = parse_response(&body, cert.tbs_certificate.raw_serial())?;

        Ok(derive_verdict(status, date))
    }

    async fn query_responder(&self, responder_url: &str, request: Vec<u8>) -> Result<Vec<u8>, RevocationError> {
        tracing::debug!("Querying OCSP responder: {}", responder_url);

        let response = self
            .client
            .post(responder_url)
            .header(CONTENT_TYPE, "application/ocsp-request")
            .header(ACCEPT, "application/ocsp-response")
            .body(request)
            .send()
            .await
            .map_err(|e| RevocationError::Fetch {
                url: responder_url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RevocationError::Fetch {
                url: responder_url.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let body = response.bytes().await.map_err(|e| RevocationError::Fetch {
            url: responder_url.to_string(),
            message: e.to_string(),
        })?;

        Ok(body.to_vec())
    }
}

/// Turn a responder status into a verdict for the audit date
///
/// Only the calendar date of the revocation time is compared.
pub fn derive_verdict(status: CertStatus, date: NaiveDate) -> RevocationVerdict {
    match status {
        CertStatus::Good => RevocationVerdict::Good,
        CertStatus::Revoked {
            revocation_time,
            reason,
        } => {
            let revoked_on = revocation_time.date();
            if date < revoked_on {
                RevocationVerdict::RevokedAfterOrOnDate { revoked_on, reason }
            } else {
                RevocationVerdict::RevokedBeforeDate { revoked_on, reason }
            }
        }
        CertStatus::Unknown => RevocationVerdict::Unknown {
            reason: "Responder reported unknown status".to_string(),
        },
    }
}

/// Build a DER-encoded OCSP request for `cert` issued by `issuer`
///
/// ```text
/// OCSPRequest ::= SEQUENCE { tbsRequest TBSRequest }
/// TBSRequest  ::= SEQUENCE { requestList SEQUENCE OF Request }
/// Request     ::= SEQUENCE { reqCert CertID }
/// CertID      ::= SEQUENCE {
///     hashAlgorithm  AlgorithmIdentifier,  -- SHA-1
///     issuerNameHash OCTET STRING,
///     issuerKeyHash  OCTET STRING,
///     serialNumber   CertificateSerialNumber }
/// ```
pub fn build_request(cert: &X509Certificate, issuer: &X509Certificate) -> Vec<u8> {
    let issuer_name_hash = Sha1::digest(cert.issuer().as_raw());
    // BIT STRING content of the issuer's subjectPublicKey, without tag/length
    let issuer_key_hash = Sha1::digest(&*issuer.public_key().subject_public_key.data);

    let mut cert_id = Vec::new();
    cert_id.extend_from_slice(&SHA1_ALGORITHM_ID);
    cert_id.extend(der_tlv(TAG_OCTET_STRING, &issuer_name_hash));
    cert_id.extend(der_tlv(TAG_OCTET_STRING, &issuer_key_hash));
    cert_id.extend(der_tlv(TAG_INTEGER, cert.tbs_certificate.raw_serial()));

    let cert_id = der_tlv(TAG_SEQUENCE, &cert_id);
    let request = der_tlv(TAG_SEQUENCE, &cert_id);
    let request_list = der_tlv(TAG_SEQUENCE, &request);
    // version is DEFAULT v1 and omitted
    let tbs_request = der_tlv(TAG_SEQUENCE, &request_list);
    der_tlv(TAG_SEQUENCE, &tbs_request)
}

/// Parse an OCSP response and return the status for the certificate with `serial`
///
/// ```text
/// OCSPResponse ::= SEQUENCE {
///     responseStatus ENUMERATED,
///     responseBytes  [0] EXPLICIT ResponseBytes OPTIONAL }
/// ResponseBytes ::= SEQUENCE { responseType OID, response OCTET STRING }
/// BasicOCSPResponse ::= SEQUENCE { tbsResponseData ResponseData, ... }
/// ResponseData ::= SEQUENCE {
///     version [0] EXPLICIT Version DEFAULT v1,
///     responderID ResponderID,
///     producedAt GeneralizedTime,
///     responses SEQUENCE OF SingleResponse, ... }
/// ```
pub fn parse_response(response_bytes: &[u8], serial: &[u8]) -> Result<CertStatus, RevocationError> {
    let (_, outer) = parse_der(response_bytes)?;
    let outer_seq = as_sequence(&outer, "OCSPResponse")?;

    let status_value = match outer_seq.first().map(|obj| &obj.content) {
        Some(BerObjectContent::Enum(value)) => *value,
        _ => return Err(protocol_error("Invalid responseStatus")),
    };

    match OcspResponseStatus::from_u64(status_value) {
        Some(OcspResponseStatus::Successful) => {}
        Some(status) => {
            return Err(protocol_error(&format!(
                "OCSP responder returned: {}",
                status.as_str()
            )))
        }
        None => {
            return Err(protocol_error(&format!(
                "Unrecognised responseStatus: {}",
                status_value
            )))
        }
    }

    let wrapper = outer_seq
        .get(1)
        .ok_or_else(|| protocol_error("No responseBytes in successful OCSP response"))?;
    let wrapper_content = wrapper
        .as_slice()
        .map_err(|_| protocol_error("Failed to read responseBytes wrapper"))?;

    let (_, resp_bytes_obj) = parse_der(wrapper_content)?;
    let resp_bytes = as_sequence(&resp_bytes_obj, "ResponseBytes")?;

    let response_type = resp_bytes
        .first()
        .and_then(|obj| obj.as_oid().ok())
        .map(|oid| oid.to_id_string())
        .ok_or_else(|| protocol_error("ResponseBytes missing responseType"))?;
    if response_type != OCSP_BASIC_RESPONSE_OID {
        return Err(protocol_error(&format!(
            "Unsupported response type: {}",
            response_type
        )));
    }

    let basic_bytes = resp_bytes
        .get(1)
        .and_then(|obj| obj.as_slice().ok())
        .ok_or_else(|| protocol_error("Failed to read BasicOCSPResponse bytes"))?;

    let (_, basic_obj) = parse_der(basic_bytes)?;
    let basic_seq = as_sequence(&basic_obj, "BasicOCSPResponse")?;
    let response_data = basic_seq
        .first()
        .ok_or_else(|| protocol_error("Empty BasicOCSPResponse"))
        .and_then(|obj| as_sequence(obj, "ResponseData"))?;

    // Everything before `responses` is either context-tagged or a time, so
    // the first SEQUENCE is the list of SingleResponses.
    let responses = response_data
        .iter()
        .find_map(|item| item.as_sequence().ok())
        .ok_or_else(|| protocol_error("ResponseData has no responses"))?;

    let single = select_single_response(responses, serial)?;
    let cert_status = single
        .get(1)
        .ok_or_else(|| protocol_error("SingleResponse missing certStatus"))?;

    parse_cert_status(cert_status)
}

/// Pick the SingleResponse for `serial`, falling back to a lone response
fn select_single_response<'a, 'b>(
    responses: &'a [BerObject<'b>],
    serial: &[u8],
) -> Result<&'a [BerObject<'b>], RevocationError> {
    let wanted = trim_leading_zeros(serial);

    let singles: Vec<&[BerObject]> = responses
        .iter()
        .filter_map(|obj| obj.as_sequence().ok())
        .map(|seq| seq.as_slice())
        .filter(|seq| seq.len() >= 2)
        .collect();

    let matching = singles.iter().copied().find(|single| {
        single
            .first()
            .and_then(|cert_id| cert_id.as_sequence().ok())
            .and_then(|cert_id| cert_id.last())
            .map(|last| match last.content {
                BerObjectContent::Integer(bytes) => trim_leading_zeros(bytes) == wanted,
                _ => false,
            })
            .unwrap_or(false)
    });

    match (matching, singles.as_slice()) {
        (Some(single), _) => Ok(single),
        (None, [only]) => {
            tracing::debug!("OCSP serial mismatch; using the only SingleResponse");
            Ok(*only)
        }
        (None, _) => Err(protocol_error(
            "Could not find matching SingleResponse in OCSP response",
        )),
    }
}

/// Parse a CertStatus CHOICE
///
/// ```text
/// CertStatus ::= CHOICE {
///     good    [0] IMPLICIT NULL,
///     revoked [1] IMPLICIT RevokedInfo,
///     unknown [2] IMPLICIT UnknownInfo }
/// ```
fn parse_cert_status(cert_status: &BerObject) -> Result<CertStatus, RevocationError> {
    if cert_status.header.class() != Class::ContextSpecific {
        return Err(protocol_error(&format!(
            "CertStatus is not context-tagged: {:?}",
            cert_status.header.class()
        )));
    }
    match cert_status.header.tag().0 {
        0 => Ok(CertStatus::Good),
        1 => {
            let content = cert_status
                .as_slice()
                .map_err(|_| protocol_error("Failed to read RevokedInfo"))?;
            parse_revoked_info(content)
        }
        2 => Ok(CertStatus::Unknown),
        tag => Err(protocol_error(&format!("Unexpected CertStatus tag: {}", tag))),
    }
}

/// Parse the content of an IMPLICIT RevokedInfo
///
/// ```text
/// RevokedInfo ::= SEQUENCE {
///     revocationTime   GeneralizedTime,
///     revocationReason [0] EXPLICIT CRLReason OPTIONAL }
/// ```
fn parse_revoked_info(content: &[u8]) -> Result<CertStatus, RevocationError> {
    let (time_bytes, rest) = match content {
        [TAG_GENERALIZED_TIME, len, rest @ ..] if (*len as usize) <= rest.len() && *len < 0x80 => {
            rest.split_at(*len as usize)
        }
        _ => return Err(protocol_error("RevokedInfo missing revocationTime")),
    };

    let revocation_time = parse_generalized_time(time_bytes)?;

    // [0] EXPLICIT { ENUMERATED reason }
    let reason = match rest {
        [0xa0, 0x03, 0x0a, 0x01, code, ..] => Some(crl_reason_name(*code)),
        _ => None,
    };

    Ok(CertStatus::Revoked {
        revocation_time,
        reason,
    })
}

/// Parse a GeneralizedTime such as `20240110123000Z` or `20240110123000.5Z`
fn parse_generalized_time(bytes: &[u8]) -> Result<NaiveDateTime, RevocationError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| protocol_error("revocationTime is not ASCII"))?;
    let digits = text
        .get(..14)
        .ok_or_else(|| protocol_error(&format!("revocationTime too short: {}", text)))?;

    NaiveDateTime::parse_from_str(digits, "%Y%m%d%H%M%S")
        .map_err(|e| protocol_error(&format!("Invalid revocationTime {}: {}", text, e)))
}

/// RFC 5280 CRLReason names
fn crl_reason_name(code: u8) -> String {
    match code {
        0 => "unspecified",
        1 => "keyCompromise",
        2 => "cACompromise",
        3 => "affiliationChanged",
        4 => "superseded",
        5 => "cessationOfOperation",
        6 => "certificateHold",
        8 => "removeFromCRL",
        9 => "privilegeWithdrawn",
        10 => "aACompromise",
        other => return format!("reason {}", other),
    }
    .to_string()
}

fn protocol_error(message: &str) -> RevocationError {
    RevocationError::Protocol {
        message: message.to_string(),
    }
}

fn as_sequence<'a, 'b>(obj: &'a BerObject<'b>, what: &str) -> Result<&'a Vec<BerObject<'b>>, RevocationError> {
    obj.as_sequence()
        .map_err(|_| protocol_error(&format!("{} is not a SEQUENCE", what)))
}

fn parse_der(bytes: &[u8]) -> Result<(&[u8], BerObject<'_>), RevocationError> {
    x509_parser::der_parser::parse_der(bytes)
        .map_err(|e| protocol_error(&format!("Failed to decode DER: {:?}", e)))
}

/// Encode a DER length
fn der_encode_length(buf: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        buf.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let significant = trim_leading_zeros(&bytes);
    buf.push(0x80 | significant.len() as u8);
    buf.extend_from_slice(significant);
}

/// Wrap content in a DER tag-length-value
fn der_tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(content.len() + 4);
    result.push(tag);
    der_encode_length(&mut result, content.len());
    result.extend_from_slice(content);
    result
}

/// Trim leading zero bytes from a byte slice (for serial number comparison)
fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let pos = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[pos..]
}
