//! Shared fixtures: a throwaway CA, leaves carrying AIA URLs and canned
//! OCSP responses.

#![allow(dead_code)]

use ct_audit::checks::ocsp::build_request;
use mockito::Matcher;
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, CustomExtension, DnType, IsCa, KeyPair,
    SerialNumber,
};
use x509_parser::prelude::{FromDer, X509Certificate};

const OID_AUTHORITY_INFO_ACCESS: &[u64] = &[1, 3, 6, 1, 5, 5, 7, 1, 1];

pub fn der_tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let bytes: Vec<u8> = len
            .to_be_bytes()
            .iter()
            .copied()
            .skip_while(|&b| b == 0)
            .collect();
        out.push(0x80 | bytes.len() as u8);
        out.extend(bytes);
    }
    out.extend_from_slice(content);
    out
}

fn access_description(method_last_arc: u8, url: &str) -> Vec<u8> {
    // id-ad-ocsp (..48.1) or id-ad-caIssuers (..48.2)
    let mut content = vec![
        0x06,
        0x08,
        0x2b,
        0x06,
        0x01,
        0x05,
        0x05,
        0x07,
        0x30,
        method_last_arc,
    ];
    // uniformResourceIdentifier [6] IA5String
    content.extend(der_tlv(0x86, url.as_bytes()));
    der_tlv(0x30, &content)
}

/// DER value of an AuthorityInfoAccess extension
pub fn aia_extension(ocsp: Option<&str>, ca_issuers: Option<&str>) -> Vec<u8> {
    let mut descriptions = Vec::new();
    if let Some(url) = ocsp {
        descriptions.extend(access_description(0x01, url));
    }
    if let Some(url) = ca_issuers {
        descriptions.extend(access_description(0x02, url));
    }
    der_tlv(0x30, &descriptions)
}

pub struct TestCa {
    pub cert: Certificate,
    pub key: KeyPair,
}

pub struct TestLeaf {
    pub pem: String,
    pub der: Vec<u8>,
    pub serial: Vec<u8>,
}

impl TestCa {
    pub fn new() -> Self {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
        params
            .distinguished_name
            .push(DnType::CommonName, "ct-audit Test Issuing CA");
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        let cert = params.self_signed(&key).unwrap();
        Self { cert, key }
    }

    pub fn der(&self) -> Vec<u8> {
        self.cert.der().to_vec()
    }

    /// Issue a leaf for `domain`; `serial` must not have its high bit set
    pub fn issue(&self, domain: &str, serial: &[u8], aia: Option<Vec<u8>>) -> TestLeaf {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(vec![domain.to_string()]).unwrap();
        params.distinguished_name.push(DnType::CommonName, domain);
        params.serial_number = Some(SerialNumber::from(serial.to_vec()));
        if let Some(aia) = aia {
            params
                .custom_extensions
                .push(CustomExtension::from_oid_content(OID_AUTHORITY_INFO_ACCESS, aia));
        }
        let cert = params.signed_by(&key, &self.cert, &self.key).unwrap();
        TestLeaf {
            pem: cert.pem(),
            der: cert.der().to_vec(),
            serial: serial.to_vec(),
        }
    }

    /// Body matcher for the exact OCSP request expected for `leaf`
    pub fn ocsp_request(&self, leaf: &TestLeaf) -> Matcher {
        let (_, cert) = X509Certificate::from_der(&leaf.der).unwrap();
        let (_, issuer) = X509Certificate::from_der(self.cert.der()).unwrap();
        Matcher::from(build_request(&cert, &issuer))
    }
}

fn single_response(serial: &[u8], cert_status: &[u8]) -> Vec<u8> {
    // CertID with SHA-1; hash values are not checked by the client
    let mut cert_id = vec![
        0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00,
    ];
    cert_id.extend(der_tlv(0x04, &[0x11; 20]));
    cert_id.extend(der_tlv(0x04, &[0x22; 20]));
    cert_id.extend(der_tlv(0x02, serial));

    let mut single = der_tlv(0x30, &cert_id);
    single.extend_from_slice(cert_status);
    single.extend(der_tlv(0x18, b"20240601000000Z"));
    der_tlv(0x30, &single)
}

fn successful_response(single: Vec<u8>) -> Vec<u8> {
    let mut response_data = der_tlv(0xa2, &der_tlv(0x04, &[0x33; 20]));
    response_data.extend(der_tlv(0x18, b"20240601000000Z"));
    response_data.extend(der_tlv(0x30, &single));

    let mut basic = der_tlv(0x30, &response_data);
    basic.extend_from_slice(&[
        0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b, 0x05, 0x00,
    ]);
    basic.extend_from_slice(&[0x03, 0x02, 0x00, 0x00]);
    let basic = der_tlv(0x30, &basic);

    // id-pkix-ocsp-basic
    let mut resp_bytes = vec![
        0x06, 0x09, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x01, 0x01,
    ];
    resp_bytes.extend(der_tlv(0x04, &basic));
    let resp_bytes = der_tlv(0x30, &resp_bytes);

    let mut outer = vec![0x0a, 0x01, 0x00];
    outer.extend(der_tlv(0xa0, &resp_bytes));
    der_tlv(0x30, &outer)
}

pub fn ocsp_good(serial: &[u8]) -> Vec<u8> {
    successful_response(single_response(serial, &[0x80, 0x00]))
}

/// `time` is a GeneralizedTime such as `20240110000000Z`
pub fn ocsp_revoked(serial: &[u8], time: &str) -> Vec<u8> {
    let mut info = der_tlv(0x18, time.as_bytes());
    // keyCompromise
    info.extend_from_slice(&[0xa0, 0x03, 0x0a, 0x01, 0x01]);
    successful_response(single_response(serial, &der_tlv(0xa1, &info)))
}

pub fn ocsp_try_later() -> Vec<u8> {
    vec![0x30, 0x03, 0x0a, 0x01, 0x03]
}

/// One crt.sh search entry
pub fn search_entry(id: i64, not_before: &str, not_after: &str) -> serde_json::Value {
    serde_json::json!({
        "issuer_id": 1,
        "issuer_name": "CN=ct-audit Test Issuing CA",
        "common_name": "example.com",
        "name_value": "example.com",
        "id": id,
        "entry_timestamp": "2024-01-01T00:00:00.000",
        "not_before": not_before,
        "not_after": not_after,
        "serial_number": format!("{:02x}", id),
        "result_count": 1
    })
}
