//! Check modules for ct-audit
//!
//! Date-window filtering, issuer resolution and OCSP revocation checks.

pub mod aia;
pub mod issuer;
pub mod ocsp;
pub mod temporal;

pub use aia::{access_location, AccessMethod};
pub use issuer::IssuerResolver;
pub use ocsp::{CertStatus, OcspChecker, OcspResponseStatus};
pub use temporal::{filter_valid_on, is_valid_on};
