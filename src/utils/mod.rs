//! Utility modules for ct-audit
//!
//! This module contains error types, progress indicators, and other utilities.

pub mod error;
pub mod progress;

pub use error::{AuditError, ConfigError, CtError, Result, RevocationError, StoreError};
