//! Custom error types for ct-audit
//!
//! Each pipeline stage has its own error enum so callers can tell a
//! confirmed verdict apart from one that could not be determined.

use thiserror::Error;

/// Errors that end an audit run
///
/// Per-certificate `CtError` and `RevocationError` values never reach this
/// level; the runner turns them into skipped or unknown outcomes.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Result store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Certificate Transparency aggregator errors
#[derive(Error, Debug)]
pub enum CtError {
    #[error("Request to {url} failed: {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to parse CT data: {message}")]
    Parse { message: String },
}

/// Issuer resolution and OCSP errors
///
/// Every variant is folded into an `Unknown` verdict by the checker.
#[derive(Error, Debug)]
pub enum RevocationError {
    #[error("Request to {url} failed: {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to parse certificate data: {message}")]
    Parse { message: String },

    #[error("Certificate missing required extension: {extension}")]
    ExtensionMissing { extension: String },

    #[error("OCSP protocol error: {message}")]
    Protocol { message: String },
}

/// Result store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to create directory {path}: {message}")]
    CreateDir { path: String, message: String },

    #[error("Failed to write certificate to {path}: {message}")]
    Write { path: String, message: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias using AuditError
pub type Result<T> = std::result::Result<T, AuditError>;
