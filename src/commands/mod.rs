//! Command implementations for ct-audit

pub mod audit;

pub use audit::run_audit;
