//! Report generation module
//!
//! PEM encoding and the on-disk result store.

pub mod pem;
pub mod store;

pub use pem::PemExporter;
pub use store::ResultStore;
