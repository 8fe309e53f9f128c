//! Configuration module for ct-audit
//!
//! Handles loading settings from TOML files.

pub mod settings;

pub use settings::{CtSettings, HttpSettings, IssuerSettings, OutputSettings, Settings};

use crate::utils::Result;
use std::path::Path;

/// Load settings from an explicit path, or from the default location
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load_from_file(path)?,
        None => Settings::load_default()?,
    };
    Ok(settings)
}
