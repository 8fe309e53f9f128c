//! Output formatting module

pub mod json;

pub use json::print_json;
