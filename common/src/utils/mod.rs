//! Common utilities
pub mod hex;
pub mod measure;
pub mod url;
