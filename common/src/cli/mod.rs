//! Command line helpers
#[cfg(feature = "cli")]
pub mod client;

#[cfg(feature = "cli")]
pub mod log;
