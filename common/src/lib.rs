#![deny(clippy::unwrap_used)]

pub mod changes;
pub mod cli;
pub mod fetcher;
pub mod utils;
