//! Core domain + application logic for the Telegram group scraper.
//!
//! This crate is framework-agnostic. The Telegram client library and the
//! terminal live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod logging;
pub mod paths;
pub mod ports;
pub mod scraper;
pub mod sessions;
pub mod transfer;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{Error, GatewayError, Result};
