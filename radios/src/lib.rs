//! Async client for the Radio Browser station directory.
//!
//! Typed lookups of stations, countries, languages and tags, plus click
//! registration. API hosts are discovered through DNS SRV records and
//! failed hosts are replaced transparently.

pub mod browser;
pub mod domain;
pub mod text;

pub use browser::{RadioBrowser, RadioBrowserConfig, RadioBrowserError};
