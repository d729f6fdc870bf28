//! Radio Browser API client.
//!
//! This module provides an HTTP client for the Radio Browser directory
//! (<https://www.radio-browser.info>), a community-maintained list of
//! internet radio stations.
//!
//! Key characteristics of the API:
//! - Several equivalent API servers are published as DNS SRV records;
//!   any of them can answer any request
//! - Every query value is read as a string, including booleans
//! - Country lists carry only ISO codes; names are resolved client-side

mod client;
mod convert;
mod error;
mod resolver;
mod retry;
mod transport;
mod types;

pub use client::{RadioBrowser, RadioBrowserConfig};
pub use convert::ConversionError;
pub use error::RadioBrowserError;
pub use resolver::{
    DEFAULT_SERVICE_NAME, HostDiscovery, HostResolver, SrvDiscovery, StaticDiscovery,
};
pub use retry::{DEFAULT_MAX_ATTEMPTS, RetryPolicy};
pub use transport::Params;
pub use types::{CountryDto, LanguageDto, StationDto};
