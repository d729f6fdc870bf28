//! Directory service statistics.

use serde::Deserialize;

/// Health snapshot of the directory server that answered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Stats {
    /// Highest API version the server supports.
    pub supported_version: u32,
    pub software_version: String,
    /// "OK" when the server is healthy.
    pub status: String,
    pub stations: u64,
    pub stations_broken: u64,
    pub tags: u64,
    pub clicks_last_hour: u64,
    pub clicks_last_day: u64,
    pub languages: u64,
    pub countries: u64,
}

impl Stats {
    /// Whether the server reports itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
