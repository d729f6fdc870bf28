//! Radio station records.

use chrono::{DateTime, Utc};

use super::country_names::country_name;

/// A radio station listed in the directory.
///
/// `uuid` is the stable identity; every other field may change between
/// calls as the directory re-checks the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub uuid: String,
    /// Changes whenever the station entry is edited.
    pub change_uuid: String,
    pub name: String,
    /// Stream URL as submitted.
    pub url: String,
    /// Stream URL after following playlists and redirects.
    pub url_resolved: String,
    pub homepage: String,
    pub favicon: String,
    pub tags: Vec<String>,
    /// ISO 3166-1 alpha-2 code.
    pub country_code: String,
    /// ISO 3166-2 subdivision code.
    pub iso_3166_2: Option<String>,
    pub state: String,
    pub language: Vec<String>,
    pub language_codes: Vec<String>,
    pub votes: u32,
    pub lastchange_time: Option<DateTime<Utc>>,
    pub codec: String,
    /// Kilobits per second; 0 when unknown.
    pub bitrate: u32,
    pub hls: bool,
    pub last_check_ok: bool,
    pub last_check_time: Option<DateTime<Utc>>,
    pub last_check_ok_time: Option<DateTime<Utc>>,
    pub last_local_check_time: Option<DateTime<Utc>>,
    pub click_timestamp: Option<DateTime<Utc>>,
    pub click_count: u32,
    /// Click count difference over the last few days.
    pub click_trend: i32,
    pub ssl_error: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub has_extended_info: bool,
}

impl Station {
    /// Country name for the station's country code.
    ///
    /// Returns `None` if the code is empty or unknown.
    pub fn country(&self) -> Option<&'static str> {
        country_name(&self.country_code)
    }

    /// Both coordinates, if the station has a location.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}
