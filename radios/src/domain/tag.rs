//! Tag records.

use serde::Deserialize;

/// A tag with the number of stations carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(rename = "stationcount")]
    pub station_count: u32,
}
