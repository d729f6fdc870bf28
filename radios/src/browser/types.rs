//! Radio Browser API response DTOs.
//!
//! These types map directly to the JSON payloads. Wire field names differ
//! from the domain names (`stationuuid`, `clickcount`, `*_iso8601`, ...);
//! the `rename` attributes are the alias table. The directory is loose
//! about types: flags arrive as `0`/`1` or booleans, and empty values as
//! either `null` or `""`.

use serde::{Deserialize, Deserializer, Serialize};

/// A station as returned by the `stations` endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StationDto {
    #[serde(rename = "changeuuid", default)]
    pub change_uuid: String,

    #[serde(rename = "stationuuid")]
    pub uuid: String,

    pub name: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub url_resolved: String,

    #[serde(default)]
    pub homepage: String,

    #[serde(default)]
    pub favicon: String,

    /// Comma-separated.
    #[serde(default, deserialize_with = "string_or_null")]
    pub tags: String,

    #[serde(rename = "countrycode", default)]
    pub country_code: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub iso_3166_2: Option<String>,

    #[serde(default, deserialize_with = "string_or_null")]
    pub state: String,

    /// Comma-separated.
    #[serde(default, deserialize_with = "string_or_null")]
    pub language: String,

    /// Comma-separated.
    #[serde(rename = "languagecodes", default, deserialize_with = "string_or_null")]
    pub language_codes: String,

    #[serde(default)]
    pub votes: u32,

    #[serde(
        rename = "lastchangetime_iso8601",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub lastchange_time: Option<String>,

    #[serde(default)]
    pub codec: String,

    #[serde(default)]
    pub bitrate: u32,

    #[serde(default, deserialize_with = "bool_or_int")]
    pub hls: bool,

    #[serde(rename = "lastcheckok", default, deserialize_with = "bool_or_int")]
    pub last_check_ok: bool,

    #[serde(
        rename = "lastchecktime_iso8601",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub last_check_time: Option<String>,

    #[serde(
        rename = "lastcheckoktime_iso8601",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub last_check_ok_time: Option<String>,

    #[serde(
        rename = "lastlocalchecktime_iso8601",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub last_local_check_time: Option<String>,

    #[serde(
        rename = "clicktimestamp_iso8601",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub click_timestamp: Option<String>,

    #[serde(rename = "clickcount", default)]
    pub click_count: u32,

    #[serde(rename = "clicktrend", default)]
    pub click_trend: i32,

    #[serde(default)]
    pub ssl_error: u32,

    #[serde(rename = "geo_lat", default)]
    pub latitude: Option<f64>,

    #[serde(rename = "geo_long", default)]
    pub longitude: Option<f64>,

    #[serde(default, deserialize_with = "bool_or_int")]
    pub has_extended_info: bool,
}

/// An entry of the `countrycodes` endpoint.
///
/// Despite its name, `name` holds the ISO 3166-1 alpha-2 code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CountryDto {
    pub name: String,
    #[serde(rename = "stationcount")]
    pub station_count: u32,
}

/// An entry of the `languages` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageDto {
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub iso_639: Option<String>,
    #[serde(rename = "stationcount")]
    pub station_count: u32,
}

/// Treat `null` and `""` alike as absent.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

/// Accept `true`/`false` as well as `1`/`0`.
fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATION_JSON: &str = r#"{
        "changeuuid": "610cafba-71d8-40fc-bf68-1456ec973b9d",
        "stationuuid": "9608b51d-0601-11e8-ae97-52543be04c81",
        "serveruuid": null,
        "name": "Radio 538",
        "url": "http://playerservices.streamtheworld.com/api/livestream-redirect/RADIO538.mp3",
        "url_resolved": "http://22343.live.streamtheworld.com/RADIO538.mp3",
        "homepage": "https://www.538.nl/",
        "favicon": "https://www.538.nl/favicon.png",
        "tags": "top 40,pop, dance",
        "country": "The Netherlands",
        "countrycode": "NL",
        "iso_3166_2": null,
        "state": "",
        "language": "dutch",
        "languagecodes": "nl",
        "votes": 2361,
        "lastchangetime_iso8601": "2023-04-02T10:15:00Z",
        "codec": "MP3",
        "bitrate": 128,
        "hls": 0,
        "lastcheckok": 1,
        "lastchecktime_iso8601": "2023-05-21T08:01:02Z",
        "lastcheckoktime_iso8601": "2023-05-21T08:01:02Z",
        "lastlocalchecktime_iso8601": "",
        "clicktimestamp_iso8601": "2023-05-21T09:45:12Z",
        "clickcount": 5012,
        "clicktrend": -12,
        "ssl_error": 0,
        "geo_lat": 52.37,
        "geo_long": 4.89,
        "has_extended_info": false
    }"#;

    #[test]
    fn deserialize_station() {
        let dto: StationDto = serde_json::from_str(STATION_JSON).unwrap();

        assert_eq!(dto.uuid, "9608b51d-0601-11e8-ae97-52543be04c81");
        assert_eq!(dto.change_uuid, "610cafba-71d8-40fc-bf68-1456ec973b9d");
        assert_eq!(dto.country_code, "NL");
        assert_eq!(dto.tags, "top 40,pop, dance");
        assert_eq!(dto.click_count, 5012);
        assert_eq!(dto.click_trend, -12);
        assert!(!dto.hls);
        assert!(dto.last_check_ok);
        assert_eq!(dto.latitude, Some(52.37));
    }

    #[test]
    fn empty_timestamps_are_absent() {
        let dto: StationDto = serde_json::from_str(STATION_JSON).unwrap();

        assert_eq!(dto.last_local_check_time, None);
        assert_eq!(dto.iso_3166_2, None);
        assert_eq!(
            dto.click_timestamp.as_deref(),
            Some("2023-05-21T09:45:12Z")
        );
    }

    #[test]
    fn minimal_station() {
        let json = r#"{"stationuuid": "u1", "name": "Bare FM", "geo_lat": null, "tags": null}"#;
        let dto: StationDto = serde_json::from_str(json).unwrap();

        assert_eq!(dto.uuid, "u1");
        assert_eq!(dto.tags, "");
        assert_eq!(dto.latitude, None);
        assert_eq!(dto.bitrate, 0);
        assert!(!dto.has_extended_info);
    }

    #[test]
    fn flags_accept_booleans() {
        let json = r#"{"stationuuid": "u1", "name": "x", "hls": true, "lastcheckok": false}"#;
        let dto: StationDto = serde_json::from_str(json).unwrap();
        assert!(dto.hls);
        assert!(!dto.last_check_ok);
    }

    #[test]
    fn deserialize_country() {
        let dto: CountryDto =
            serde_json::from_str(r#"{"name": "NL", "stationcount": 812}"#).unwrap();
        assert_eq!(dto.name, "NL");
        assert_eq!(dto.station_count, 812);
    }

    #[test]
    fn deserialize_language() {
        let dto: LanguageDto =
            serde_json::from_str(r#"{"name": "german", "iso_639": "de", "stationcount": 3012}"#)
                .unwrap();
        assert_eq!(dto.iso_639.as_deref(), Some("de"));

        let dto: LanguageDto =
            serde_json::from_str(r#"{"name": "klingon", "iso_639": null, "stationcount": 1}"#)
                .unwrap();
        assert_eq!(dto.iso_639, None);

        let dto: LanguageDto =
            serde_json::from_str(r#"{"name": "esperanto", "stationcount": 4}"#).unwrap();
        assert_eq!(dto.iso_639, None);
    }
}
