//! Conversion from Radio Browser DTOs to domain types.
//!
//! Besides renaming, this is where enrichment happens: country codes are
//! resolved to names, language names are title-cased, and comma-separated
//! fields become lists.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::domain::{Country, Language, Order, Station, Stats, Tag, country_name};
use crate::text::{join_comma_separated, split_comma_separated, title_case};

use super::error::RadioBrowserError;
use super::types::{CountryDto, LanguageDto, StationDto};

/// How much of an undecodable body to keep in the error.
const ERROR_BODY_CHARS: usize = 500;

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// A timestamp field was present but not RFC 3339
    #[error("invalid timestamp in {field}: {value}")]
    InvalidTimestamp { field: &'static str, value: String },
}

impl From<ConversionError> for RadioBrowserError {
    fn from(err: ConversionError) -> Self {
        RadioBrowserError::Json {
            message: err.to_string(),
            body: None,
        }
    }
}

/// Deserialize a response body, keeping the start of the body on failure.
pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, RadioBrowserError> {
    serde_json::from_str(body).map_err(|e| RadioBrowserError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(ERROR_BODY_CHARS).collect()),
    })
}

/// Decode a `stats` response.
pub fn decode_stats(body: &str) -> Result<Stats, RadioBrowserError> {
    parse_json(body)
}

/// Decode a station list response.
pub fn decode_stations(body: &str) -> Result<Vec<Station>, RadioBrowserError> {
    let dtos: Vec<StationDto> = parse_json(body)?;
    let stations = dtos
        .into_iter()
        .map(convert_station)
        .collect::<Result<Vec<_>, _>>()?;
    trace!(count = stations.len(), "decoded stations");
    Ok(stations)
}

/// Decode a `countrycodes` response.
///
/// The upstream list is ordered by code. When the caller asked for name
/// order, the list is re-sorted by the resolved display name.
pub fn decode_countries(
    body: &str,
    order: Order,
    reverse: bool,
) -> Result<Vec<Country>, RadioBrowserError> {
    let dtos: Vec<CountryDto> = parse_json(body)?;
    let mut countries: Vec<Country> = dtos.into_iter().map(convert_country).collect();

    if order == Order::Name {
        sort_by_name(&mut countries, reverse);
    }

    trace!(count = countries.len(), "decoded countries");
    Ok(countries)
}

/// Decode a `languages` response.
pub fn decode_languages(body: &str) -> Result<Vec<Language>, RadioBrowserError> {
    let dtos: Vec<LanguageDto> = parse_json(body)?;
    Ok(dtos.into_iter().map(convert_language).collect())
}

/// Decode a `tags` response.
pub fn decode_tags(body: &str) -> Result<Vec<Tag>, RadioBrowserError> {
    parse_json(body)
}

/// Resolve a country entry whose `name` is really its code.
///
/// Codes missing from the table keep the code as their name.
pub fn convert_country(dto: CountryDto) -> Country {
    let name = country_name(&dto.name)
        .map(str::to_string)
        .unwrap_or_else(|| dto.name.clone());
    Country {
        code: dto.name,
        name,
        station_count: dto.station_count,
    }
}

/// Stable sort by display name; descending when `reverse`.
fn sort_by_name(countries: &mut [Country], reverse: bool) {
    if reverse {
        countries.sort_by(|a, b| b.name.cmp(&a.name));
    } else {
        countries.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

pub fn convert_language(dto: LanguageDto) -> Language {
    Language {
        code: dto.iso_639,
        name: title_case(&dto.name),
        station_count: dto.station_count,
    }
}

/// Convert a station DTO, parsing timestamps and splitting list fields.
pub fn convert_station(dto: StationDto) -> Result<Station, ConversionError> {
    Ok(Station {
        lastchange_time: parse_timestamp("lastchangetime_iso8601", dto.lastchange_time)?,
        last_check_time: parse_timestamp("lastchecktime_iso8601", dto.last_check_time)?,
        last_check_ok_time: parse_timestamp("lastcheckoktime_iso8601", dto.last_check_ok_time)?,
        last_local_check_time: parse_timestamp(
            "lastlocalchecktime_iso8601",
            dto.last_local_check_time,
        )?,
        click_timestamp: parse_timestamp("clicktimestamp_iso8601", dto.click_timestamp)?,
        tags: split_comma_separated(&dto.tags),
        language: split_comma_separated(&dto.language),
        language_codes: split_comma_separated(&dto.language_codes),
        uuid: dto.uuid,
        change_uuid: dto.change_uuid,
        name: dto.name,
        url: dto.url,
        url_resolved: dto.url_resolved,
        homepage: dto.homepage,
        favicon: dto.favicon,
        country_code: dto.country_code,
        iso_3166_2: dto.iso_3166_2,
        state: dto.state,
        votes: dto.votes,
        codec: dto.codec,
        bitrate: dto.bitrate,
        hls: dto.hls,
        last_check_ok: dto.last_check_ok,
        click_count: dto.click_count,
        click_trend: dto.click_trend,
        ssl_error: dto.ssl_error,
        latitude: dto.latitude,
        longitude: dto.longitude,
        has_extended_info: dto.has_extended_info,
    })
}

fn parse_timestamp(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<DateTime<Utc>>, ConversionError> {
    let Some(value) = value else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|_| ConversionError::InvalidTimestamp { field, value })
}

fn format_timestamp(value: &Option<DateTime<Utc>>) -> Option<String> {
    value
        .as_ref()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Encode a station back into its wire form.
impl From<&Station> for StationDto {
    fn from(station: &Station) -> Self {
        StationDto {
            change_uuid: station.change_uuid.clone(),
            uuid: station.uuid.clone(),
            name: station.name.clone(),
            url: station.url.clone(),
            url_resolved: station.url_resolved.clone(),
            homepage: station.homepage.clone(),
            favicon: station.favicon.clone(),
            tags: join_comma_separated(&station.tags),
            country_code: station.country_code.clone(),
            iso_3166_2: station.iso_3166_2.clone(),
            state: station.state.clone(),
            language: join_comma_separated(&station.language),
            language_codes: join_comma_separated(&station.language_codes),
            votes: station.votes,
            lastchange_time: format_timestamp(&station.lastchange_time),
            codec: station.codec.clone(),
            bitrate: station.bitrate,
            hls: station.hls,
            last_check_ok: station.last_check_ok,
            last_check_time: format_timestamp(&station.last_check_time),
            last_check_ok_time: format_timestamp(&station.last_check_ok_time),
            last_local_check_time: format_timestamp(&station.last_local_check_time),
            click_timestamp: format_timestamp(&station.click_timestamp),
            click_count: station.click_count,
            click_trend: station.click_trend,
            ssl_error: station.ssl_error,
            latitude: station.latitude,
            longitude: station.longitude,
            has_extended_info: station.has_extended_info,
        }
    }
}
