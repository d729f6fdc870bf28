//! Query vocabulary: ordering, station filters and list options.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an unknown order or filter name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownQueryValue {
    kind: &'static str,
    value: String,
}

/// Error returned for a filter term that cannot travel as a path segment.
///
/// URL parsing collapses `.` and `..` segments in any spelling, including
/// `%2E%2E`, so such a term would address a different endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("filter term {0:?} cannot be sent as a path segment")]
pub struct InvalidFilterTerm(pub String);

/// Field the directory sorts results by.
///
/// The wire value is passed through verbatim as the `order` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    Bitrate,
    ChangeTimestamp,
    ClickCount,
    ClickTimestamp,
    ClickTrend,
    Code,
    Codec,
    Country,
    Favicon,
    Homepage,
    Language,
    LastCheckOk,
    LastCheckTime,
    #[default]
    Name,
    Random,
    State,
    StationCount,
    Tags,
    Url,
    Votes,
}

impl Order {
    const ALL: [Order; 20] = [
        Order::Bitrate,
        Order::ChangeTimestamp,
        Order::ClickCount,
        Order::ClickTimestamp,
        Order::ClickTrend,
        Order::Code,
        Order::Codec,
        Order::Country,
        Order::Favicon,
        Order::Homepage,
        Order::Language,
        Order::LastCheckOk,
        Order::LastCheckTime,
        Order::Name,
        Order::Random,
        Order::State,
        Order::StationCount,
        Order::Tags,
        Order::Url,
        Order::Votes,
    ];

    /// The `order` query parameter value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Bitrate => "bitrate",
            Order::ChangeTimestamp => "changetimestamp",
            Order::ClickCount => "clickcount",
            Order::ClickTimestamp => "clicktimestamp",
            Order::ClickTrend => "clicktrend",
            Order::Code => "code",
            Order::Codec => "codec",
            Order::Country => "country",
            Order::Favicon => "favicon",
            Order::Homepage => "homepage",
            Order::Language => "language",
            Order::LastCheckOk => "lastcheckok",
            Order::LastCheckTime => "lastchecktime",
            Order::Name => "name",
            Order::Random => "random",
            Order::State => "state",
            Order::StationCount => "stationcount",
            Order::Tags => "tags",
            Order::Url => "url",
            Order::Votes => "votes",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Order {
    type Err = UnknownQueryValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Order::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| UnknownQueryValue {
                kind: "order",
                value: s.to_string(),
            })
    }
}

/// Station field a filter term is matched against.
///
/// Selects the path segment of the station list and search endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterBy {
    Uuid,
    Name,
    NameExact,
    Codec,
    CodecExact,
    Country,
    CountryExact,
    CountryCodeExact,
    State,
    StateExact,
    Language,
    LanguageExact,
    Tag,
    TagExact,
}

impl FilterBy {
    const ALL: [FilterBy; 14] = [
        FilterBy::Uuid,
        FilterBy::Name,
        FilterBy::NameExact,
        FilterBy::Codec,
        FilterBy::CodecExact,
        FilterBy::Country,
        FilterBy::CountryExact,
        FilterBy::CountryCodeExact,
        FilterBy::State,
        FilterBy::StateExact,
        FilterBy::Language,
        FilterBy::LanguageExact,
        FilterBy::Tag,
        FilterBy::TagExact,
    ];

    /// The path segment for this filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterBy::Uuid => "byuuid",
            FilterBy::Name => "byname",
            FilterBy::NameExact => "bynameexact",
            FilterBy::Codec => "bycodec",
            FilterBy::CodecExact => "bycodecexact",
            FilterBy::Country => "bycountry",
            FilterBy::CountryExact => "bycountryexact",
            FilterBy::CountryCodeExact => "bycountrycodeexact",
            FilterBy::State => "bystate",
            FilterBy::StateExact => "bystateexact",
            FilterBy::Language => "bylanguage",
            FilterBy::LanguageExact => "bylanguageexact",
            FilterBy::Tag => "bytag",
            FilterBy::TagExact => "bytagexact",
        }
    }
}

impl fmt::Display for FilterBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterBy {
    type Err = UnknownQueryValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterBy::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownQueryValue {
                kind: "filter",
                value: s.to_string(),
            })
    }
}

/// A station filter: field plus optional search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationFilter {
    pub by: FilterBy,
    pub term: Option<String>,
}

impl StationFilter {
    /// Filter on `by` matching `term`.
    pub fn new(by: FilterBy, term: impl Into<String>) -> Self {
        Self {
            by,
            term: Some(term.into()),
        }
    }

    /// Filter segment without a term.
    pub fn by(by: FilterBy) -> Self {
        Self { by, term: None }
    }

    /// Whether the term can be sent as a path segment.
    pub fn is_sendable(&self) -> bool {
        !matches!(self.term.as_deref(), Some("." | ".."))
    }

    /// Append this filter to an endpoint path.
    ///
    /// The term is percent-encoded as a single path segment.
    pub fn apply_to(&self, base: &str) -> Result<String, InvalidFilterTerm> {
        match &self.term {
            Some(term) if !self.is_sendable() => Err(InvalidFilterTerm(term.clone())),
            Some(term) => Ok(format!("{base}/{}/{}", self.by, urlencoding::encode(term))),
            None => Ok(format!("{base}/{}", self.by)),
        }
    }
}

/// Default page size; large enough to mean "everything".
pub const DEFAULT_LIMIT: u32 = 100_000;

/// Pagination and ordering shared by every list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Leave out stations that failed their last check.
    pub hide_broken: bool,
    pub limit: u32,
    pub offset: u32,
    pub order: Order,
    pub reverse: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            hide_broken: false,
            limit: DEFAULT_LIMIT,
            offset: 0,
            order: Order::Name,
            reverse: false,
        }
    }
}

impl ListOptions {
    pub fn with_hide_broken(mut self, hide_broken: bool) -> Self {
        self.hide_broken = hide_broken;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
}

/// Extra criteria for the advanced station search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub name: Option<String>,
    pub name_exact: bool,
    pub country: Option<String>,
    pub country_exact: bool,
    pub state_exact: bool,
    pub language_exact: bool,
    pub tag_exact: bool,
    pub bitrate_min: u32,
    pub bitrate_max: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            name: None,
            name_exact: false,
            country: None,
            country_exact: false,
            state_exact: false,
            language_exact: false,
            tag_exact: false,
            bitrate_min: 0,
            bitrate_max: 1_000_000,
        }
    }
}

impl SearchOptions {
    /// Search by station name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Search by country name.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Restrict to a bitrate range (kbps, inclusive).
    pub fn with_bitrate(mut self, min: u32, max: u32) -> Self {
        self.bitrate_min = min;
        self.bitrate_max = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_wire_values() {
        assert_eq!(Order::Name.as_str(), "name");
        assert_eq!(Order::ClickCount.as_str(), "clickcount");
        assert_eq!(Order::StationCount.as_str(), "stationcount");
        assert_eq!(Order::LastCheckOk.to_string(), "lastcheckok");
    }

    #[test]
    fn order_parse_roundtrip() {
        for order in Order::ALL {
            assert_eq!(order.as_str().parse::<Order>(), Ok(order));
        }
        assert!("loudness".parse::<Order>().is_err());
    }

    #[test]
    fn filter_parse_roundtrip() {
        for filter in FilterBy::ALL {
            assert_eq!(filter.as_str().parse::<FilterBy>(), Ok(filter));
        }
        let err = "byvibe".parse::<FilterBy>().unwrap_err();
        assert_eq!(err.to_string(), "unknown filter: byvibe");
    }

    #[test]
    fn filter_path_with_term() {
        let filter = StationFilter::new(FilterBy::CountryCodeExact, "NL");
        assert_eq!(
            filter.apply_to("stations").unwrap(),
            "stations/bycountrycodeexact/NL"
        );
    }

    #[test]
    fn filter_path_without_term() {
        let filter = StationFilter::by(FilterBy::Tag);
        assert_eq!(
            filter.apply_to("stations/search").unwrap(),
            "stations/search/bytag"
        );
    }

    #[test]
    fn filter_term_is_one_segment() {
        let filter = StationFilter::new(FilterBy::Name, "rock/pop 24?");
        assert_eq!(
            filter.apply_to("stations").unwrap(),
            "stations/byname/rock%2Fpop%2024%3F"
        );
    }

    #[test]
    fn dot_segment_terms_are_rejected() {
        for term in [".", ".."] {
            let filter = StationFilter::new(FilterBy::Uuid, term);
            assert!(!filter.is_sendable());
            assert_eq!(
                filter.apply_to("stations"),
                Err(InvalidFilterTerm(term.to_string()))
            );
        }

        let filter = StationFilter::new(FilterBy::Name, "...");
        assert!(filter.is_sendable());
        assert_eq!(filter.apply_to("stations").unwrap(), "stations/byname/...");
    }

    #[test]
    fn list_defaults() {
        let options = ListOptions::default();
        assert!(!options.hide_broken);
        assert_eq!(options.limit, 100_000);
        assert_eq!(options.offset, 0);
        assert_eq!(options.order, Order::Name);
        assert!(!options.reverse);
    }

    #[test]
    fn list_builder() {
        let options = ListOptions::default()
            .with_limit(10)
            .with_offset(20)
            .with_order(Order::ClickCount)
            .with_reverse(true)
            .with_hide_broken(true);
        assert_eq!(options.limit, 10);
        assert_eq!(options.offset, 20);
        assert_eq!(options.order, Order::ClickCount);
        assert!(options.reverse);
        assert!(options.hide_broken);
    }

    #[test]
    fn search_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.name, None);
        assert_eq!(options.bitrate_min, 0);
        assert_eq!(options.bitrate_max, 1_000_000);
        assert!(!options.name_exact);
    }
}
