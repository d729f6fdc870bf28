//! Typed records returned by the directory.
//!
//! Every record is a flat, immutable value produced fresh by a single call.
//! Derived values (a station's country name, flag URLs) are computed on
//! demand from the stored codes rather than stored.

mod country;
mod country_names;
mod language;
mod query;
mod station;
mod stats;
mod tag;

pub use country::Country;
pub use country_names::country_name;
pub use language::Language;
pub use query::{
    DEFAULT_LIMIT, FilterBy, InvalidFilterTerm, ListOptions, Order, SearchOptions, StationFilter,
    UnknownQueryValue,
};
pub use station::Station;
pub use stats::Stats;
pub use tag::Tag;

#[cfg(test)]
pub(crate) use station::fixtures;
