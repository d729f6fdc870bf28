//! Country records.

/// Flag image URL for an ISO code.
pub(crate) fn flag_url(code: &str) -> String {
    format!("https://flagcdn.com/256x192/{}.png", code.to_lowercase())
}

/// A country with the number of stations listed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    /// Display name resolved from the code.
    pub name: String,
    pub station_count: u32,
}

impl Country {
    /// URL of the country's flag.
    pub fn favicon(&self) -> String {
        flag_url(&self.code)
    }
}
