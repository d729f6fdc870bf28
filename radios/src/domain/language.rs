//! Language records.

use super::country::flag_url;

/// A language with the number of stations broadcasting in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// ISO 639 code, when the directory knows one.
    pub code: Option<String>,
    /// Title-cased name.
    pub name: String,
    pub station_count: u32,
}

impl Language {
    /// Flag URL keyed on the language code, if there is one.
    pub fn favicon(&self) -> Option<String> {
        self.code.as_deref().map(flag_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favicon_with_code() {
        let language = Language {
            code: Some("DE".to_string()),
            name: "German".to_string(),
            station_count: 3000,
        };
        assert_eq!(
            language.favicon().as_deref(),
            Some("https://flagcdn.com/256x192/de.png")
        );
    }

    #[test]
    fn favicon_without_code() {
        let language = Language {
            code: None,
            name: "Klingon".to_string(),
            station_count: 1,
        };
        assert_eq!(language.favicon(), None);
    }
}
