//! Text helpers shared by the response decoder.
//!
//! The directory stores list-valued station fields (tags, languages,
//! language codes) as a single comma-separated string, and language names
//! in whatever case the submitter typed them.

/// Split a comma-separated field into trimmed items.
///
/// An empty (or all-whitespace) field yields an empty list.
///
/// # Examples
///
/// ```
/// use radios::text::split_comma_separated;
///
/// assert_eq!(split_comma_separated("rock,pop, jazz"), vec!["rock", "pop", "jazz"]);
/// assert!(split_comma_separated("").is_empty());
/// ```
pub fn split_comma_separated(value: &str) -> Vec<String> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    value.split(',').map(|item| item.trim().to_string()).collect()
}

/// Join items back into the comma-separated wire form.
pub fn join_comma_separated(items: &[String]) -> String {
    items.join(",")
}

/// Title-case a string: the first letter of every run of letters is
/// uppercased, the rest lowercased.
///
/// # Examples
///
/// ```
/// use radios::text::title_case;
///
/// assert_eq!(title_case("german"), "German");
/// assert_eq!(title_case("brazilian portuguese"), "Brazilian Portuguese");
/// ```
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}
