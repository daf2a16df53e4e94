//! Small string helpers.
//!
//! Case-insensitive variants compare the Unicode lowercase mapping of each character.

/// Removes leading and trailing whitespace.
pub fn trim(s: &str) -> &str {
    s.trim()
}

/// Removes leading whitespace.
pub fn ltrim(s: &str) -> &str {
    s.trim_start()
}

/// Removes trailing whitespace.
pub fn rtrim(s: &str) -> &str {
    s.trim_end()
}

/// Whether `needle` occurs in `haystack`.
///
/// ```
/// use live_collection::string::search;
///
/// assert!(search("hello, world :-)", "World", false));
/// assert!(!search("hello, world :-)", "World", true));
/// ```
pub fn search(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Whether `a` and `b` are equal.
pub fn equal(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
    }
}

/// Replaces every occurrence of `from` with `to`. An empty `from` leaves `s` unchanged.
pub fn replace_all(s: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        return s.to_string();
    }
    s.replace(from, to)
}
