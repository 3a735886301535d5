//! Case-insensitive name handling shared by sibling lookup, implements sets
//! and discriminator mappings.

use std::cmp::Ordering;

/// Lookup key for a name; two names collide iff their keys are equal
pub fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Ordinal, case-insensitive ordering used everywhere members are listed
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    compare_ignore_case(a, b) == Ordering::Equal
}

/// Upper-cases the first character, leaving the rest untouched
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_ignore_case() {
        assert_eq!(compare_ignore_case("alpha", "ALPHA"), Ordering::Equal);
        assert_eq!(compare_ignore_case("Alpha", "beta"), Ordering::Less);
        assert_eq!(compare_ignore_case("beta", "Alpha"), Ordering::Greater);
        assert!(eq_ignore_case("Dog", "dOG"));
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("userId"), "UserId");
        assert_eq!(capitalize_first(""), "");
    }
}
