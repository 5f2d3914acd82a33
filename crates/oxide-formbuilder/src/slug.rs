//! Slug derivation for field identifiers and option keys.

use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("static slug pattern is valid"));

/// Creates a slug from a display label.
///
/// Quotes are dropped, underscores become hyphens, every remaining run of
/// non-word characters collapses into one hyphen, and the result is
/// lower-cased. `"Make a payment"` becomes `"make-a-payment"`.
pub fn slugify(label: &str) -> String {
    let stripped: String = label
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .map(|c| if c == '_' { '-' } else { c })
        .collect();

    NON_WORD.replace_all(&stripped, "-").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_label() {
        assert_eq!(slugify("Make a payment"), "make-a-payment");
        assert_eq!(slugify("Email"), "email");
    }

    #[test]
    fn test_quotes_and_underscores() {
        assert_eq!(slugify("Driver's \"License\""), "drivers-license");
        assert_eq!(slugify("first_name"), "first-name");
    }

    #[test]
    fn test_runs_collapse() {
        assert_eq!(slugify("Name (first)"), "name-first-");
        assert_eq!(slugify("a_-b"), "a-b");
        assert_eq!(slugify("Card  number:"), "card-number-");
    }

    #[test]
    fn test_idempotent() {
        for label in [
            "Make a payment",
            "Name (first)",
            "Ünïcödé Label",
            "  padded  ",
            "a__b--c",
            "Don't \"quote\" me",
            "",
        ] {
            let once = slugify(label);
            assert_eq!(slugify(&once), once, "label: {label:?}");
        }
    }
}
