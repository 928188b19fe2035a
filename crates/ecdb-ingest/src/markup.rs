//! Inline markup of the flat-file dump
//!
//! Field values carry four single-level bracket styles:
//!
//! | Markup    | Meaning              | Cleaned text         |
//! |-----------|----------------------|----------------------|
//! | `#1,2#`   | protein reference    | delimiters stripped  |
//! | `<12,13>` | literature reference | removed entirely     |
//! | `{...}`   | qualifier            | delimiters stripped  |
//! | `(...)`   | qualifier            | delimiters stripped  |
//!
//! Token extraction and cleaning are separate passes over the raw value.
//! Nesting of one style is not supported: the first non-greedy match wins.

use regex::{Captures, Regex};
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static PROTEIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([^#]+)#").expect("protein pattern compiles"));

#[allow(clippy::expect_used)]
static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^<>]+)>").expect("reference pattern compiles"));

#[allow(clippy::expect_used)]
static BRACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("brace pattern compiles"));

#[allow(clippy::expect_used)]
static PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]+)\)").expect("paren pattern compiles"));

#[allow(clippy::expect_used)]
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

/// Tokens found in one raw value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub proteins: Vec<String>,
    pub references: Vec<String>,
    /// Brace qualifiers first, then parenthesis qualifiers
    pub qualifiers: Vec<String>,
    /// Raw value with markup stripped and whitespace collapsed
    pub cleaned: String,
}

impl Markup {
    /// Tokenize and clean a raw field value
    pub fn parse(raw: &str) -> Self {
        let mut qualifiers = inner_tokens(&BRACE, raw);
        qualifiers.extend(inner_tokens(&PAREN, raw));

        Self {
            proteins: inner_tokens(&PROTEIN, raw),
            references: inner_tokens(&REFERENCE, raw),
            qualifiers,
            cleaned: clean(raw),
        }
    }
}

/// Strip markup from a value
///
/// `#`, brace, and parenthesis delimiters are dropped with their inner text
/// kept; `<...>` references are removed with their content.
pub fn clean(raw: &str) -> String {
    let keep_inner = |caps: &Captures<'_>| caps[1].to_string();

    let text = PROTEIN.replace_all(raw, keep_inner);
    let text = REFERENCE.replace_all(&text, "");
    let text = BRACE.replace_all(&text, keep_inner);
    let text = PAREN.replace_all(&text, keep_inner);

    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn inner_tokens(pattern: &Regex, raw: &str) -> Vec<String> {
    pattern
        .captures_iter(raw)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_all_four_styles() {
        let markup = Markup::parse("#P1# reported <PMID:123> under {note} (extra)");

        assert_eq!(markup.proteins, vec!["P1"]);
        assert_eq!(markup.references, vec!["PMID:123"]);
        assert_eq!(markup.qualifiers, vec!["note", "extra"]);
        assert_eq!(markup.cleaned, "P1 reported under note extra");
    }

    #[test]
    fn test_qualifier_order_is_braces_then_parens() {
        let markup = Markup::parse("(first) {second} (third) {fourth}");
        assert_eq!(markup.qualifiers, vec!["second", "fourth", "first", "third"]);
    }

    #[test]
    fn test_brenda_style_field() {
        let raw = "#1,2,5# NAD+ (#1# pH 7.5, 25°C <3>; #2# recombinant enzyme <4,7>) <3,4,7>";
        let markup = Markup::parse(raw);

        assert_eq!(markup.proteins, vec!["1,2,5", "1", "2"]);
        assert_eq!(markup.references, vec!["3", "4,7", "3,4,7"]);
        assert_eq!(
            markup.qualifiers,
            vec!["#1# pH 7.5, 25°C <3>; #2# recombinant enzyme <4,7>"]
        );
        assert_eq!(
            markup.cleaned,
            "1,2,5 NAD+ 1 pH 7.5, 25°C ; 2 recombinant enzyme"
        );
    }

    #[test]
    fn test_unbalanced_markup_is_left_alone() {
        let markup = Markup::parse("ratio < 5 and #7 unmatched");
        assert!(markup.proteins.is_empty());
        assert!(markup.references.is_empty());
        assert_eq!(markup.cleaned, "ratio < 5 and #7 unmatched");
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(clean("  a\t\tb <1>   c  "), "a b c");
    }

    proptest! {
        #[test]
        fn prop_clean_is_idempotent(
            parts in proptest::collection::vec(
                prop_oneof![
                    "[a-z0-9 ]{1,8}",
                    "[a-z0-9]{1,5}".prop_map(|t| format!("#{}#", t)),
                    "[a-z0-9]{1,5}".prop_map(|t| format!("<{}>", t)),
                    "[a-z0-9]{1,5}".prop_map(|t| format!("{{{}}}", t)),
                    "[a-z0-9]{1,5}".prop_map(|t| format!("({})", t)),
                ],
                0..8,
            )
        ) {
            let raw = parts.join(" ");
            let once = clean(&raw);
            prop_assert_eq!(clean(&once), once.clone());
        }
    }
}
