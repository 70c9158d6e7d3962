use regex::Regex;
use std::sync::LazyLock;

use crate::countries;

/// Descriptors allowed in trailing parentheses of an artist folder.
pub const ARTIST_TAGS: &[&str] = &[
    "early",
    "middle",
    "later",
    "acoustic",
    "instrumental",
    "female vocals",
];

/// Artist metadata recovered from a raw folder name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArtistName {
    pub name: String,
    pub country_code: Option<String>,
    pub country: Option<String>,
    /// In peel order: rightmost parenthetical first.
    pub tags: Vec<String>,
}

// Any parenthetical at the very end: "Name (later)"
static TRAILING_PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(([^()]*)\)\s*$").unwrap());

// Multi-country tail: "(Aut-UK)", "(Swe&Nor)"
pub(crate) static MULTI_COUNTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\((?P<code>[A-Za-z]{2,3}(?:\s*[-&]\s*[A-Za-z]{2,3})+)\)\s*$").unwrap()
});

// Single country tail: "(Ger)", "(UK)"
pub(crate) static SINGLE_COUNTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\((?P<code>\w{2,3})\)\s*$").unwrap());

/// Split a raw artist folder name into a display name, country and tags.
///
/// Tags are peeled from the tail while they belong to `ARTIST_TAGS`; the
/// first unknown parenthetical stops the peel. Then a multi-country tail
/// wins over a single-country tail.
pub fn parse_artist_name(folder_name: &str) -> ParsedArtistName {
    let mut remaining = folder_name.trim();
    let mut tags = Vec::new();

    while let Some(caps) = TRAILING_PAREN_RE.captures(remaining) {
        let content = caps[1].trim().to_lowercase();
        if !ARTIST_TAGS.contains(&content.as_str()) {
            break;
        }
        tags.push(content);
        remaining = remaining[..caps.get(0).unwrap().start()].trim_end();
    }

    if let Some(caps) = MULTI_COUNTRY_RE.captures(remaining) {
        let code = caps["code"].to_string();
        let name = remaining[..caps.get(0).unwrap().start()].trim().to_string();
        return ParsedArtistName {
            name,
            country: countries::resolve_country(&code),
            country_code: Some(code),
            tags,
        };
    }

    let mut parsed = ParsedArtistName {
        name: remaining.to_string(),
        tags,
        ..Default::default()
    };

    if let Some(caps) = SINGLE_COUNTRY_RE.captures(remaining) {
        let code = &caps["code"];
        if countries::is_country_code(code) {
            parsed.name = remaining[..caps.get(0).unwrap().start()].trim().to_string();
            parsed.country = countries::resolve_country(code);
            parsed.country_code = Some(code.to_string());
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name() {
        let p = parse_artist_name("Opeth");
        assert_eq!(p.name, "Opeth");
        assert_eq!(p.country_code, None);
        assert_eq!(p.country, None);
        assert!(p.tags.is_empty());
    }

    #[test]
    fn single_country_code() {
        let p = parse_artist_name("Blind Guardian (Ger)");
        assert_eq!(p.name, "Blind Guardian");
        assert_eq!(p.country_code.as_deref(), Some("Ger"));
        assert_eq!(p.country.as_deref(), Some("Germany"));
    }

    #[test]
    fn country_code_case_variants() {
        let p = parse_artist_name("Amorphis (FIN)");
        assert_eq!(p.name, "Amorphis");
        assert_eq!(p.country_code.as_deref(), Some("FIN"));
        assert_eq!(p.country.as_deref(), Some("Finland"));

        let p = parse_artist_name("Anathema (uk)");
        assert_eq!(p.name, "Anathema");
        assert_eq!(p.country.as_deref(), Some("United Kingdom"));
    }

    #[test]
    fn false_positive_tokens_are_not_countries() {
        for raw in ["Name (EP)", "Name (Live)", "Name (CD)", "Name (Ost)", "Name (VA)"] {
            let p = parse_artist_name(raw);
            assert_eq!(p.country_code, None, "{raw}");
            assert_eq!(p.name, raw, "{raw}");
        }
    }

    #[test]
    fn unknown_code_stays_in_name() {
        let p = parse_artist_name("Band (Xyz)");
        assert_eq!(p.name, "Band (Xyz)");
        assert_eq!(p.country_code, None);
    }

    #[test]
    fn multi_country_code() {
        let p = parse_artist_name("Artist (Aut-UK)");
        assert_eq!(p.name, "Artist");
        assert_eq!(p.country_code.as_deref(), Some("Aut-UK"));
        assert_eq!(p.country.as_deref(), Some("Austria / United Kingdom"));
    }

    #[test]
    fn multi_country_unresolved_is_still_stripped() {
        let p = parse_artist_name("Artist (Xx&Yy)");
        assert_eq!(p.name, "Artist");
        assert_eq!(p.country_code.as_deref(), Some("Xx&Yy"));
        assert_eq!(p.country, None);
    }

    #[test]
    fn tags_then_country() {
        let p = parse_artist_name("Ulver (Nor) (early)");
        assert_eq!(p.name, "Ulver");
        assert_eq!(p.country_code.as_deref(), Some("Nor"));
        assert_eq!(p.tags, vec!["early"]);
    }

    #[test]
    fn several_tags_peeled_rightmost_first() {
        let p = parse_artist_name("Katatonia (Swe) (later) (Acoustic)");
        assert_eq!(p.name, "Katatonia");
        assert_eq!(p.country_code.as_deref(), Some("Swe"));
        assert_eq!(p.tags, vec!["acoustic", "later"]);
    }

    #[test]
    fn multi_word_tag() {
        let p = parse_artist_name("Theatre of Tragedy (Nor) (Female Vocals)");
        assert_eq!(p.name, "Theatre of Tragedy");
        assert_eq!(p.tags, vec!["female vocals"]);
    }

    #[test]
    fn non_tag_parenthetical_stops_the_peel() {
        // "(early)" sits left of a non-tag, so it cannot be recovered
        let p = parse_artist_name("Band (Ger) (early) (side project)");
        assert_eq!(p.name, "Band (Ger) (early) (side project)");
        assert!(p.tags.is_empty());
        assert_eq!(p.country_code, None);
    }

    #[test]
    fn name_without_country_but_with_tag() {
        let p = parse_artist_name("Anathema (instrumental)");
        assert_eq!(p.name, "Anathema");
        assert_eq!(p.tags, vec!["instrumental"]);
        assert_eq!(p.country_code, None);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let p = parse_artist_name("  Emperor (Nor)  ");
        assert_eq!(p.name, "Emperor");
        assert_eq!(p.country_code.as_deref(), Some("Nor"));
    }
}
