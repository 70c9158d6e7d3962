use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Release type of an album folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    #[default]
    Album,
    Ep,
    Single,
    Compilation,
    Split,
    Demo,
    Live,
    Other,
}

impl ReleaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Album => "album",
            Self::Ep => "ep",
            Self::Single => "single",
            Self::Compilation => "compilation",
            Self::Split => "split",
            Self::Demo => "demo",
            Self::Live => "live",
            Self::Other => "other",
        }
    }

    /// Map a " - Word" suffix to a type. Unknown words fall back to Album.
    fn from_dash_suffix(word: &str) -> Self {
        match word.to_lowercase().as_str() {
            "ep" => Self::Ep,
            "live" => Self::Live,
            "single" | "cds" => Self::Single,
            "compilation" => Self::Compilation,
            "demo" => Self::Demo,
            "split" => Self::Split,
            _ => Self::Album,
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// "[1988]" anywhere in the folder name
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(?P<year>\d{4})\]").unwrap());

// Edition/format/quality noise, stripped in order.
static NOISE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\s*\[\d{4}\]\s*",
        r"(?i)\s*\(lossless\)",
        r"(?i)\s*-\s*lossless\b",
        r"(?i)\s*\((?:later|early)\)",
        r"(?i)\s*\(demo\)",
        r"(?i)\s*\(promo\)",
        r"(?i)\s*-\s*promo\b",
        r"(?i)\s*\((?:\d{4}\s+)?remaster(?:ed)?(?:\s+\d{4})?\)",
        r"(?i)\s*\(reissue\)",
        r"(?i)\s*\(deluxe(?:\s+edition)?\)",
        r"(?i)\s*\(limited\s+edition\)",
        r"(?i)\s*\(bonus\s+tracks?\)",
        r"(?i)\s*\(digi(?:pak|pack|book)\)",
        r"(?i)\s*\(box\s?set\)",
        r"(?i)\s*\(special\s+edition\)",
        r"(?i)\s*\((?:\d+(?:st|nd|rd|th)\s+)?anniversary[^)]*\)",
        r"(?i)\s*\(reissue\s+\d+\)",
        r"(?i)\s*[-–]?\s*\(?\d{2,4}\s*-?\s*kbps\)?",
        r"(?i)\s+-\s+(?:ep|live|single|compilation|demo|split|cds)\s*$",
        r"(?i)\s*\((?:disc|cd)\s*\d+\)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// " - EP", " - Live (Lossless)"; unknown words map to Album
static DASH_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s-\s(?P<kind>\w+)\s*(?:\([^()]*\)\s*)*$").unwrap()
});

// Parenthetical markers in priority order.
static PAREN_TYPES: LazyLock<Vec<(Regex, ReleaseType)>> = LazyLock::new(|| {
    [
        (r"(?i)\(ep\)", ReleaseType::Ep),
        (r"(?i)\(single\)", ReleaseType::Single),
        (r"(?i)\(demo\)", ReleaseType::Demo),
        (r"(?i)\(live\)", ReleaseType::Live),
        (r"(?i)\(compilation\)", ReleaseType::Compilation),
        (r"(?i)\(split\)", ReleaseType::Split),
    ]
    .into_iter()
    .map(|(p, t)| (Regex::new(p).unwrap(), t))
    .collect()
});

static CDS_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\sCDS\s*$").unwrap());

// (pattern, label) pairs checked against the raw folder name; first match wins.
static REISSUE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bremaster(?:ed)?\b", "Remastered"),
        (r"(?i)\bre-?issue(?:d)?\b", "Reissue"),
        (r"(?i)\banniversary\b", "Anniversary Edition"),
        (r"(?i)\bdeluxe\b", "Deluxe Edition"),
        (r"(?i)\bspecial\s+edition\b", "Special Edition"),
        (r"(?i)\blimited\s+edition\b", "Limited Edition"),
        (r"(?i)\bbonus\s+tracks?\b", "Bonus Tracks"),
    ]
    .into_iter()
    .map(|(p, label)| (Regex::new(p).unwrap(), label))
    .collect()
});

/// First bracketed 4-digit year in the name: "[1988] Title" → 1988.
pub fn parse_year(raw: &str) -> Option<i32> {
    YEAR_RE
        .captures(raw)
        .and_then(|c| c.name("year"))
        .and_then(|m| m.as_str().parse().ok())
}

/// True if the name starts with a bracketed year token.
pub fn starts_with_year(raw: &str) -> bool {
    YEAR_RE.find(raw.trim_start()).is_some_and(|m| m.start() == 0)
}

/// Strip year, edition, format and bitrate noise from an album folder name.
pub fn format_release_name(raw: &str) -> String {
    let mut name = raw.to_string();
    for re in NOISE_PATTERNS.iter() {
        name = re.replace_all(&name, " ").into_owned();
    }
    WHITESPACE_RE.replace_all(&name, " ").trim().to_string()
}

/// Release type by priority cascade: dash suffix, parenthetical marker,
/// trailing " CDS", content words, then Album.
pub fn release_type(raw: &str) -> ReleaseType {
    if let Some(caps) = DASH_TYPE_RE.captures(raw) {
        return ReleaseType::from_dash_suffix(&caps["kind"]);
    }

    if let Some((_, kind)) = PAREN_TYPES.iter().find(|(re, _)| re.is_match(raw)) {
        return *kind;
    }

    if CDS_SUFFIX_RE.is_match(raw) {
        return ReleaseType::Single;
    }

    let lower = raw.to_lowercase();
    if lower.contains("demo") {
        return ReleaseType::Demo;
    }
    if lower.contains("live at") || lower.contains("live in") {
        return ReleaseType::Live;
    }
    if lower.contains("split with") {
        return ReleaseType::Split;
    }

    ReleaseType::Album
}

/// Label for the first remaster/reissue/edition marker in the raw name.
pub fn detect_reissue_tag(raw: &str) -> Option<&'static str> {
    REISSUE_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(raw))
        .map(|(_, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_parsing() {
        assert_eq!(parse_year("[1988] Battalions of Fear"), Some(1988));
        assert_eq!(parse_year("Battalions of Fear [1988]"), Some(1988));
        assert_eq!(parse_year("1988 Battalions of Fear"), None);
        assert_eq!(parse_year("[88] Short"), None);
        assert!(starts_with_year("[2001] Title"));
        assert!(!starts_with_year("Title [2001]"));
    }

    #[test]
    fn format_strips_year_and_lossless() {
        assert_eq!(
            format_release_name("[1988] Battalions of Fear (Lossless)"),
            "Battalions of Fear"
        );
        assert_eq!(format_release_name("[1988] Battalions of Fear"), "Battalions of Fear");
        assert_eq!(format_release_name("[2004] Ghost Reveries - Lossless"), "Ghost Reveries");
    }

    #[test]
    fn format_strips_edition_noise() {
        assert_eq!(format_release_name("[1995] Title (Remastered)"), "Title");
        assert_eq!(format_release_name("[1995] Title (2009 Remaster)"), "Title");
        assert_eq!(format_release_name("[1995] Title (Deluxe Edition)"), "Title");
        assert_eq!(format_release_name("[1995] Title (Limited Edition) (Digipak)"), "Title");
        assert_eq!(format_release_name("[1995] Title (Bonus Tracks)"), "Title");
        assert_eq!(format_release_name("[1995] Title (Box Set)"), "Title");
        assert_eq!(format_release_name("[1995] Title (Boxset)"), "Title");
        assert_eq!(format_release_name("[1995] Title (20th Anniversary Edition)"), "Title");
        assert_eq!(format_release_name("[1995] Title (Reissue 2003)"), "Title");
        assert_eq!(format_release_name("[1995] Title (Promo)"), "Title");
        assert_eq!(format_release_name("[1995] Title (Demo)"), "Title");
    }

    #[test]
    fn format_strips_bitrate_and_suffixes() {
        assert_eq!(format_release_name("[2001] Title - 320 kbps"), "Title");
        assert_eq!(format_release_name("[2001] Title (320kbps)"), "Title");
        assert_eq!(format_release_name("[2001] Title - EP"), "Title");
        assert_eq!(format_release_name("[2001] Title - Single"), "Title");
        assert_eq!(format_release_name("[2001] Title (CD2)"), "Title");
        assert_eq!(format_release_name("[2001] Title (Disc 1)"), "Title");
    }

    #[test]
    fn format_keeps_meaningful_text() {
        assert_eq!(format_release_name("[2001] Live at Wacken"), "Live at Wacken");
        assert_eq!(format_release_name("No Year   Here"), "No Year Here");
        assert_eq!(format_release_name("[2001] Title (EP)"), "Title (EP)");
    }

    #[test]
    fn release_type_dash_suffix() {
        assert_eq!(release_type("[2001] Title - EP"), ReleaseType::Ep);
        assert_eq!(release_type("[2001] Title - Single"), ReleaseType::Single);
        assert_eq!(release_type("[2001] Title - CDS"), ReleaseType::Single);
        assert_eq!(release_type("[2001] Title - Compilation"), ReleaseType::Compilation);
        assert_eq!(release_type("[2001] Title - Split (Lossless)"), ReleaseType::Split);
    }

    #[test]
    fn dash_suffix_outranks_content_heuristic() {
        assert_eq!(release_type("[1999] Demo Days - Live"), ReleaseType::Live);
    }

    #[test]
    fn unknown_dash_word_is_album() {
        assert_eq!(release_type("[1995] Demo Recordings - Remastered"), ReleaseType::Album);
        assert_eq!(release_type("[2003] Live in Oslo - Lossless"), ReleaseType::Album);
        assert_eq!(release_type("[2001] Title - live (Lossless)"), ReleaseType::Live);
    }

    #[test]
    fn release_type_parenthetical_priority() {
        assert_eq!(release_type("[2001] Title (EP)"), ReleaseType::Ep);
        assert_eq!(release_type("[2001] Title (Live) (Single)"), ReleaseType::Single);
        assert_eq!(release_type("[2001] Title (Compilation)"), ReleaseType::Compilation);
        assert_eq!(release_type("[2001] Title (Split)"), ReleaseType::Split);
    }

    #[test]
    fn release_type_cds_and_content() {
        assert_eq!(release_type("[2001] Title CDS"), ReleaseType::Single);
        assert_eq!(release_type("[1990] Rehearsal Demo Tape"), ReleaseType::Demo);
        assert_eq!(release_type("[2005] Live at Wacken"), ReleaseType::Live);
        assert_eq!(release_type("[2005] Live in Tokyo"), ReleaseType::Live);
        assert_eq!(release_type("[2005] Split with Darkthrone"), ReleaseType::Split);
        assert_eq!(release_type("[2005] Nightfall"), ReleaseType::Album);
    }

    #[test]
    fn reissue_tags() {
        assert_eq!(detect_reissue_tag("[2009] Title (Remastered)"), Some("Remastered"));
        assert_eq!(detect_reissue_tag("[2009] Title (Reissue 2009)"), Some("Reissue"));
        assert_eq!(
            detect_reissue_tag("[2012] Title (25th Anniversary Edition)"),
            Some("Anniversary Edition")
        );
        assert_eq!(detect_reissue_tag("[2012] Title (Deluxe)"), Some("Deluxe Edition"));
        assert_eq!(detect_reissue_tag("[2012] Title (Limited Edition)"), Some("Limited Edition"));
        assert_eq!(detect_reissue_tag("[2012] Title (Bonus Tracks)"), Some("Bonus Tracks"));
        assert_eq!(detect_reissue_tag("[2012] Title"), None);
    }

    #[test]
    fn reissue_first_pattern_wins() {
        assert_eq!(
            detect_reissue_tag("[2012] Title (Deluxe Remastered)"),
            Some("Remastered")
        );
    }
}
