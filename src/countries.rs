use std::collections::HashMap;
use std::sync::LazyLock;

/// A country entry: display name and lowercase ISO 3166-1 alpha-2 code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Country {
    pub name: &'static str,
    pub iso: &'static str,
}

/// Folder-name country abbreviations (metal-archives style, not ISO).
/// Keys are matched case-sensitively first, see `lookup`.
const COUNTRY_TABLE: &[(&str, &str, &str)] = &[
    ("Arg", "Argentina", "ar"),
    ("Aus", "Australia", "au"),
    ("Aut", "Austria", "at"),
    ("Bel", "Belgium", "be"),
    ("Blr", "Belarus", "by"),
    ("Bra", "Brazil", "br"),
    ("Bul", "Bulgaria", "bg"),
    ("Can", "Canada", "ca"),
    ("Chl", "Chile", "cl"),
    ("Chn", "China", "cn"),
    ("Col", "Colombia", "co"),
    ("Cro", "Croatia", "hr"),
    ("Cub", "Cuba", "cu"),
    ("Cyp", "Cyprus", "cy"),
    ("Cze", "Czech Republic", "cz"),
    ("Den", "Denmark", "dk"),
    ("Egy", "Egypt", "eg"),
    ("Eng", "England", "gb"),
    ("Est", "Estonia", "ee"),
    ("Far", "Faroe Islands", "fo"),
    ("Fin", "Finland", "fi"),
    ("Fra", "France", "fr"),
    ("Geo", "Georgia", "ge"),
    ("Ger", "Germany", "de"),
    ("Gre", "Greece", "gr"),
    ("Hol", "Netherlands", "nl"),
    ("Hun", "Hungary", "hu"),
    ("Ice", "Iceland", "is"),
    ("Ind", "India", "in"),
    ("Ire", "Ireland", "ie"),
    ("Irn", "Iran", "ir"),
    ("Isr", "Israel", "il"),
    ("Ita", "Italy", "it"),
    ("Jap", "Japan", "jp"),
    ("Jpn", "Japan", "jp"),
    ("Kaz", "Kazakhstan", "kz"),
    ("Kor", "South Korea", "kr"),
    ("Lat", "Latvia", "lv"),
    ("Leb", "Lebanon", "lb"),
    ("Lit", "Lithuania", "lt"),
    ("Lux", "Luxembourg", "lu"),
    ("Mal", "Malta", "mt"),
    ("Mex", "Mexico", "mx"),
    ("Mol", "Moldova", "md"),
    ("Mon", "Mongolia", "mn"),
    ("NZ", "New Zealand", "nz"),
    ("Ned", "Netherlands", "nl"),
    ("Nor", "Norway", "no"),
    ("Per", "Peru", "pe"),
    ("Phi", "Philippines", "ph"),
    ("Pol", "Poland", "pl"),
    ("Por", "Portugal", "pt"),
    ("Rom", "Romania", "ro"),
    ("Rus", "Russia", "ru"),
    ("SA", "South Africa", "za"),
    ("Sco", "Scotland", "gb"),
    ("Ser", "Serbia", "rs"),
    ("Sin", "Singapore", "sg"),
    ("Slo", "Slovenia", "si"),
    ("Spa", "Spain", "es"),
    ("Sui", "Switzerland", "ch"),
    ("Svk", "Slovakia", "sk"),
    ("Swe", "Sweden", "se"),
    ("Swi", "Switzerland", "ch"),
    ("Tai", "Taiwan", "tw"),
    ("Tha", "Thailand", "th"),
    ("Tur", "Turkey", "tr"),
    ("UK", "United Kingdom", "gb"),
    ("US", "United States", "us"),
    ("USA", "United States", "us"),
    ("Ukr", "Ukraine", "ua"),
    ("Uru", "Uruguay", "uy"),
    ("Ven", "Venezuela", "ve"),
    ("Wal", "Wales", "gb"),
];

/// Tokens that look like a 2-3 letter country code but are media, format,
/// release-type or genre markers. Compared case-insensitively.
const FALSE_POSITIVES: &[&str] = &[
    "ep", "lp", "cd", "cds", "dvd", "mp3", "aac", "ogg", "wav", "hd", "web", "rip",
    "live", "demo", "split", "single", "promo", "box", "bonus", "vinyl", "tape",
    "mix", "remix", "dub", "edit", "vol", "va", "ost", "bsd",
    "pop", "rap", "ska", "emo", "rnb", "dnb", "idm", "edm", "ebm", "psy", "goa",
    "jazz", "soul", "funk", "folk", "punk", "rock", "metal", "techno", "house",
    "trance", "ambient", "noise",
];

/// Separators for multi-country codes like "Aut-UK" or "Swe&Nor".
const MULTI_SEPARATORS: &[char] = &['-', '&'];

static COUNTRIES: LazyLock<HashMap<&'static str, Country>> = LazyLock::new(|| {
    COUNTRY_TABLE
        .iter()
        .map(|&(code, name, iso)| (code, Country { name, iso }))
        .collect()
});

/// Capitalize the first letter and lowercase the rest: "GER" → "Ger".
fn capitalize(code: &str) -> String {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Single-code lookup: exact, then capitalized, then uppercase. First hit wins.
fn lookup(code: &str) -> Option<Country> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    COUNTRIES
        .get(code)
        .or_else(|| COUNTRIES.get(capitalize(code).as_str()))
        .or_else(|| COUNTRIES.get(code.to_uppercase().as_str()))
        .copied()
}

fn split_codes(code: &str) -> impl Iterator<Item = &str> {
    code.split(MULTI_SEPARATORS)
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

/// True if `value` is a media/format/genre token that must never be read as a country.
pub fn is_false_positive(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    FALSE_POSITIVES.contains(&lower.as_str())
}

/// Resolve a (possibly multi-country) code to its display name.
///
/// Multi codes resolve each part independently, drop the unresolved parts
/// and join the rest with " / ". Returns `None` when nothing resolves.
pub fn resolve_country(code: &str) -> Option<String> {
    let names: Vec<&str> = split_codes(code)
        .filter_map(lookup)
        .map(|c| c.name)
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(" / "))
    }
}

/// Resolve a (possibly multi-country) code to ISO codes, unresolved parts dropped.
pub fn resolve_iso_codes(code: &str) -> Vec<&'static str> {
    split_codes(code).filter_map(lookup).map(|c| c.iso).collect()
}

/// A single code counts as a country only if it is not a false positive
/// and resolves through the table.
pub fn is_country_code(value: &str) -> bool {
    !is_false_positive(value) && lookup(value).is_some()
}
