use regex::Regex;
use std::sync::LazyLock;

use crate::countries;
use crate::names::artist::{MULTI_COUNTRY_RE, SINGLE_COUNTRY_RE};
use crate::names::release::starts_with_year;
use crate::tree::FolderNode;
use crate::ARTIFACT_EXTENSIONS;

/// Default share of year-prefixed children that marks a folder as an artist.
pub const DEFAULT_YEAR_CHILD_RATIO: f64 = 0.3;

/// Role of the folder that contains the node being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRole {
    Genre,
    Subgenre,
    Artist,
    Compilation,
}

/// What a folder turns out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Subgenre,
    Artist,
    Compilation,
    Album,
    Ignore,
}

/// Outcome plus the name of the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub kind: NodeKind,
    pub rule: &'static str,
}

/// The node under inspection.
struct Candidate<'a> {
    name: &'a str,
    children: &'a FolderNode,
    parent: ParentRole,
    year_child_ratio: f64,
}

struct Rule {
    name: &'static str,
    outcome: NodeKind,
    applies: fn(&Candidate) -> bool,
}

// "- VA - Title", "- Various Artists - Title"
static VA_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*-\s*(?:VA\s*-|Various Artists)").unwrap());

// Strips the marker (and the dash that follows it) for display names.
static VA_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*-\s*(?:VA|Various Artists)\s*(?:-\s*)?").unwrap());

// "Name (Ger) (early)"
static CODE_THEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((?P<code>\w{2,3})\)\s*\([^()]+\)\s*$").unwrap()
});

// "Name (side project) (Ger)"
static DESCRIPTION_THEN_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^()]+\)\s*\((?P<code>\w{2,3})\)\s*$").unwrap()
});

/// Evaluated top to bottom; the first rule that applies decides.
const RULES: &[Rule] = &[
    Rule {
        name: "inside-artist",
        outcome: NodeKind::Album,
        applies: inside_artist,
    },
    Rule {
        name: "various-artists-prefix",
        outcome: NodeKind::Compilation,
        applies: |c| is_compilation_name(c.name),
    },
    Rule {
        name: "artifact-extension",
        outcome: NodeKind::Ignore,
        applies: |c| has_artifact_extension(c.name),
    },
    Rule {
        name: "country-code",
        outcome: NodeKind::Artist,
        applies: lone_country_code,
    },
    Rule {
        name: "country-code-then-tag",
        outcome: NodeKind::Artist,
        applies: country_code_then_tag,
    },
    // Shape only: the codes are not validated.
    Rule {
        name: "multi-country-code",
        outcome: NodeKind::Artist,
        applies: multi_country_code,
    },
    Rule {
        name: "description-then-country-code",
        outcome: NodeKind::Artist,
        applies: description_then_country_code,
    },
    Rule {
        name: "year-prefixed-children",
        outcome: NodeKind::Artist,
        applies: |c| has_year_children(c.children, c.year_child_ratio),
    },
];

fn inside_artist(c: &Candidate) -> bool {
    matches!(c.parent, ParentRole::Artist | ParentRole::Compilation)
}

// "Name (desc) (Ger)" is left to the description rule, which decides the same way.
fn lone_country_code(c: &Candidate) -> bool {
    !DESCRIPTION_THEN_CODE_RE.is_match(c.name)
        && captured_code(&SINGLE_COUNTRY_RE, c.name).is_some_and(countries::is_country_code)
}

fn country_code_then_tag(c: &Candidate) -> bool {
    captured_code(&CODE_THEN_TAG_RE, c.name).is_some_and(countries::is_country_code)
}

fn multi_country_code(c: &Candidate) -> bool {
    MULTI_COUNTRY_RE.is_match(c.name)
}

fn description_then_country_code(c: &Candidate) -> bool {
    captured_code(&DESCRIPTION_THEN_CODE_RE, c.name).is_some_and(countries::is_country_code)
}

/// Node classifier with a tunable year-prefix threshold.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    pub year_child_ratio: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            year_child_ratio: DEFAULT_YEAR_CHILD_RATIO,
        }
    }
}

impl Classifier {
    pub fn new(year_child_ratio: f64) -> Self {
        Self { year_child_ratio }
    }

    pub fn classify(&self, name: &str, children: &FolderNode, parent: ParentRole) -> NodeKind {
        self.explain(name, children, parent).kind
    }

    /// Like `classify`, but also reports which rule fired.
    pub fn explain(&self, name: &str, children: &FolderNode, parent: ParentRole) -> Decision {
        let candidate = Candidate {
            name,
            children,
            parent,
            year_child_ratio: self.year_child_ratio,
        };

        if let Some(rule) = RULES.iter().find(|rule| (rule.applies)(&candidate)) {
            return Decision {
                kind: rule.outcome,
                rule: rule.name,
            };
        }

        // Empty leaf folders carry no entities
        if children.is_empty() {
            Decision {
                kind: NodeKind::Ignore,
                rule: "empty-leaf",
            }
        } else {
            Decision {
                kind: NodeKind::Subgenre,
                rule: "has-children",
            }
        }
    }
}

/// Classify with the default threshold.
pub fn classify_node(name: &str, children: &FolderNode, parent: ParentRole) -> NodeKind {
    Classifier::default().classify(name, children, parent)
}

/// Rule-reporting variant of `classify_node`.
pub fn explain_node(name: &str, children: &FolderNode, parent: ParentRole) -> Decision {
    Classifier::default().explain(name, children, parent)
}

pub fn is_compilation_name(name: &str) -> bool {
    VA_PREFIX_RE.is_match(name)
}

/// Remove only the leading VA marker: "- VA - Metal [2005]" → "Metal [2005]".
pub fn strip_compilation_prefix(name: &str) -> String {
    VA_STRIP_RE.replace(name, "").trim().to_string()
}

fn has_artifact_extension(name: &str) -> bool {
    let lower = name.trim_end().to_lowercase();
    match lower.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ARTIFACT_EXTENSIONS.contains(&ext),
        _ => false,
    }
}

fn captured_code<'a>(re: &Regex, name: &'a str) -> Option<&'a str> {
    re.captures(name)
        .and_then(|caps| caps.name("code"))
        .map(|m| m.as_str())
}

fn has_year_children(children: &FolderNode, ratio: f64) -> bool {
    if children.is_empty() {
        return false;
    }
    let with_year = children.names().filter(|n| starts_with_year(n)).count();
    with_year > 0 && (with_year as f64 / children.len() as f64) >= ratio
}
