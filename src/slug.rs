use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fallback slug for names that contain no ASCII letters or digits.
const EMPTY_SLUG_FALLBACK: &str = "untitled";

/// Normalize a display name into a URL-safe identifier.
///
/// NFKD-decomposes, drops combining marks (diacritics), lowercases, and
/// collapses every run of non-`[a-z0-9]` characters into one hyphen.
/// Leading and trailing hyphens are trimmed. Idempotent.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// A run-scoped slug namespace. Reserving is first-come, first-served:
/// the first entity asking for a slug keeps the bare form.
#[derive(Debug, Default)]
pub struct SlugSet {
    taken: HashSet<String>,
}

impl SlugSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.taken.contains(slug)
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    /// Reserve and return a slug for `text` (or `"<text>-<suffix>"`).
    /// On collision appends `-2`, `-3`, … until a free slug is found.
    pub fn unique_slug(&mut self, text: &str, suffix: Option<&str>) -> String {
        let mut base = match suffix {
            Some(suffix) => slugify(&format!("{text}-{suffix}")),
            None => slugify(text),
        };
        if base.is_empty() {
            base = EMPTY_SLUG_FALLBACK.to_string();
        }

        if self.taken.insert(base.clone()) {
            return base;
        }

        let mut n = 2u32;
        loop {
            let candidate = format!("{base}-{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// The two global namespaces of one catalog run: artists share theirs with
/// compilations, albums have a library-wide one.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    pub artists: SlugSet,
    pub albums: SlugSet,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}
