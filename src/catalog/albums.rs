use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::models::Album;
use crate::names::{self, ReleaseType};
use crate::slug::{SlugSet, slugify};
use crate::tree::FolderNode;

/// Sort key for albums without a year: after everything dated.
const MISSING_YEAR_SORT: i32 = 9999;

// Disc/medium subfolders: "CD1", "Disc 2", "Book 3"
static DISC_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:cd|disc|book)\s*\d+").unwrap());

/// An album folder before dedup and slug assignment.
#[derive(Debug, Clone)]
struct RawAlbum {
    name: String,
    year: Option<i32>,
    release_type: ReleaseType,
    reissue: Option<String>,
    has_multiple_discs: bool,
    disc_count: u32,
    raw_folder_name: String,
}

fn read_album(raw: &str, node: &FolderNode) -> RawAlbum {
    let mut name = names::format_release_name(raw);
    if name.is_empty() {
        name = raw.trim().to_string();
    }

    let discs = node.names().filter(|n| DISC_DIR_RE.is_match(n)).count() as u32;
    let has_multiple_discs = discs >= 2;

    RawAlbum {
        name,
        year: names::parse_year(raw),
        release_type: names::release_type(raw),
        reissue: names::detect_reissue_tag(raw).map(str::to_string),
        has_multiple_discs,
        disc_count: if has_multiple_discs { discs } else { 1 },
        raw_folder_name: raw.to_string(),
    }
}

/// Drop same-name same-year duplicates (format rips of one release) and tag
/// same-name different-year entries as reissues. Input must be year-sorted.
fn dedupe(albums: Vec<RawAlbum>) -> Vec<RawAlbum> {
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut seen_releases: HashSet<(String, Option<i32>)> = HashSet::new();
    let mut kept = Vec::with_capacity(albums.len());

    for mut album in albums {
        if !seen_releases.insert((album.name.clone(), album.year)) {
            log::debug!("Dropping format duplicate {:?}", album.raw_folder_name);
            continue;
        }
        if !seen_names.insert(album.name.clone()) && album.reissue.is_none() {
            album.reissue = Some("Reissue".to_string());
        }
        kept.push(album);
    }

    kept
}

/// Extract the albums of an artist or compilation folder.
///
/// Albums are ordered by year (undated last), deduplicated by formatted
/// name, then given slugs from the library-wide `album_slugs` set: bare name
/// first, name plus year on collision, numeric suffix after that.
pub fn extract_albums(node: &FolderNode, album_slugs: &mut SlugSet) -> Vec<Album> {
    let mut raw: Vec<RawAlbum> = node
        .children()
        .iter()
        .map(|(name, child)| read_album(name, child))
        .collect();
    raw.sort_by_key(|a| a.year.unwrap_or(MISSING_YEAR_SORT));

    dedupe(raw)
        .into_iter()
        .map(|a| {
            let year = a.year.map(|y| y.to_string());
            let slug = if album_slugs.contains(&slugify(&a.name)) {
                album_slugs.unique_slug(&a.name, year.as_deref())
            } else {
                album_slugs.unique_slug(&a.name, None)
            };
            Album {
                name: a.name,
                slug,
                year: a.year,
                release_type: a.release_type,
                reissue: a.reissue,
                has_multiple_discs: a.has_multiple_discs,
                disc_count: a.disc_count,
                raw_folder_name: a.raw_folder_name,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(names: &[&str]) -> Vec<Album> {
        extract_albums(&FolderNode::from_names(names), &mut SlugSet::new())
    }

    #[test]
    fn lossless_duplicate_is_dropped() {
        let albums = extract(&[
            "[1988] Battalions of Fear",
            "[1988] Battalions of Fear (Lossless)",
        ]);
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].name, "Battalions of Fear");
        assert_eq!(albums[0].year, Some(1988));
        assert_eq!(albums[0].raw_folder_name, "[1988] Battalions of Fear");
        assert_eq!(albums[0].reissue, None);
    }

    #[test]
    fn different_year_is_tagged_reissue() {
        let albums = extract(&["[2010] Nightfall", "[1990] Nightfall"]);
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].year, Some(1990));
        assert_eq!(albums[0].reissue, None);
        assert_eq!(albums[0].slug, "nightfall");
        assert_eq!(albums[1].year, Some(2010));
        assert_eq!(albums[1].reissue.as_deref(), Some("Reissue"));
        assert_eq!(albums[1].slug, "nightfall-2010");
    }

    #[test]
    fn existing_reissue_label_is_kept() {
        let albums = extract(&["[1990] Nightfall", "[2007] Nightfall (Remastered)"]);
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[1].name, "Nightfall");
        assert_eq!(albums[1].reissue.as_deref(), Some("Remastered"));
    }

    #[test]
    fn sorted_by_year_with_undated_last() {
        let albums = extract(&["Rarities", "[2003] B", "[1999] A"]);
        let names: Vec<_> = albums.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "Rarities"]);
        assert_eq!(albums[2].year, None);
    }

    #[test]
    fn release_type_and_reissue_detection() {
        let albums = extract(&["[2001] Promo Songs - EP", "[2011] Title (Deluxe Edition)"]);
        assert_eq!(albums[0].release_type, ReleaseType::Ep);
        assert_eq!(albums[0].name, "Promo Songs");
        assert_eq!(albums[1].release_type, ReleaseType::Album);
        assert_eq!(albums[1].reissue.as_deref(), Some("Deluxe Edition"));
    }

    #[test]
    fn multi_disc_detection() {
        let node = FolderNode::new(vec![
            (
                "[1999] Double".to_string(),
                FolderNode::from_names(&["CD1", "CD 2", "Scans"]),
            ),
            ("[2000] Single Disc".to_string(), FolderNode::from_names(&["Disc 1"])),
            (
                "[2001] Box".to_string(),
                FolderNode::from_names(&["Book 1", "Book 2", "Book 3"]),
            ),
        ]);
        let albums = extract_albums(&node, &mut SlugSet::new());
        assert!(albums[0].has_multiple_discs);
        assert_eq!(albums[0].disc_count, 2);
        assert!(!albums[1].has_multiple_discs);
        assert_eq!(albums[1].disc_count, 1);
        assert_eq!(albums[2].disc_count, 3);
    }

    #[test]
    fn album_slugs_are_global() {
        let mut slugs = SlugSet::new();
        let first = extract_albums(&FolderNode::from_names(&["[1994] Greatest Hits"]), &mut slugs);
        let second = extract_albums(&FolderNode::from_names(&["[2001] Greatest Hits"]), &mut slugs);
        let third = extract_albums(&FolderNode::from_names(&["[2001] Greatest Hits"]), &mut slugs);
        let undated = extract_albums(&FolderNode::from_names(&["Greatest Hits"]), &mut slugs);
        assert_eq!(first[0].slug, "greatest-hits");
        assert_eq!(second[0].slug, "greatest-hits-2001");
        assert_eq!(third[0].slug, "greatest-hits-2001-2");
        assert_eq!(undated[0].slug, "greatest-hits-2");
    }

    #[test]
    fn format_duplicate_of_a_reissue_is_dropped() {
        let albums = extract(&["[1990] X", "[2000] X", "[2000] X (Lossless)"]);
        let pairs: Vec<_> = albums
            .iter()
            .map(|a| (a.year, a.reissue.as_deref()))
            .collect();
        assert_eq!(pairs, vec![(Some(1990), None), (Some(2000), Some("Reissue"))]);
    }

    #[test]
    fn year_only_folder_keeps_raw_name() {
        let albums = extract(&["[1997]"]);
        assert_eq!(albums[0].name, "[1997]");
        assert_eq!(albums[0].year, Some(1997));
    }
}
