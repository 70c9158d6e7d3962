use serde::{Deserialize, Serialize};

use super::models::{Branch, MusicLibrary, Owner};
use crate::names::ReleaseType;

/// One row of the flattened client-side search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchEntry {
    #[serde(rename_all = "camelCase")]
    Genre {
        name: String,
        slug: String,
        url: String,
        genre_path: Vec<String>,
        artist_count: usize,
    },
    #[serde(rename_all = "camelCase")]
    Artist {
        name: String,
        slug: String,
        url: String,
        genre_path: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        country: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        country_code: Option<String>,
        #[serde(default)]
        tags: Vec<String>,
        album_count: usize,
        compilation: bool,
    },
    #[serde(rename_all = "camelCase")]
    Album {
        name: String,
        slug: String,
        url: String,
        genre_path: Vec<String>,
        artist_name: String,
        artist_slug: String,
        year: Option<i32>,
        release_type: ReleaseType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reissue: Option<String>,
    },
}

impl SearchEntry {
    pub fn url(&self) -> &str {
        match self {
            SearchEntry::Genre { url, .. }
            | SearchEntry::Artist { url, .. }
            | SearchEntry::Album { url, .. } => url,
        }
    }
}

pub fn genre_url(slug_path: &[String]) -> String {
    format!("/genre/{}", slug_path.join("/"))
}

pub fn artist_url(artist_slug: &str) -> String {
    format!("/artist/{artist_slug}")
}

pub fn album_url(artist_slug: &str, album_slug: &str) -> String {
    format!("/artist/{artist_slug}/{album_slug}")
}

/// Flatten the catalog: each genre level, then its artists/compilations
/// each followed by their albums, then nested subgenres.
pub fn build_search_index(library: &MusicLibrary) -> Vec<SearchEntry> {
    let mut entries = Vec::new();
    for genre in &library.genres {
        let names = vec![genre.name.clone()];
        let slugs = vec![genre.slug.clone()];
        push_level(&mut entries, &genre.name, &genre.slug, &genre.branch, names, slugs);
    }
    entries
}

fn push_level(
    entries: &mut Vec<SearchEntry>,
    name: &str,
    slug: &str,
    branch: &Branch,
    names: Vec<String>,
    slugs: Vec<String>,
) {
    entries.push(SearchEntry::Genre {
        name: name.to_string(),
        slug: slug.to_string(),
        url: genre_url(&slugs),
        genre_path: names.clone(),
        artist_count: branch.owners().len(),
    });

    let owners = branch
        .artists
        .iter()
        .map(Owner::Artist)
        .chain(branch.compilations.iter().map(Owner::Compilation));
    for owner in owners {
        push_owner(entries, owner);
    }

    for sub in &branch.subgenres {
        let mut sub_slugs = slugs.clone();
        sub_slugs.push(sub.slug.clone());
        push_level(entries, &sub.name, &sub.slug, &sub.branch, sub.full_path.clone(), sub_slugs);
    }
}

fn push_owner(entries: &mut Vec<SearchEntry>, owner: Owner<'_>) {
    let (country, country_code, tags) = match owner {
        Owner::Artist(a) => (a.country.clone(), a.country_code.clone(), a.tags.clone()),
        Owner::Compilation(_) => (None, None, Vec::new()),
    };

    entries.push(SearchEntry::Artist {
        name: owner.name().to_string(),
        slug: owner.slug().to_string(),
        url: artist_url(owner.slug()),
        genre_path: owner.genre_path().to_vec(),
        country,
        country_code,
        tags,
        album_count: owner.albums().len(),
        compilation: owner.is_compilation(),
    });

    for album in owner.albums() {
        entries.push(SearchEntry::Album {
            name: album.name.clone(),
            slug: album.slug.clone(),
            url: album_url(owner.slug(), &album.slug),
            genre_path: owner.genre_path().to_vec(),
            artist_name: owner.name().to_string(),
            artist_slug: owner.slug().to_string(),
            year: album.year,
            release_type: album.release_type,
            reissue: album.reissue.clone(),
        });
    }
}
