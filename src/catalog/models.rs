use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::names::ReleaseType;

/// One release folder of an artist or compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub name: String,
    pub slug: String,
    pub year: Option<i32>,
    #[serde(rename = "type")]
    pub release_type: ReleaseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reissue: Option<String>,
    pub has_multiple_discs: bool,
    pub disc_count: u32,
    pub raw_folder_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub iso_codes: Vec<String>,
    pub tags: Vec<String>,
    pub genre_path: Vec<String>,
    pub albums: Vec<Album>,
    pub raw_folder_name: String,
}

/// A "various artists" release folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compilation {
    pub name: String,
    pub slug: String,
    pub genre_path: Vec<String>,
    pub albums: Vec<Album>,
    pub raw_folder_name: String,
}

/// Contents shared by genres and subgenres.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub subgenres: Vec<Subgenre>,
    pub artists: Vec<Artist>,
    pub compilations: Vec<Compilation>,
}

impl Branch {
    pub fn is_empty(&self) -> bool {
        self.subgenres.is_empty() && self.artists.is_empty() && self.compilations.is_empty()
    }

    /// Artists and compilations of this branch and every nested subgenre.
    pub fn owners(&self) -> Vec<Owner<'_>> {
        let mut out = Vec::new();
        self.collect_owners(&mut out);
        out
    }

    fn collect_owners<'a>(&'a self, out: &mut Vec<Owner<'a>>) {
        out.extend(self.artists.iter().map(Owner::Artist));
        out.extend(self.compilations.iter().map(Owner::Compilation));
        for sub in &self.subgenres {
            sub.branch.collect_owners(out);
        }
    }

    fn subgenre_count(&self) -> usize {
        self.subgenres
            .iter()
            .map(|s| 1 + s.branch.subgenre_count())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subgenre {
    pub name: String,
    pub slug: String,
    /// Ancestor names from the library root, this subgenre included.
    pub full_path: Vec<String>,
    #[serde(flatten)]
    pub branch: Branch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub name: String,
    pub slug: String,
    #[serde(flatten)]
    pub branch: Branch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub total_genres: usize,
    pub total_subgenres: usize,
    pub total_artists: usize,
    pub total_compilations: usize,
    pub total_albums: usize,
    /// Distinct ISO country codes across artists.
    pub total_countries: usize,
    pub generated_at: DateTime<Utc>,
}

impl LibraryStats {
    pub fn compute(genres: &[Genre], generated_at: DateTime<Utc>) -> Self {
        let mut stats = LibraryStats {
            total_genres: genres.len(),
            total_subgenres: 0,
            total_artists: 0,
            total_compilations: 0,
            total_albums: 0,
            total_countries: 0,
            generated_at,
        };
        let mut countries = BTreeSet::new();

        for genre in genres {
            stats.total_subgenres += genre.branch.subgenre_count();
            for owner in genre.branch.owners() {
                match owner {
                    Owner::Artist(a) => {
                        stats.total_artists += 1;
                        countries.extend(a.iso_codes.iter().map(String::as_str));
                    }
                    Owner::Compilation(_) => stats.total_compilations += 1,
                }
                stats.total_albums += owner.albums().len();
            }
        }

        stats.total_countries = countries.len();
        stats
    }
}

/// The catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicLibrary {
    pub genres: Vec<Genre>,
    pub stats: LibraryStats,
}

/// Either kind of album owner; both share the artist slug namespace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Owner<'a> {
    Artist(&'a Artist),
    Compilation(&'a Compilation),
}

impl<'a> Owner<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Owner::Artist(a) => &a.name,
            Owner::Compilation(c) => &c.name,
        }
    }

    pub fn slug(&self) -> &'a str {
        match self {
            Owner::Artist(a) => &a.slug,
            Owner::Compilation(c) => &c.slug,
        }
    }

    pub fn genre_path(&self) -> &'a [String] {
        match self {
            Owner::Artist(a) => &a.genre_path,
            Owner::Compilation(c) => &c.genre_path,
        }
    }

    pub fn albums(&self) -> &'a [Album] {
        match self {
            Owner::Artist(a) => &a.albums,
            Owner::Compilation(c) => &c.albums,
        }
    }

    pub fn is_compilation(&self) -> bool {
        matches!(self, Owner::Compilation(_))
    }
}

impl MusicLibrary {
    /// Every artist and compilation in catalog order.
    pub fn owners(&self) -> Vec<Owner<'_>> {
        self.genres.iter().flat_map(|g| g.branch.owners()).collect()
    }

    /// Follow a genre slug path ("metal", "black-metal", …) to its contents.
    pub fn find_genre_path(&self, slugs: &[&str]) -> Option<&Branch> {
        let (first, rest) = slugs.split_first()?;
        let genre = self.genres.iter().find(|g| g.slug == *first)?;
        let mut branch = &genre.branch;
        for slug in rest {
            branch = &branch.subgenres.iter().find(|s| s.slug == *slug)?.branch;
        }
        Some(branch)
    }

    pub fn find_artist(&self, slug: &str) -> Option<Owner<'_>> {
        self.owners().into_iter().find(|o| o.slug() == slug)
    }

    pub fn find_album(&self, artist_slug: &str, album_slug: &str) -> Option<(Owner<'_>, &Album)> {
        let owner = self.find_artist(artist_slug)?;
        let album = owner.albums().iter().find(|a| a.slug == album_slug)?;
        Some((owner, album))
    }

    /// `(owner, album)` pairs, the unit downstream art and metadata jobs key on.
    pub fn album_pairs(&self) -> Vec<(Owner<'_>, &Album)> {
        self.owners()
            .into_iter()
            .flat_map(|o| o.albums().iter().map(move |a| (o, a)))
            .collect()
    }
}
