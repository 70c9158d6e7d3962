pub mod albums;
pub mod models;
pub mod search;

use std::path::Path;

use chrono::Utc;
use thiserror::Error;

use crate::classify::{Classifier, NodeKind, ParentRole, strip_compilation_prefix};
use crate::config::CatalogConfig;
use crate::countries;
use crate::names::parse_artist_name;
use crate::slug::{SlugRegistry, SlugSet};
use crate::tree::FolderNode;
use models::{Artist, Branch, Compilation, Genre, LibraryStats, MusicLibrary, Subgenre};
use search::SearchEntry;

pub const CATALOG_FILE: &str = "catalog.json";
pub const SEARCH_INDEX_FILE: &str = "search-index.json";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Root key {0:?} not found in folder tree")]
    MissingRoot(String),
    #[error("Folder tree root is not a JSON object")]
    NotAnObject,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// One catalog run. Owns the run-scoped slug namespaces, so every run
/// starts from empty sets and the same tree always gets the same slugs.
pub struct CatalogBuilder {
    classifier: Classifier,
    ignored_genres: Vec<String>,
    slugs: SlugRegistry,
}

impl CatalogBuilder {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            classifier: Classifier::new(config.year_child_ratio),
            ignored_genres: config.ignored_genres.clone(),
            slugs: SlugRegistry::new(),
        }
    }

    /// Walk the tree below the root key and assemble the catalog.
    pub fn build(mut self, root: &FolderNode) -> MusicLibrary {
        let mut genre_nodes: Vec<&(String, FolderNode)> = root
            .children()
            .iter()
            .filter(|(name, _)| {
                let ignored = self.ignored_genres.iter().any(|i| i == name);
                if ignored {
                    log::debug!("Skipping ignored top-level folder {name:?}");
                }
                !ignored
            })
            .collect();
        // Sorted before walking so slug assignment does not depend on input order
        genre_nodes.sort_by(|(a, _), (b, _)| {
            a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b))
        });

        let mut genre_slugs = SlugSet::new();
        let genres: Vec<Genre> = genre_nodes
            .into_iter()
            .map(|(name, node)| {
                let path = vec![name.clone()];
                let branch = self.walk(node, ParentRole::Genre, &path);
                Genre {
                    name: name.clone(),
                    slug: genre_slugs.unique_slug(name, None),
                    branch,
                }
            })
            .collect();

        let stats = LibraryStats::compute(&genres, Utc::now());
        log::info!(
            "Catalog built: {} genres, {} subgenres, {} artists, {} compilations, {} albums",
            stats.total_genres,
            stats.total_subgenres,
            stats.total_artists,
            stats.total_compilations,
            stats.total_albums
        );

        MusicLibrary { genres, stats }
    }

    /// Classify each child of a genre or subgenre folder.
    fn walk(&mut self, node: &FolderNode, role: ParentRole, genre_path: &[String]) -> Branch {
        let mut branch = Branch::default();
        let mut sibling_slugs = SlugSet::new();

        for (name, child) in node.children() {
            let decision = self.classifier.explain(name, child, role);
            log::debug!(
                "{}/{}: {:?} ({})",
                genre_path.join("/"),
                name,
                decision.kind,
                decision.rule
            );

            match decision.kind {
                NodeKind::Artist => {
                    let artist = self.build_artist(name, child, genre_path);
                    branch.artists.push(artist);
                }
                NodeKind::Compilation => {
                    let compilation = self.build_compilation(name, child, genre_path);
                    branch.compilations.push(compilation);
                }
                NodeKind::Subgenre => {
                    let mut full_path = genre_path.to_vec();
                    full_path.push(name.trim().to_string());
                    let sub_branch = self.walk(child, ParentRole::Subgenre, &full_path);
                    if sub_branch.is_empty() {
                        log::debug!("Pruning empty subgenre {}", full_path.join("/"));
                        continue;
                    }
                    branch.subgenres.push(Subgenre {
                        name: name.trim().to_string(),
                        slug: sibling_slugs.unique_slug(name, None),
                        full_path,
                        branch: sub_branch,
                    });
                }
                NodeKind::Album => {
                    log::warn!("Unexpected album folder {name:?} outside an artist");
                }
                NodeKind::Ignore => {}
            }
        }

        branch
    }

    fn build_artist(&mut self, raw: &str, node: &FolderNode, genre_path: &[String]) -> Artist {
        let parsed = parse_artist_name(raw);
        let slug = self
            .slugs
            .artists
            .unique_slug(&parsed.name, parsed.country_code.as_deref());
        let iso_codes = parsed
            .country_code
            .as_deref()
            .map(countries::resolve_iso_codes)
            .unwrap_or_default()
            .into_iter()
            .map(str::to_string)
            .collect();

        Artist {
            name: parsed.name,
            slug,
            country_code: parsed.country_code,
            country: parsed.country,
            iso_codes,
            tags: parsed.tags,
            genre_path: genre_path.to_vec(),
            albums: albums::extract_albums(node, &mut self.slugs.albums),
            raw_folder_name: raw.to_string(),
        }
    }

    fn build_compilation(
        &mut self,
        raw: &str,
        node: &FolderNode,
        genre_path: &[String],
    ) -> Compilation {
        let name = strip_compilation_prefix(raw);
        let slug = self.slugs.artists.unique_slug(&name, None);

        Compilation {
            name,
            slug,
            genre_path: genre_path.to_vec(),
            albums: albums::extract_albums(node, &mut self.slugs.albums),
            raw_folder_name: raw.to_string(),
        }
    }
}

/// Run the whole pipeline over an already-loaded tree.
pub fn build_library(root: &FolderNode, config: &CatalogConfig) -> MusicLibrary {
    CatalogBuilder::new(config).build(root)
}

/// Write `catalog.json` and `search-index.json` into `dir`.
pub fn write_outputs(library: &MusicLibrary, index: &[SearchEntry], dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| CatalogError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    write_json(&dir.join(CATALOG_FILE), library)?;
    write_json(&dir.join(SEARCH_INDEX_FILE), index)?;
    Ok(())
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Read a previously written catalog document.
pub fn load_library(path: &Path) -> Result<MusicLibrary> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}
