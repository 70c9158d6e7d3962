use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::classify::DEFAULT_YEAR_CHILD_RATIO;

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults; the config file is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Folder-tree JSON used by `build` when no `--input` is given.
    pub input: Option<PathBuf>,
    /// Where `catalog.json` and `search-index.json` are written.
    pub output_dir: Option<PathBuf>,
    /// Library directory used by `snapshot` when no path is given.
    pub music_dir: Option<PathBuf>,
    /// Folder names skipped while taking a snapshot.
    pub snapshot_ignore: Vec<String>,
    /// Classification settings.
    pub catalog: CatalogConfig,
}

/// Catalog classification configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Top-level key of the folder-tree document.
    pub root_key: String,
    /// Top-level folders that are never turned into genres.
    pub ignored_genres: Vec<String>,
    /// Share of year-prefixed children that makes a folder an artist.
    pub year_child_ratio: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root_key: "Music".to_string(),
            ignored_genres: ["Downloads", "Various", "Classical", "No Copyright"]
                .into_iter()
                .map(String::from)
                .collect(),
            year_child_ratio: DEFAULT_YEAR_CHILD_RATIO,
        }
    }
}

impl AppConfig {
    /// Load config from `~/.config/genretree/config.toml`.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from an explicit path.
    /// Logs a warning if the file can't be read or parsed.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config.validated()
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp values that would make the classifier misbehave.
    fn validated(mut self) -> Self {
        let ratio = self.catalog.year_child_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            log::warn!(
                "year_child_ratio {} out of range (0, 1], using {}",
                ratio,
                DEFAULT_YEAR_CHILD_RATIO
            );
            self.catalog.year_child_ratio = DEFAULT_YEAR_CHILD_RATIO;
        }
        self
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Resolve the default output directory using XDG data directory.
pub fn default_output_dir() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("", "", crate::APP_NAME) {
        dirs.data_dir().join("catalog")
    } else {
        // Fallback: current directory
        PathBuf::from("catalog")
    }
}
