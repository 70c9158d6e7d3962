pub mod catalog;
pub mod classify;
pub mod config;
pub mod countries;
pub mod names;
pub mod slug;
pub mod tree;

/// Extensions of non-audio files that show up as folder-tree entries
pub const ARTIFACT_EXTENSIONS: &[&str] = &[
    // Artwork
    "jpg", "jpeg", "png", "gif", "bmp", "webp",
    // Rip logs and notes
    "txt", "nfo", "log", "cue", "pdf", "md5", "sfv", "accurip",
    // Playlists, shortcuts, OS junk
    "m3u", "m3u8", "pls", "url", "lnk", "ini", "db", "ds_store",
    // Archives
    "zip", "rar", "7z",
];

/// Application name for XDG paths
pub const APP_NAME: &str = "genretree";
