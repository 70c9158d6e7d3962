pub mod artist;
pub mod release;

pub use artist::{ParsedArtistName, parse_artist_name};
pub use release::{ReleaseType, detect_reissue_tag, format_release_name, parse_year, release_type};
