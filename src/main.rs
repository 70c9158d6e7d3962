use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use genretree::catalog::models::{Album, MusicLibrary, Owner};
use genretree::catalog::search::album_url;
use genretree::classify::{self, ParentRole};
use genretree::names;
use genretree::tree::FolderNode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "genretree", version, about = "Music library folder-tree classifier")]
struct Cli {
    /// Directory holding catalog.json and search-index.json
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a folder-tree snapshot and write the catalog and search index
    Build {
        /// Folder-tree JSON (defaults to config file input)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Top-level key of the folder-tree document
        #[arg(long)]
        root_key: Option<String>,
    },

    /// Write the folder tree of a library directory as JSON
    Snapshot {
        /// Library directory (defaults to config file music_dir)
        path: Option<PathBuf>,

        /// Output file
        #[arg(short, long, default_value = "folder_hierarchy.json")]
        output: PathBuf,

        /// Folder names to skip (e.g. -i Downloads @eaDir)
        #[arg(short, long, num_args = 1..)]
        ignore: Vec<String>,
    },

    /// Show how a folder name is classified and parsed
    Inspect {
        /// Raw folder name, e.g. "Blind Guardian (Ger)"
        name: String,

        /// Child folder names, used by the year-prefix heuristic
        #[arg(short, long)]
        child: Vec<String>,
    },

    /// Look up an artist (and optionally one album) in a built catalog
    Show {
        /// Artist or compilation slug
        artist: String,

        /// Album slug within the artist
        album: Option<String>,
    },

    /// Show catalog statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let mut config = genretree::config::AppConfig::load();

    // Resolve output directory: CLI > config > XDG default
    let output_dir = cli
        .output_dir
        .or(config.output_dir.clone())
        .unwrap_or_else(genretree::config::default_output_dir);
    log::info!("Output directory: {}", output_dir.display());

    match cli.command {
        Commands::Build { input, root_key } => {
            let input = input.or(config.input.clone()).context(
                "No folder tree to build from. Pass --input or set input in config.",
            )?;
            if let Some(key) = root_key {
                config.catalog.root_key = key;
            }

            let root = genretree::tree::load_tree(&input, &config.catalog.root_key)
                .with_context(|| format!("Failed to load folder tree {}", input.display()))?;
            log::info!("Loaded {} folders from {}", root.folder_count(), input.display());

            let library = genretree::catalog::build_library(&root, &config.catalog);
            let index = genretree::catalog::search::build_search_index(&library);
            genretree::catalog::write_outputs(&library, &index, &output_dir)
                .context("Failed to write catalog")?;

            println!(
                "Build complete: {} genres, {} subgenres, {} artists, {} compilations, {} albums",
                library.stats.total_genres,
                library.stats.total_subgenres,
                library.stats.total_artists,
                library.stats.total_compilations,
                library.stats.total_albums
            );
            println!("Search index: {} entries", index.len());
            println!("Written to {}", output_dir.display());
        }

        Commands::Snapshot { path, output, ignore } => {
            let path = path.or(config.music_dir.clone()).context(
                "No directory to snapshot. Pass a path or set music_dir in config.",
            )?;
            let ignore = if ignore.is_empty() { config.snapshot_ignore.clone() } else { ignore };
            if !ignore.is_empty() {
                println!("Ignoring folders: {}", ignore.join(", "));
            }

            println!("Building folder hierarchy from '{}'...", path.display());
            let doc = genretree::tree::snapshot_dir(&path, &ignore).context("Snapshot failed")?;
            let json = serde_json::to_string_pretty(&doc)?;
            std::fs::write(&output, json)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Folder hierarchy saved to '{}'", output.display());
        }

        Commands::Inspect { name, child } => {
            let children: Vec<&str> = child.iter().map(String::as_str).collect();
            let node = FolderNode::from_names(&children);
            let classifier = classify::Classifier::new(config.catalog.year_child_ratio);
            let decision = classifier.explain(&name, &node, ParentRole::Genre);
            let parsed = names::parse_artist_name(&name);

            println!("Folder:        {}", name);
            println!("Classified as: {:?} (rule: {})", decision.kind, decision.rule);
            println!();
            println!("As artist:");
            println!("  name:        {}", parsed.name);
            println!("  country:     {}", parsed.country.as_deref().unwrap_or("-"));
            println!("  code:        {}", parsed.country_code.as_deref().unwrap_or("-"));
            let tags = if parsed.tags.is_empty() {
                "-".to_string()
            } else {
                parsed.tags.join(", ")
            };
            println!("  tags:        {}", tags);
            if classify::is_compilation_name(&name) {
                println!("As compilation: {}", classify::strip_compilation_prefix(&name));
            }
            println!();
            println!("As album:");
            println!("  name:        {}", names::format_release_name(&name));
            println!(
                "  year:        {}",
                names::parse_year(&name).map(|y| y.to_string()).unwrap_or_else(|| "-".into())
            );
            println!("  type:        {}", names::release_type(&name));
            println!("  reissue:     {}", names::detect_reissue_tag(&name).unwrap_or("-"));
        }

        Commands::Show { artist, album } => {
            let library = load_catalog(&output_dir)?;
            match album {
                Some(album_slug) => {
                    let Some((owner, album)) = library.find_album(&artist, &album_slug) else {
                        println!("No album \"{}\" for artist \"{}\".", album_slug, artist);
                        return Ok(());
                    };
                    println!("{} - {}", owner.name(), album.name);
                    print_album_table(owner, std::slice::from_ref(album));
                }
                None => {
                    let Some(owner) = library.find_artist(&artist) else {
                        println!("No artist or compilation with slug \"{}\".", artist);
                        return Ok(());
                    };
                    print_owner(owner);
                }
            }
        }

        Commands::Stats => {
            let library = load_catalog(&output_dir)?;
            let stats = &library.stats;
            println!("Library Statistics");
            println!("==================");
            println!("Genres:        {}", stats.total_genres);
            println!("Subgenres:     {}", stats.total_subgenres);
            println!("Artists:       {}", stats.total_artists);
            println!("Compilations:  {}", stats.total_compilations);
            println!("Albums:        {}", stats.total_albums);
            println!("Countries:     {}", stats.total_countries);
            println!("Generated at:  {}", stats.generated_at.to_rfc3339());
            println!();

            println!("Genres:");
            for genre in &library.genres {
                println!("  {:<30} {}", genre.name, genre.branch.owners().len());
            }
        }
    }

    Ok(())
}

fn load_catalog(output_dir: &std::path::Path) -> Result<MusicLibrary> {
    let path = output_dir.join(genretree::catalog::CATALOG_FILE);
    genretree::catalog::load_library(&path)
        .with_context(|| format!("Failed to read {}. Run `genretree build` first.", path.display()))
}

/// Print an artist or compilation header followed by its albums.
fn print_owner(owner: Owner<'_>) {
    println!("{}", owner.name());
    println!("{}", "=".repeat(owner.name().chars().count()));
    if let Owner::Artist(a) = owner {
        if let Some(country) = &a.country {
            println!("Country: {} ({})", country, a.country_code.as_deref().unwrap_or(""));
        }
        if !a.tags.is_empty() {
            println!("Tags:    {}", a.tags.join(", "));
        }
    } else {
        println!("Compilation");
    }
    println!("Genre:   {}", owner.genre_path().join(" / "));
    println!();
    print_album_table(owner, owner.albums());
}

/// Print a table of albums with their slugs.
fn print_album_table(owner: Owner<'_>, albums: &[Album]) {
    println!(
        "{:>4}  {:<40} {:<12} {:>5}  {}",
        "Year", "Album", "Type", "Discs", "Slug"
    );
    println!("{}", "-".repeat(90));

    for a in albums {
        // Truncate long names
        let name: String = if a.name.chars().count() > 40 {
            format!("{}...", a.name.chars().take(37).collect::<String>())
        } else {
            a.name.clone()
        };
        let year = a.year.map(|y| y.to_string()).unwrap_or_else(|| "----".into());
        let kind = match a.reissue {
            Some(_) => format!("{} *", a.release_type),
            None => a.release_type.to_string(),
        };

        println!(
            "{:>4}  {:<40} {:<12} {:>5}  {}",
            year,
            name,
            kind,
            a.disc_count,
            album_url(owner.slug(), &a.slug),
        );
        if let Some(label) = &a.reissue {
            println!("      * {}", label);
        }
    }
}
