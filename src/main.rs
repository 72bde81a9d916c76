use artfolio::config::{self, GalleryConfig};
use artfolio::gallery::{Gallery, GalleryEvent};
use artfolio::types::{ArtworkFilter, Category, Filter};
use artfolio::upload::{ImageFile, UploadForm};
use artfolio::{output, render};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

fn version_string() -> &'static str {
    let on_tag = env!("ARTFOLIO_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("ARTFOLIO_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "artfolio")]
#[command(about = "Art gallery with a featured carousel, filterable grid, and uploads")]
#[command(long_about = "\
Art gallery with a featured carousel, filterable grid, and uploads

Artworks live in a hosted table (rows) and bucket (images). Configure the
service in gallery.toml or with SUPABASE_URL / SUPABASE_ANON_KEY. Without
them, or when the service fails, the gallery runs on a built-in sample
catalog of five artworks.

Examples:

  artfolio list --category Painting
  artfolio featured --limit 3
  artfolio upload --title Dawn --artist Ana --category photography dawn.jpg
  artfolio build --output dist

Run 'artfolio gen-config' to generate a documented gallery.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Show debug logs (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List artworks, newest first
    List {
        /// Category name, or "All"
        #[arg(long, default_value = "All")]
        category: Filter<Category>,
        /// Artist name, or "All"
        #[arg(long, default_value = "All")]
        artist: Filter<String>,
    },
    /// List featured artworks
    Featured {
        /// Maximum number shown (default: carousel.featured_limit)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List distinct artist names
    Artists,
    /// Upload an image and create an artwork record
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long)]
        artist: String,
        #[arg(long, default_value_t = Category::Painting)]
        category: Category,
        #[arg(long, default_value = "")]
        description: String,
        /// Image file to upload
        image: PathBuf,
    },
    /// Render the static gallery page
    Build {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let load_config = || config::load_config(&cli.config);

    match cli.command {
        Command::List { category, artist } => {
            let gallery = Gallery::from_config(&load_config()?);
            let filter = ArtworkFilter::new(category, artist);
            let artworks = gallery.list_artworks(&filter);
            output::print_artworks(&filter, gallery.source_name(), &artworks);
        }
        Command::Featured { limit } => {
            let gallery = Gallery::from_config(&load_config()?);
            let limit = limit.unwrap_or(gallery.featured_limit());
            let artworks = gallery.list_featured_artworks(limit);
            output::print_featured(gallery.source_name(), limit, &artworks);
        }
        Command::Artists => {
            let gallery = Gallery::from_config(&load_config()?);
            output::print_artists(gallery.source_name(), &gallery.list_artists());
        }
        Command::Upload {
            title,
            artist,
            category,
            description,
            image,
        } => {
            let entry = UploadEntry {
                title,
                artist,
                category,
                description,
                image: ImageFile::from_path(&image)?,
            };
            upload(&load_config()?, entry)?;
        }
        Command::Build { output: out_dir } => {
            let config = load_config()?;
            println!("==> Rendering gallery → {}", out_dir.display());
            build(&config, &out_dir)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default = if verbose { "artfolio=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Print gallery events as they arrive, until every sender is dropped.
fn spawn_event_printer() -> (Sender<GalleryEvent>, JoinHandle<()>) {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_gallery_event(&event) {
                println!("{}", line);
            }
        }
    });
    (tx, printer)
}

/// Field values for one upload, as given on the command line.
struct UploadEntry {
    title: String,
    artist: String,
    category: Category,
    description: String,
    image: ImageFile,
}

/// Fill the upload form the way the modal does and submit it once.
fn upload(config: &GalleryConfig, entry: UploadEntry) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, printer) = spawn_event_printer();
    let result = {
        let gallery = Gallery::from_config(config).with_events(tx);
        let mut form = UploadForm::new(gallery.max_image_bytes());
        form.open();
        form.set_title(entry.title);
        form.set_artist(entry.artist);
        form.set_category(entry.category);
        form.set_description(entry.description);
        if form.attach_image(entry.image) {
            form.submit(&gallery).ok_or_else(|| form_error(&form))
        } else {
            Err(form_error(&form))
        }
    };
    printer.join().ok();
    output::print_created(&result?);
    Ok(())
}

fn form_error(form: &UploadForm) -> Box<dyn std::error::Error> {
    form.error().unwrap_or("Failed to upload artwork").into()
}

fn build(config: &GalleryConfig, out_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let gallery = Gallery::from_config(config);
    let summary = render::render_site(&gallery, config, out_dir)?;
    output::print_render_summary(&summary);
    println!("==> Build complete: {}", out_dir.display());
    Ok(())
}
