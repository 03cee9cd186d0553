use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use reader_core::model::{ChapterId, VisualizationCatalog};
use reader_core::parser::planning::PlanningMeta;
use services::authoring;
use services::{AppServices, Clock, ProgressService, ReaderService, ReaderSettings};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    InvalidDbUrl { raw: String },
    InvalidChapter { raw: u32 },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidChapter { raw } => write!(f, "chapter numbers start at 1, got {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

/// Interactive course reader with per-chapter progress.
///
/// Runs the reader when no subcommand is given.
#[derive(Debug, Parser)]
#[command(name = "app", version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    ui: UiArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the reader window.
    Ui(UiArgs),
    /// Convert a planning document into a structured chapter file.
    Convert(ConvertArgs),
    /// Split a structured document into per-chapter files.
    Split(SplitArgs),
}

#[derive(Debug, Args)]
struct UiArgs {
    /// Content directory or http(s) base URL.
    #[arg(long, env = "READER_CONTENT", default_value = ".")]
    content: String,

    /// `SQLite` database for saved progress.
    #[arg(long = "db", env = "READER_DB_URL", default_value = "sqlite://reader.sqlite3")]
    db_url: String,

    /// Visualization catalog (JSON object keyed by term title).
    #[arg(long, env = "READER_CATALOG")]
    catalog: Option<PathBuf>,

    /// Chapter to open on launch.
    #[arg(long, env = "READER_CHAPTER")]
    chapter: Option<u32>,

    /// Seconds a term must stay active before it counts as read.
    #[arg(long = "dwell-secs", env = "READER_DWELL_SECS", default_value_t = 10)]
    dwell_secs: u64,

    /// Start each chapter at the last saved position.
    #[arg(long)]
    resume: bool,
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Planning document to read.
    input: PathBuf,

    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    chapter: u32,

    #[arg(long)]
    title: String,

    #[arg(long)]
    description: Option<String>,

    /// Catalog used to attach visualizations to terms.
    #[arg(long, env = "READER_CATALOG")]
    catalog: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SplitArgs {
    /// Structured document holding every section.
    input: PathBuf,

    /// JSON list of `{chapter, title, description, sectionIndices}` entries.
    #[arg(long)]
    plan: PathBuf,

    #[arg(long = "out-dir")]
    out_dir: PathBuf,
}

struct DesktopApp {
    initial_chapter: Option<ChapterId>,
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn initial_chapter(&self) -> Option<ChapterId> {
        self.initial_chapter
    }

    fn reader(&self) -> Arc<ReaderService> {
        self.services.reader()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" {
        return trimmed.to_string();
    }

    let rest = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let (path_str, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    match query {
        Some(query) => format!("sqlite://{}?{query}", absolute.display()),
        None => format!("sqlite://{}", absolute.display()),
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn chapter_id(raw: u32) -> Result<ChapterId, ArgsError> {
    if raw == 0 {
        return Err(ArgsError::InvalidChapter { raw });
    }
    Ok(ChapterId::new(raw))
}

async fn catalog_from(path: Option<&Path>) -> Result<VisualizationCatalog, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let catalog = authoring::load_catalog(path).await?;
            info!(path = %path.display(), entries = catalog.len(), "loaded visualization catalog");
            Ok(catalog)
        }
        None => Ok(VisualizationCatalog::new()),
    }
}

async fn run_ui(args: UiArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db_url = normalize_sqlite_url(&args.db_url);
    let initial_chapter = args.chapter.map(chapter_id).transpose()?;
    let catalog = catalog_from(args.catalog.as_deref()).await?;
    let settings = ReaderSettings {
        dwell: Duration::from_secs(args.dwell_secs),
        resume_last_position: args.resume,
    };

    // Open and migrate SQLite here so the library crates never touch the filesystem layout.
    prepare_sqlite_file(&db_url)?;
    let services =
        AppServices::new_sqlite(&db_url, &args.content, Clock::system(), catalog, settings).await?;
    info!(db = %db_url, content = %args.content, "reader ready");

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        initial_chapter,
        services,
    });
    let context = build_app_context(&app);

    // Some tao setups default to always-on-top; keep the reader a normal window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Course Reader")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

async fn run_convert(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let chapter = chapter_id(args.chapter)?;
    let catalog = catalog_from(args.catalog.as_deref()).await?;
    let meta = PlanningMeta {
        chapter: chapter.value(),
        title: args.title,
        description: args.description,
    };
    let document = authoring::convert(&args.input, &args.out, &meta, &catalog).await?;
    println!(
        "wrote {} ({} sections, {} terms)",
        args.out.display(),
        document.sections.len(),
        document.term_count()
    );
    Ok(())
}

async fn run_split(args: SplitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let written = authoring::split(&args.input, &args.plan, &args.out_dir).await?;
    for path in &written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        None => run_ui(cli.ui).await,
        Some(Command::Ui(args)) => run_ui(args).await,
        Some(Command::Convert(args)) => run_convert(args).await,
        Some(Command::Split(args)) => run_split(args).await,
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
