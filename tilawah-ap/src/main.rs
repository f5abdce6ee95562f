//! Tilawah Audio Player (tilawah-ap) - Command-line entry point
//!
//! Drives the playback orchestrator without a platform media engine: fetches
//! whatever audio the requested ayah needs, resolves the track, and hands it
//! to the logging engine. Useful for priming a local audio cache and for
//! exercising the download path end to end.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tilawah_ap::controller::{AudioController, ControllerConfig, LogErrorSink};
use tilawah_ap::engine::{AudioEngine, LoggingEngine};
use tilawah_ap::media::HttpMediaIo;
use tilawah_ap::paths::AssetLayout;
use tilawah_ap::settings::{SettingsStore, TomlSettings};
use tilawah_ap::state::PlayerState;
use tilawah_common::{AyahRef, PageTable, ReciterCatalog};

/// Command-line arguments for tilawah-ap
#[derive(Parser, Debug)]
#[command(name = "tilawah-ap")]
#[command(about = "Quran recitation playback orchestrator")]
#[command(version)]
struct Args {
    /// Surah to play (1-114)
    #[arg(short, long, default_value = "1")]
    surah: u16,

    /// Ayah to play within the surah
    #[arg(short, long, default_value = "1")]
    ayah: u16,

    /// Reciter display name; overrides the one in the settings file
    #[arg(long, env = "TILAWAH_RECITER")]
    reciter: Option<String>,

    /// Root folder for downloaded audio and databases
    #[arg(short, long, env = "TILAWAH_ROOT_FOLDER")]
    root_folder: PathBuf,

    /// Settings file (created on first write)
    #[arg(long, env = "TILAWAH_SETTINGS")]
    settings: Option<PathBuf>,

    /// JSON array of page-start ayah pairs, e.g. [[1,1],[2,1],...];
    /// without it pages fall back to one page per surah
    #[arg(long)]
    page_index: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tilawah_ap=debug,tilawah_common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Root folder: {}", args.root_folder.display());

    let pages = Arc::new(load_page_table(args.page_index.clone())?);

    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(|| args.root_folder.join("settings.toml"));
    let settings = Arc::new(
        TomlSettings::load(&settings_path)
            .await
            .context("Failed to load settings")?,
    );
    if let Some(name) = &args.reciter {
        settings.set_active_reciter(name).await?;
    }

    let catalog = ReciterCatalog::bundled();
    if settings.active_reciter().await.is_none() {
        let names: Vec<&str> = catalog.iter().map(|r| r.name.as_str()).collect();
        info!("No reciter selected; available: {}", names.join(", "));
    }

    let engine: Arc<LoggingEngine> = Arc::new(LoggingEngine::new());
    let media = Arc::new(HttpMediaIo::new().context("Failed to build HTTP client")?);
    let state = Arc::new(PlayerState::new());

    let controller = AudioController::new(
        Arc::clone(&engine) as Arc<dyn AudioEngine>,
        Arc::clone(&state),
        settings,
        media,
        catalog,
        pages,
        AssetLayout::new(&args.root_folder),
        Arc::new(LogErrorSink),
        ControllerConfig::default(),
    );
    let _reconciler = controller.start();

    let target = AyahRef::new(args.surah, args.ayah);
    info!("Requesting playback from {target}");
    controller.play_from(target).await?;

    match engine.current_track().await {
        Some(track) => info!(
            "Resolved track: '{}' at {}",
            track.title,
            track.path.display()
        ),
        None => info!("No track was handed to the engine"),
    }

    Ok(())
}

/// Page geometry is display data the application owns; the CLI accepts it as
/// a JSON file and otherwise treats each surah as one page.
fn load_page_table(path: Option<PathBuf>) -> Result<PageTable> {
    let Some(path) = path else {
        return Ok(PageTable::surah_aligned());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read page index {}", path.display()))?;
    let pairs: Vec<(u16, u16)> =
        serde_json::from_str(&text).context("Failed to parse page index")?;
    let starts = pairs
        .into_iter()
        .map(|(surah, ayah)| AyahRef::new(surah, ayah))
        .collect();
    PageTable::from_starts(starts).context("Invalid page index")
}
