/// napcat — a sleepy cat, a fish dream, a hat, and a walk to the lake
///
/// Architecture:
///   assets/   — PNG loading with placeholder fallback
///   engine/   — Stage, timers, renderer, window loop
///   game/     — Scene sequencer, layout, drag & drop, blink, debug overlay

mod assets;
mod engine;
mod game;

use anyhow::{Context, Result};
use clap::Parser;
use napcat_common::SceneConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "napcat", version, about = "Interactive cat scene")]
struct Args {
    /// Directory holding the scene PNGs
    #[arg(default_value = "assets")]
    asset_dir: PathBuf,

    /// TOML file overriding anchors, zones, and sprite sizes
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with the alignment markers shown
    #[arg(long)]
    debug_overlay: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("napcat=debug".parse()?))
        .init();

    let args = Args::parse();
    tracing::info!("napcat v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("Failed to load scene config {}", path.display()))?,
        None => SceneConfig::default(),
    };

    let asset_store = assets::AssetStore::load(&args.asset_dir);
    tracing::info!(
        "Loaded {} images from {} ({} missing)",
        asset_store.total() - asset_store.missing(),
        args.asset_dir.display(),
        asset_store.missing()
    );

    engine::run(asset_store, config, args.debug_overlay)
}
