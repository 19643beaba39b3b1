//! Infection Map dashboard
//!
//! Loads the dataset once, runs the session runtime and the terminal UI side by side,
//! and exposes the filtered view to the map layer.
//!
//! Usage:
//!   cargo run --release --bin infection_map
//!
//! Environment variables:
//!   DATASET_URL / DATASET_PATH - where the GeoJSON dataset comes from
//!   VIEW_EXPORT_PATH - file the filtered view JSON is written to (optional)
//!   HOVER_FEED_PATH - file or FIFO of hovered postcodes, one per line (optional)
//!   TICK_INTERVAL_MS - timer cadence (default: 1000)

use dotenv::dotenv;
use infection_map::{
    bridge::{forward_hover_lines, FileBridge, HoverHandle},
    config::Config,
    fetch::load_dataset_task,
    runtime::Runtime,
    state::Event,
    ui,
};
use log::{error, info, warn};
use tokio::{io::BufReader, sync::mpsc};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = Config::from_env();

    // Logs go to stderr; the UI draws on the alternate screen
    let mut builder = if config.rust_log.is_some() {
        env_logger::Builder::from_default_env()
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
    };
    builder.target(env_logger::Target::Stderr).init();

    info!("🚀 Starting Infection Map...");
    info!("📊 Configuration:");
    info!("   ├─ Dataset: {}", config.dataset_source().describe());
    info!("   ├─ Tick interval: {}ms", config.tick_interval_ms);
    info!("   ├─ Event buffer: {}", config.event_buffer);
    match &config.view_export_path {
        Some(path) => info!("   ├─ View export: {}", path.display()),
        None => info!("   ├─ View export: disabled"),
    }
    match &config.hover_feed_path {
        Some(path) => info!("   └─ Hover feed: {}", path.display()),
        None => info!("   └─ Hover feed: disabled"),
    }

    let (tx, rx) = mpsc::channel::<Event>(config.event_buffer);

    // The map layer polls the export file; without one the view stays in-process
    let (mut runtime, model_rx) = Runtime::new(rx, config.tick_interval());
    if let Some(path) = &config.view_export_path {
        runtime = runtime.with_bridge(Box::new(FileBridge::new(path)));
    }

    // Hover feed from the map layer
    if let Some(path) = config.hover_feed_path.clone() {
        let handle = HoverHandle::new(tx.clone());
        tokio::spawn(async move {
            match tokio::fs::File::open(&path).await {
                Ok(file) => {
                    if let Err(e) = forward_hover_lines(BufReader::new(file), handle).await {
                        warn!("Hover feed stopped: {}", e);
                    }
                }
                Err(e) => warn!("Cannot open hover feed {}: {}", path.display(), e),
            }
        });
    }

    // One-shot dataset fetch
    tokio::spawn(load_dataset_task(config.dataset_source(), tx.clone()));

    let runtime_handle = tokio::spawn(runtime.run());

    let ui_tx = tx.clone();
    let ui_handle = tokio::spawn(async move {
        if let Err(e) = ui::run_ui(model_rx, ui_tx).await {
            error!("UI error: {}", e);
        }
    });
    drop(tx);

    tokio::select! {
        _ = ui_handle => {
            info!("UI exited");
        }
        result = runtime_handle => {
            match result {
                Ok(state) => info!("Runtime finished at {}", state.date_input),
                Err(e) => error!("❌ Runtime task failed: {}", e),
            }
        }
    }

    Ok(())
}
