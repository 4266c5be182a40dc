// Draft assistant entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load champion catalog, knowledge tables, and player pools
// 4. Create mpsc channels
// 5. Build the narrative client and application state
// 6. Spawn WebSocket server task
// 7. Spawn app logic task
// 8. Wait for Ctrl+C
// 9. Cleanup on exit

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use riftdraft::app;
use riftdraft::config;
use riftdraft::data::champions;
use riftdraft::data::knowledge::{self, KnowledgePaths};
use riftdraft::data::pools;
use riftdraft::llm::client::LlmClient;
use riftdraft::ws_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("riftdraft starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} vs {}, top_k={}",
        config.teams.blue.name, config.teams.red.name, config.engine.top_k
    );

    // 3. Load reference data
    let catalog = champions::load_catalog(Path::new(&config.data_paths.champions))
        .context("failed to load champion catalog")?;
    info!("Loaded {} champions", catalog.len());

    let kb = knowledge::load_knowledge(&KnowledgePaths {
        matchups: Path::new(&config.data_paths.matchups),
        synergies: Path::new(&config.data_paths.synergies),
        meta: Path::new(&config.data_paths.meta),
        traits: Path::new(&config.data_paths.traits),
    })
    .context("failed to load knowledge tables")?;

    let player_pools = pools::load_pools(Path::new(&config.data_paths.pools))
        .context("failed to load player pools")?;
    info!("Loaded pools for {} players", player_pools.player_count());

    // 4. Create mpsc channels
    let (ws_tx, ws_rx) = mpsc::channel(256);
    let (llm_tx, llm_rx) = mpsc::channel(256);

    // 5. Build the narrative client and application state
    let llm_client = LlmClient::from_config(&config);
    if llm_client.is_active() {
        info!("Narrative client initialized (API key configured)");
    } else {
        info!("Narrative client disabled (no API key)");
    }

    let app_state = app::AppState::new(
        config.clone(),
        Arc::new(catalog),
        Arc::new(kb),
        Arc::new(player_pools),
        llm_client,
        llm_tx,
    );

    // 6. Spawn WebSocket server task
    let ws_port = config.ws_port;
    let ws_handle = tokio::spawn(async move {
        if let Err(e) = ws_server::run(ws_port, ws_tx).await {
            error!("WebSocket server error: {e}");
        }
    });

    // 7. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(ws_rx, llm_rx, app_state).await {
            error!("Application loop error: {e}");
        }
    });

    // 8. Wait for Ctrl+C
    info!("Ready. WebSocket server listening on 127.0.0.1:{ws_port}");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    // 9. Cleanup: both tasks loop forever, so abort them.
    ws_handle.abort();
    app_handle.abort();

    info!("riftdraft shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file so stdout stays quiet for tooling.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("riftdraft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("riftdraft=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
