// Draft room entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the static player reference list
// 4. Fetch the live ranking feed and merge it over the static list
// 5. Build the draft engine
// 6. Create channels
// 7. Spawn WebSocket server task
// 8. Run the engine event loop until Ctrl+C

use draft_room::app;
use draft_room::config;
use draft_room::draft::engine::DraftEngine;
use draft_room::players;
use draft_room::rankings;
use draft_room::ws_server;

use anyhow::Context;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file so the terminal stays clean for a
    //    host UI launched alongside).
    init_tracing()?;
    info!("Draft room starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, {}s per pick{}",
        config.league.name,
        config.team_count(),
        config.timer.effective_pick_seconds(),
        if config.timer.fast_mode { " (fast mode)" } else { "" }
    );

    // 3. Load the static player reference list
    let mut players = players::load_players(std::path::Path::new(&config.data.players))
        .context("failed to load player reference list")?;
    info!("Loaded {} players from {}", players.len(), config.data.players);

    // 4. Fetch the live ranking feed (optional). A failed fetch degrades to
    //    the static ADP values rather than blocking the draft.
    if let Some(url) = config.data.rankings_url.as_deref().filter(|u| !u.is_empty()) {
        match rankings::fetch_live_rankings(url).await {
            Ok(feed) => {
                let applied = rankings::apply_rankings(&mut players, &feed);
                info!("Applied live ADP for {applied} players");
            }
            Err(e) => {
                warn!("Live ranking fetch failed, using static ADP: {e}");
            }
        }
    }

    // 5. Build the draft engine
    let engine = DraftEngine::new(
        config.league.teams.clone(),
        config.league.my_seat,
        config.league.bench_size,
        config.timer.effective_pick_seconds(),
        players,
    );
    info!(
        "Engine ready: {} total picks ({} roster slots per team)",
        engine.total_picks(),
        engine.roster_size()
    );

    // 6. Create channels
    let (ws_tx, ws_rx) = mpsc::channel(256);
    let (updates_tx, _) = broadcast::channel(256);

    // 7. Spawn WebSocket server task
    let ws_port = config.ws_port;
    let server_updates = updates_tx.clone();
    let ws_handle = tokio::spawn(async move {
        if let Err(e) = ws_server::run(ws_port, ws_tx, server_updates).await {
            error!("WebSocket server error: {e}");
        }
    });

    // 8. Run the engine event loop until Ctrl+C
    let app_state = app::AppState::new(config, engine, updates_tx);
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(ws_rx, app_state).await {
            error!("Application loop error: {e}");
        }
    });

    info!("Draft room ready on 127.0.0.1:{ws_port}");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    // Abort the server first (its accept loop runs forever), then give the
    // app loop a moment to drain.
    ws_handle.abort();
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), app_handle).await;

    info!("Draft room shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file under `logs/`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("draft-room.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("draft_room=info,warn")),
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
