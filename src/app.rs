// Application orchestration: the single-writer event loop.
//
// Clock ticks and host intents are both delivered as discrete events into one
// serialized loop, so the engine never processes two pick-producing events
// concurrently. After every observable state change the loop broadcasts a
// full snapshot to all connected clients.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::draft::engine::{DraftEngine, DraftError};
use crate::protocol::{self, EngineUpdate, HostIntent};
use crate::ws_server::WsEvent;

/// How often the clock advances: one tick per real second. Fast mode changes
/// the per-pick duration, never the tick rate.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state. Owns the engine exclusively; every
/// mutation flows through `apply_intent` or `handle_tick`.
pub struct AppState {
    pub config: Config,
    pub engine: DraftEngine,
    updates_tx: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(config: Config, engine: DraftEngine, updates_tx: broadcast::Sender<String>) -> Self {
        AppState {
            config,
            engine,
            updates_tx,
        }
    }

    /// Apply a host intent to the engine. Returns whether observable state
    /// changed (and a snapshot should be broadcast).
    ///
    /// `NotYourTurn`, `PlayerUnavailable`, and `InvalidReorder` are expected,
    /// frequent rejections (stale clicks after someone else drafted the same
    /// player); they are logged at debug level and otherwise ignored.
    pub fn apply_intent(&mut self, intent: HostIntent) -> bool {
        match intent {
            HostIntent::Start => match self.engine.start() {
                Ok(()) => true,
                Err(e) => {
                    debug!("start rejected: {e}");
                    false
                }
            },
            HostIntent::DraftPlayer {
                participant,
                player_id,
            } => match self.engine.draft_player(participant, &player_id) {
                Ok(pick) => {
                    debug!("manual pick {} committed", pick.pick_number);
                    true
                }
                Err(e) => Self::note_rejection("draft_player", &e),
            },
            HostIntent::QueuePlayer {
                participant,
                player_id,
            } => match self.engine.enqueue(participant, &player_id) {
                Ok(()) => true,
                Err(e) => Self::note_rejection("queue_player", &e),
            },
            HostIntent::DequeuePlayer {
                participant,
                player_id,
            } => match self.engine.dequeue(participant, &player_id) {
                Ok(()) => true,
                Err(e) => Self::note_rejection("dequeue_player", &e),
            },
            HostIntent::ReorderQueue {
                participant,
                player_ids,
            } => match self.engine.reorder_queue(participant, player_ids) {
                Ok(()) => true,
                Err(e) => Self::note_rejection("reorder_queue", &e),
            },
            HostIntent::Pause => {
                self.engine.pause();
                true
            }
            HostIntent::Resume => {
                self.engine.resume();
                true
            }
            HostIntent::ForcePick => match self.engine.force_pick() {
                Ok(Some(pick)) => {
                    debug!("forced pick {} committed", pick.pick_number);
                    true
                }
                Ok(None) => false,
                // Pool exhaustion forces completion: that is a state change.
                Err(DraftError::NoPlayersAvailable) => true,
                Err(e) => Self::note_rejection("force_pick", &e),
            },
        }
    }

    /// Advance the clock by one second, committing an auto-pick if this tick
    /// expired it. Returns whether observable state changed.
    pub fn handle_tick(&mut self) -> bool {
        let before = self.engine.state();
        match self.engine.tick() {
            Ok(Some(pick)) => {
                info!("timer expired, auto-pick {} committed", pick.pick_number);
                true
            }
            Ok(None) => before != self.engine.state(),
            Err(DraftError::NoPlayersAvailable) => true,
            Err(e) => {
                warn!("clock tick failed: {e}");
                false
            }
        }
    }

    /// Serialize and broadcast a full snapshot. A send error only means no
    /// client is connected right now.
    pub fn broadcast_snapshot(&self) {
        let update = EngineUpdate::Snapshot {
            payload: Box::new(protocol::snapshot(&self.engine)),
        };
        match serde_json::to_string(&update) {
            Ok(json) => {
                let _ = self.updates_tx.send(json);
            }
            Err(e) => warn!("failed to serialize snapshot: {e}"),
        }
    }

    fn note_rejection(op: &str, err: &DraftError) -> bool {
        match err {
            DraftError::NotYourTurn
            | DraftError::PlayerUnavailable(_)
            | DraftError::InvalidReorder
            | DraftError::DraftAlreadyComplete => debug!("{op} rejected: {err}"),
            other => warn!("{op} failed: {other}"),
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on the WebSocket event channel and a 1 Hz tick interval via
/// `tokio::select!`. Exits when the WebSocket channel closes.
pub async fn run(mut ws_rx: mpsc::Receiver<WsEvent>, mut state: AppState) -> anyhow::Result<()> {
    info!("Application event loop started");

    let mut tick_interval = tokio::time::interval(TICK_INTERVAL);
    // The first tick completes immediately; consume it so the first real
    // clock tick happens after one full second.
    tick_interval.tick().await;

    loop {
        tokio::select! {
            ws_event = ws_rx.recv() => {
                match ws_event {
                    Some(WsEvent::Connected { addr }) => {
                        info!("Host client connected from {addr}");
                        // Catch the new client up immediately.
                        state.broadcast_snapshot();
                    }
                    Some(WsEvent::Disconnected) => {
                        info!("Host client disconnected");
                    }
                    Some(WsEvent::Message(json_str)) => {
                        handle_ws_message(&mut state, &json_str);
                    }
                    None => {
                        info!("WebSocket channel closed, shutting down");
                        break;
                    }
                }
            }

            _ = tick_interval.tick() => {
                if state.handle_tick() {
                    state.broadcast_snapshot();
                }
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

/// Handle an incoming WebSocket message (JSON intent from a host client).
pub fn handle_ws_message(state: &mut AppState, json_str: &str) {
    let intent: HostIntent = match serde_json::from_str(json_str) {
        Ok(i) => i,
        Err(e) => {
            warn!("Failed to parse host intent: {e}");
            return;
        }
    };
    if state.apply_intent(intent) {
        state.broadcast_snapshot();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
