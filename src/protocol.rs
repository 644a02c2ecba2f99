// Wire protocol between host clients and the engine.
//
// Host clients send JSON intents; the engine answers every state change with
// a full snapshot. The snapshot is a pure projection of engine state and is
// recomputed from scratch on each broadcast.

use serde::{Deserialize, Serialize};

use crate::draft::engine::{DraftEngine, DraftState};
use crate::draft::pick::{Participant, Pick};
use crate::draft::roster::RosterView;
use crate::players::Player;

// ---------------------------------------------------------------------------
// Inbound: host intents
// ---------------------------------------------------------------------------

/// A user intent forwarded by a host client, e.g.
/// `{"type":"DRAFT_PLAYER","participant":0,"player_id":"p17"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostIntent {
    Start,
    DraftPlayer {
        participant: usize,
        player_id: String,
    },
    QueuePlayer {
        participant: usize,
        player_id: String,
    },
    DequeuePlayer {
        participant: usize,
        player_id: String,
    },
    ReorderQueue {
        participant: usize,
        player_ids: Vec<String>,
    },
    Pause,
    Resume,
    ForcePick,
}

// ---------------------------------------------------------------------------
// Outbound: engine updates
// ---------------------------------------------------------------------------

/// One participant's queue contents, in priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub participant_index: usize,
    pub player_ids: Vec<String>,
}

/// The full observable state of the draft room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub state: DraftState,
    /// The participant currently on the clock, if the draft is live.
    pub on_the_clock: Option<usize>,
    pub participants: Vec<Participant>,
    pub picks: Vec<Pick>,
    pub available_players: Vec<Player>,
    pub queues: Vec<QueueSnapshot>,
    pub rosters: Vec<RosterView>,
}

/// Messages pushed to host clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineUpdate {
    Snapshot { payload: Box<DraftSnapshot> },
}

/// Build a full snapshot of the engine's observable state.
pub fn snapshot(engine: &DraftEngine) -> DraftSnapshot {
    let participants = engine.participants().to_vec();
    let queues = (0..engine.team_count())
        .map(|i| QueueSnapshot {
            participant_index: i,
            player_ids: engine
                .queue(i)
                .map(|q| q.entries().to_vec())
                .unwrap_or_default(),
        })
        .collect();
    let rosters = (0..engine.team_count()).map(|i| engine.roster(i)).collect();

    DraftSnapshot {
        state: engine.state(),
        on_the_clock: engine.on_the_clock(),
        participants,
        picks: engine.picks().to_vec(),
        available_players: engine.available_players().to_vec(),
        queues,
        rosters,
    }
}
