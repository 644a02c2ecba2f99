// The authoritative draft state machine.
//
// Owns the pool, the queues, the clock, and the committed pick sequence.
// All pick-producing events (manual picks, timer expirations, forced picks)
// funnel through one commit path guarded by a single-pick-in-flight lock,
// so exactly one pick is committed per pick number no matter how events
// race within a processing turn.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use super::clock::Clock;
use super::order;
use super::pick::{Participant, Pick};
use super::pool::PlayerPool;
use super::queue::{purge_everywhere, DraftQueue};
use super::roster::{self, RosterView, STARTING_SLOTS};
use crate::players::Player;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Recoverable failures of engine operations. The engine's state is left
/// unchanged on every error except `NoPlayersAvailable`, which forces the
/// draft to completion.
#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    /// Pick attempted by a participant who is not on the clock (or before
    /// the draft started, when nobody is).
    #[error("not your turn")]
    NotYourTurn,

    /// The player is already drafted or the id is unknown.
    #[error("player '{0}' is unavailable")]
    PlayerUnavailable(String),

    /// Reorder payload is not a permutation of the current queue contents.
    #[error("invalid queue reorder")]
    InvalidReorder,

    /// The pool is exhausted; the draft has been forced to completion.
    #[error("no players available")]
    NoPlayersAvailable,

    /// A pick-producing call arrived after the draft completed.
    #[error("draft already complete")]
    DraftAlreadyComplete,

    /// Participant index outside `[0, team_count)`.
    #[error("unknown participant index {0}")]
    UnknownParticipant(usize),

    /// The engine detected a pick-number gap or duplicate and refuses all
    /// further mutation. Indicates a logic bug, not a user error.
    #[error("engine halted after an internal invariant violation")]
    Halted,
}

// ---------------------------------------------------------------------------
// Phase and observable state
// ---------------------------------------------------------------------------

/// The engine's lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftPhase {
    NotStarted,
    /// The given pick number is on the clock.
    OnTheClock(u32),
    Complete,
}

/// The observable draft state, recomputed on demand for snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    /// The next pick to be committed (1-indexed). After completion this is
    /// one past the last committed pick.
    pub current_pick_number: u32,
    pub timer_seconds_remaining: u32,
    pub is_active: bool,
    pub is_paused: bool,
    pub my_participant_index: usize,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DraftEngine {
    participants: Vec<Participant>,
    bench_size: usize,
    my_participant_index: usize,
    pool: PlayerPool,
    queues: Vec<DraftQueue>,
    clock: Clock,
    picks: Vec<Pick>,
    phase: DraftPhase,
    /// The single-pick-in-flight lock: holds the pick number currently being
    /// committed. Any other commit attempt for the same pick number observed
    /// while set is rejected; cleared only after the full state transition
    /// (pool removal, queue purge, pick append, advance, clock reset).
    pick_in_flight: Option<u32>,
    /// Set when the pick-sequence invariant is violated; every mutating
    /// operation fails afterwards while read-only projections keep working.
    halted: bool,
}

impl DraftEngine {
    /// Create an engine for the given seats and player pool.
    ///
    /// `pick_seconds` is the per-pick clock duration (the caller picks the
    /// normal or fast-mode value; the engine does not care which).
    pub fn new(
        team_names: Vec<String>,
        my_seat: usize,
        bench_size: usize,
        pick_seconds: u32,
        players: Vec<Player>,
    ) -> Self {
        let participants: Vec<Participant> = team_names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Participant { name, index })
            .collect();
        let queues = vec![DraftQueue::new(); participants.len()];
        DraftEngine {
            my_participant_index: my_seat.min(participants.len().saturating_sub(1)),
            participants,
            bench_size,
            pool: PlayerPool::new(players),
            queues,
            clock: Clock::new(pick_seconds),
            picks: Vec::new(),
            phase: DraftPhase::NotStarted,
            pick_in_flight: None,
            halted: false,
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn team_count(&self) -> usize {
        self.participants.len()
    }

    /// Starting lineup plus bench.
    pub fn roster_size(&self) -> usize {
        STARTING_SLOTS.len() + self.bench_size
    }

    pub fn total_picks(&self) -> u32 {
        (self.team_count() * self.roster_size()) as u32
    }

    pub fn phase(&self) -> DraftPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == DraftPhase::Complete
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// The committed pick sequence, in pick-number order.
    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    /// Remaining undrafted players, in input order.
    pub fn available_players(&self) -> &[Player] {
        self.pool.players()
    }

    pub fn queue(&self, participant: usize) -> Option<&DraftQueue> {
        self.queues.get(participant)
    }

    /// The participant on the clock, if any.
    pub fn on_the_clock(&self) -> Option<usize> {
        match self.phase {
            DraftPhase::OnTheClock(p) => Some(order::participant_for_pick(p, self.team_count())),
            _ => None,
        }
    }

    /// The observable state projection.
    pub fn state(&self) -> DraftState {
        let current_pick_number = match self.phase {
            DraftPhase::NotStarted => 1,
            DraftPhase::OnTheClock(p) => p,
            DraftPhase::Complete => self.picks.len() as u32 + 1,
        };
        DraftState {
            current_pick_number,
            timer_seconds_remaining: self.clock.remaining(),
            is_active: matches!(self.phase, DraftPhase::OnTheClock(_)),
            is_paused: self.clock.is_paused(),
            my_participant_index: self.my_participant_index,
        }
    }

    /// Derive a participant's roster view from the committed picks.
    pub fn roster(&self, participant: usize) -> RosterView {
        roster::assign(&self.picks, participant, self.bench_size)
    }

    // -- lifecycle ----------------------------------------------------------

    /// Start the draft: pick 1 goes on the clock and the countdown begins.
    /// Repeated start intents while live are harmless no-ops.
    pub fn start(&mut self) -> Result<(), DraftError> {
        self.check_not_halted()?;
        match self.phase {
            DraftPhase::NotStarted => {
                self.phase = DraftPhase::OnTheClock(1);
                self.clock.start();
                info!(
                    "draft started: {} teams, {} picks",
                    self.team_count(),
                    self.total_picks()
                );
                Ok(())
            }
            DraftPhase::OnTheClock(_) => Ok(()),
            DraftPhase::Complete => Err(DraftError::DraftAlreadyComplete),
        }
    }

    /// Suspend the countdown without losing remaining time.
    pub fn pause(&mut self) {
        self.clock.pause();
    }

    /// Continue the countdown from where `pause()` left off.
    pub fn resume(&mut self) {
        self.clock.resume();
    }

    /// Advance the clock by one second. If this tick expires the clock, the
    /// resulting auto-pick is processed in the same call and returned.
    pub fn tick(&mut self) -> Result<Option<Pick>, DraftError> {
        self.check_not_halted()?;
        if !self.clock.tick() {
            return Ok(None);
        }
        match self.phase {
            DraftPhase::OnTheClock(p) => self.auto_pick(p),
            _ => Ok(None),
        }
    }

    // -- pick-producing operations ------------------------------------------

    /// A manual pick by `requester` for the pick currently on the clock.
    pub fn draft_player(&mut self, requester: usize, player_id: &str) -> Result<Pick, DraftError> {
        self.check_not_halted()?;
        let current = match self.phase {
            DraftPhase::OnTheClock(p) => p,
            DraftPhase::Complete => return Err(DraftError::DraftAlreadyComplete),
            DraftPhase::NotStarted => return Err(DraftError::NotYourTurn),
        };
        let owner = order::participant_for_pick(current, self.team_count());
        if requester != owner {
            debug!(
                "rejecting pick by participant {} for pick {} (owner {})",
                requester, current, owner
            );
            return Err(DraftError::NotYourTurn);
        }
        self.commit(current, owner, player_id)
    }

    /// An automatic pick for the given pick number, triggered by clock expiry.
    ///
    /// Selects the owner's top still-available queue entry, falling back to
    /// best available by ADP. A `pick_number` that is no longer on the clock
    /// is a stale event (it lost the race to a manual pick) and is silently
    /// discarded with `Ok(None)`.
    pub fn auto_pick(&mut self, pick_number: u32) -> Result<Option<Pick>, DraftError> {
        self.check_not_halted()?;
        let current = match self.phase {
            DraftPhase::OnTheClock(p) => p,
            _ => {
                debug!("discarding auto-pick for pick {pick_number}: draft not live");
                return Ok(None);
            }
        };
        if pick_number != current {
            debug!("discarding stale auto-pick for pick {pick_number} (current {current})");
            return Ok(None);
        }
        let owner = order::participant_for_pick(current, self.team_count());

        // Queue entries are purged on every commit, so the top entry should
        // always be available; skip any that are not.
        let mut queued = None;
        while let Some(id) = self.queues[owner].consume_top() {
            if self.pool.contains(&id) {
                queued = Some(id);
                break;
            }
        }
        let player_id = match queued {
            Some(id) => id,
            None => match self.pool.peek_best_available() {
                Ok(player) => player.id.clone(),
                Err(_) => {
                    info!("player pool exhausted at pick {current}; forcing completion");
                    self.phase = DraftPhase::Complete;
                    return Err(DraftError::NoPlayersAvailable);
                }
            },
        };
        self.commit(current, owner, &player_id).map(Some)
    }

    /// An externally triggered auto-pick for the pick currently on the clock.
    /// Indistinguishable in effect from a timer-triggered auto-pick.
    pub fn force_pick(&mut self) -> Result<Option<Pick>, DraftError> {
        self.check_not_halted()?;
        match self.phase {
            DraftPhase::OnTheClock(p) => self.auto_pick(p),
            DraftPhase::Complete => Err(DraftError::DraftAlreadyComplete),
            DraftPhase::NotStarted => Err(DraftError::NotYourTurn),
        }
    }

    // -- queue intents ------------------------------------------------------

    /// Add a player to a participant's queue. No-op if already queued; fails
    /// if the player is drafted or unknown.
    pub fn enqueue(&mut self, participant: usize, player_id: &str) -> Result<(), DraftError> {
        self.check_not_halted()?;
        self.check_participant(participant)?;
        if !self.pool.contains(player_id) {
            return Err(DraftError::PlayerUnavailable(player_id.to_string()));
        }
        self.queues[participant].enqueue(player_id);
        Ok(())
    }

    /// Remove a player from a participant's queue. No-op if absent.
    pub fn dequeue(&mut self, participant: usize, player_id: &str) -> Result<(), DraftError> {
        self.check_not_halted()?;
        self.check_participant(participant)?;
        self.queues[participant].dequeue(player_id);
        Ok(())
    }

    /// Replace a participant's queue order wholesale. Rejected unless the new
    /// order is a permutation of the current entries.
    pub fn reorder_queue(
        &mut self,
        participant: usize,
        new_order: Vec<String>,
    ) -> Result<(), DraftError> {
        self.check_not_halted()?;
        self.check_participant(participant)?;
        if self.queues[participant].reorder(new_order) {
            Ok(())
        } else {
            Err(DraftError::InvalidReorder)
        }
    }

    // -- commit path --------------------------------------------------------

    /// The single commit path for every pick-producing operation.
    ///
    /// Acquires the single-pick-in-flight lock, applies the full transition
    /// (pool removal, queue purge, pick append, invariant check, advance,
    /// clock reset), then releases the lock. A failure before the pool
    /// removal leaves the engine unchanged; the pool removal itself is
    /// atomic, so there is no partial state to roll back.
    fn commit(
        &mut self,
        pick_number: u32,
        participant: usize,
        player_id: &str,
    ) -> Result<Pick, DraftError> {
        if let Some(in_flight) = self.pick_in_flight {
            debug!(
                "rejecting commit for pick {pick_number}: pick {in_flight} already in flight"
            );
            return Err(DraftError::PlayerUnavailable(player_id.to_string()));
        }
        self.pick_in_flight = Some(pick_number);
        let result = self.apply_commit(pick_number, participant, player_id);
        self.pick_in_flight = None;
        result
    }

    fn apply_commit(
        &mut self,
        pick_number: u32,
        participant: usize,
        player_id: &str,
    ) -> Result<Pick, DraftError> {
        let player = self
            .pool
            .take(player_id)
            .map_err(|_| DraftError::PlayerUnavailable(player_id.to_string()))?;

        purge_everywhere(&mut self.queues, player_id);

        let pick = Pick {
            pick_number,
            player,
            participant_index: participant,
            timestamp: Utc::now(),
        };
        info!(
            "pick {}: {} ({}) -> {}",
            pick.pick_number, pick.player.name, pick.player.position, self.participants[participant].name
        );
        self.picks.push(pick.clone());
        self.check_pick_sequence()?;

        if pick_number >= self.total_picks() {
            self.phase = DraftPhase::Complete;
            info!("draft complete: {} picks committed", self.picks.len());
        } else {
            self.phase = DraftPhase::OnTheClock(pick_number + 1);
            self.clock.start();
        }
        Ok(pick)
    }

    /// Verify the committed sequence is gapless, duplicate-free, and owned by
    /// the snake order. A violation is a logic bug: the engine halts.
    fn check_pick_sequence(&mut self) -> Result<(), DraftError> {
        let team_count = self.team_count();
        let consistent = self.picks.iter().enumerate().all(|(i, pick)| {
            pick.pick_number == i as u32 + 1
                && pick.participant_index
                    == order::participant_for_pick(pick.pick_number, team_count)
        });
        if !consistent {
            error!("pick sequence invariant violated; halting engine mutation");
            self.halted = true;
            return Err(DraftError::Halted);
        }
        Ok(())
    }

    fn check_not_halted(&self) -> Result<(), DraftError> {
        if self.halted {
            Err(DraftError::Halted)
        } else {
            Ok(())
        }
    }

    fn check_participant(&self, participant: usize) -> Result<(), DraftError> {
        if participant < self.participants.len() {
            Ok(())
        } else {
            Err(DraftError::UnknownParticipant(participant))
        }
    }

    /// Test hook: corrupt the pick sequence to exercise the invariant guard.
    #[cfg(test)]
    fn push_raw_pick_for_test(&mut self, pick: Pick) {
        self.picks.push(pick);
    }
}
