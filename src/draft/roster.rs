// Roster derivation: starting-lineup and bench slot assignment.
//
// A roster view is a pure projection of the committed pick sequence; it is
// recomputed from scratch on demand and never stored as mutable state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::pick::Pick;
use crate::players::{Player, Position};

/// The fixed starting-lineup shape, in fill order.
pub const STARTING_SLOTS: [SlotKind; 9] = [
    SlotKind::Qb,
    SlotKind::Rb,
    SlotKind::Rb,
    SlotKind::Wr,
    SlotKind::Wr,
    SlotKind::Wr,
    SlotKind::Te,
    SlotKind::Flex,
    SlotKind::Flex,
];

/// The position designation of a roster slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    Qb,
    Rb,
    Wr,
    Te,
    /// Fillable by RB, WR, or TE.
    Flex,
    Bench,
}

impl SlotKind {
    /// Whether a player of the given position may fill this slot.
    pub fn accepts(&self, position: Position) -> bool {
        match self {
            SlotKind::Qb => position == Position::Quarterback,
            SlotKind::Rb => position == Position::RunningBack,
            SlotKind::Wr => position == Position::WideReceiver,
            SlotKind::Te => position == Position::TightEnd,
            SlotKind::Flex => position.is_flex_eligible(),
            SlotKind::Bench => true,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            SlotKind::Qb => "QB",
            SlotKind::Rb => "RB",
            SlotKind::Wr => "WR",
            SlotKind::Te => "TE",
            SlotKind::Flex => "FLEX",
            SlotKind::Bench => "BN",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A single slot on a participant's roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSlot {
    pub kind: SlotKind,
    /// The player occupying this slot. Empty is the normal in-progress state
    /// of an active draft, not an error.
    pub player: Option<Player>,
}

/// A participant's derived roster: the fixed starting lineup followed by
/// bench slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterView {
    pub participant_index: usize,
    pub slots: Vec<RosterSlot>,
}

impl RosterView {
    /// The starting-lineup slots.
    pub fn starters(&self) -> &[RosterSlot] {
        &self.slots[..STARTING_SLOTS.len()]
    }

    /// The bench slots.
    pub fn bench(&self) -> &[RosterSlot] {
        &self.slots[STARTING_SLOTS.len()..]
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.player.is_some()).count()
    }
}

/// Derive a participant's roster from the committed pick sequence.
///
/// The participant's picks are taken in draft order. Each non-FLEX starting
/// slot takes that position's next unconsumed player; each FLEX slot takes
/// the next unconsumed RB/WR/TE; everything left fills the bench in draft
/// order. Slots with no eligible player render empty.
pub fn assign(picks: &[Pick], participant_index: usize, bench_size: usize) -> RosterView {
    let my_players: Vec<Player> = picks
        .iter()
        .filter(|p| p.participant_index == participant_index)
        .map(|p| p.player.clone())
        .collect();
    let mut consumed = vec![false; my_players.len()];

    let mut slots = Vec::with_capacity(STARTING_SLOTS.len() + bench_size);
    for kind in STARTING_SLOTS {
        let idx = my_players
            .iter()
            .enumerate()
            .position(|(i, p)| !consumed[i] && kind.accepts(p.position));
        let player = idx.map(|i| {
            consumed[i] = true;
            my_players[i].clone()
        });
        slots.push(RosterSlot { kind, player });
    }

    let mut leftovers = my_players
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !consumed[*i])
        .map(|(_, p)| p);
    for _ in 0..bench_size {
        slots.push(RosterSlot {
            kind: SlotKind::Bench,
            player: leftovers.next(),
        });
    }
    // A valid draft never outgrows the bench, but the projection stays total
    // if it somehow does.
    for player in leftovers {
        slots.push(RosterSlot {
            kind: SlotKind::Bench,
            player: Some(player),
        });
    }

    RosterView {
        participant_index,
        slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn player(id: &str, position: Position) -> Player {
        Player {
            id: id.to_string(),
            name: format!("Player {id}"),
            position,
            team: "FA".to_string(),
            adp: None,
            bye_week: None,
            projected_points: 0.0,
        }
    }

    /// Build a pick sequence where every pick belongs to participant 0.
    fn picks_for_me(positions: &[Position]) -> Vec<Pick> {
        positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| Pick {
                pick_number: i as u32 + 1,
                player: player(&format!("p{i}"), pos),
                participant_index: 0,
                timestamp: Utc::now(),
            })
            .collect()
    }

    fn slot_player_ids(view: &RosterView) -> Vec<Option<&str>> {
        view.slots
            .iter()
            .map(|s| s.player.as_ref().map(|p| p.id.as_str()))
            .collect()
    }

    #[test]
    fn starting_shape_is_fixed() {
        let view = assign(&[], 0, 7);
        assert_eq!(view.slots.len(), 9 + 7);
        let kinds: Vec<SlotKind> = view.starters().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, STARTING_SLOTS.to_vec());
        assert!(view.bench().iter().all(|s| s.kind == SlotKind::Bench));
        assert_eq!(view.filled_count(), 0);
    }

    #[test]
    fn early_draft_fills_dedicated_slots_in_draft_order() {
        use Position::*;
        // First four picks: QB, RB, RB, WR.
        let picks = picks_for_me(&[Quarterback, RunningBack, RunningBack, WideReceiver]);
        let view = assign(&picks, 0, 7);
        let ids = slot_player_ids(&view);
        // [QB, RB, RB, WR, WR, WR, TE, FLEX, FLEX, bench...]
        assert_eq!(ids[0], Some("p0")); // QB
        assert_eq!(ids[1], Some("p1")); // RB(1)
        assert_eq!(ids[2], Some("p2")); // RB(2)
        assert_eq!(ids[3], Some("p3")); // WR(1)
        // WR(2), WR(3), TE, FLEX(1), FLEX(2) empty.
        assert!(ids[4..9].iter().all(Option::is_none));
        assert_eq!(view.filled_count(), 4);
    }

    #[test]
    fn third_running_back_spills_into_flex() {
        use Position::*;
        let picks = picks_for_me(&[RunningBack, RunningBack, RunningBack]);
        let view = assign(&picks, 0, 7);
        let ids = slot_player_ids(&view);
        assert_eq!(ids[1], Some("p0")); // RB(1)
        assert_eq!(ids[2], Some("p1")); // RB(2)
        assert_eq!(ids[7], Some("p2")); // FLEX(1)
    }

    #[test]
    fn second_tight_end_spills_into_flex() {
        use Position::*;
        let picks = picks_for_me(&[TightEnd, TightEnd]);
        let view = assign(&picks, 0, 7);
        let ids = slot_player_ids(&view);
        assert_eq!(ids[6], Some("p0")); // TE
        assert_eq!(ids[7], Some("p1")); // FLEX(1)
    }

    #[test]
    fn second_quarterback_goes_to_bench_not_flex() {
        use Position::*;
        let picks = picks_for_me(&[Quarterback, Quarterback]);
        let view = assign(&picks, 0, 7);
        let ids = slot_player_ids(&view);
        assert_eq!(ids[0], Some("p0")); // QB
        assert!(ids[1..9].iter().all(Option::is_none));
        assert_eq!(ids[9], Some("p1")); // first bench slot
    }

    #[test]
    fn flex_consumes_in_draft_order_across_positions() {
        use Position::*;
        // Enough to fill RB/RB, WR/WR/WR, TE; the next flex-eligible picks in
        // draft order take the two FLEX slots.
        let picks = picks_for_me(&[
            RunningBack,
            RunningBack,
            WideReceiver,
            WideReceiver,
            WideReceiver,
            TightEnd,
            TightEnd,      // p6 -> FLEX(1)
            RunningBack,   // p7 -> FLEX(2)
            WideReceiver,  // p8 -> bench
        ]);
        let view = assign(&picks, 0, 7);
        let ids = slot_player_ids(&view);
        assert_eq!(ids[7], Some("p6"));
        assert_eq!(ids[8], Some("p7"));
        assert_eq!(ids[9], Some("p8"));
    }

    #[test]
    fn bench_fills_in_draft_order() {
        use Position::*;
        let picks = picks_for_me(&[
            Quarterback,
            Quarterback, // bench 1
            Quarterback, // bench 2
            Quarterback, // bench 3
        ]);
        let view = assign(&picks, 0, 3);
        let bench_ids: Vec<_> = view
            .bench()
            .iter()
            .map(|s| s.player.as_ref().map(|p| p.id.as_str()))
            .collect();
        assert_eq!(bench_ids, vec![Some("p1"), Some("p2"), Some("p3")]);
    }

    #[test]
    fn only_this_participants_picks_count() {
        use Position::*;
        let mut picks = picks_for_me(&[RunningBack]);
        picks.push(Pick {
            pick_number: 2,
            player: player("opp", RunningBack),
            participant_index: 5,
            timestamp: Utc::now(),
        });
        let view = assign(&picks, 0, 7);
        assert_eq!(view.filled_count(), 1);
        let opp_view = assign(&picks, 5, 7);
        assert_eq!(opp_view.filled_count(), 1);
        assert_eq!(
            opp_view.slots[1].player.as_ref().map(|p| p.id.as_str()),
            Some("opp")
        );
    }

    #[test]
    fn overflow_beyond_bench_is_still_projected() {
        use Position::*;
        let picks = picks_for_me(&[Quarterback, Quarterback, Quarterback]);
        let view = assign(&picks, 0, 1);
        assert_eq!(view.slots.len(), 9 + 2);
        assert_eq!(view.filled_count(), 3);
    }
}
