// Pick and participant records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::players::Player;

/// A draft participant. The index is the seat number used by the snake
/// ordering and is stable for the draft's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub index: usize,
}

/// A single committed draft pick.
///
/// Created exactly once per pick number and never mutated or deleted. The
/// ordered sequence of picks is the draft's single source of truth; rosters,
/// board views, and exposure are pure projections of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    /// Sequential pick number (1-indexed, global across rounds).
    pub pick_number: u32,
    /// The drafted player, owned by this pick from commit onward.
    pub player: Player,
    /// Seat of the participant who made (or was assigned) the pick.
    pub participant_index: usize,
    /// When the pick was committed.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::Position;

    #[test]
    fn pick_creation() {
        let pick = Pick {
            pick_number: 1,
            player: Player {
                id: "p1".into(),
                name: "Christian McCaffrey".into(),
                position: Position::RunningBack,
                team: "SF".into(),
                adp: Some(1.2),
                bye_week: Some(9),
                projected_points: 322.0,
            },
            participant_index: 0,
            timestamp: Utc::now(),
        };
        assert_eq!(pick.pick_number, 1);
        assert_eq!(pick.participant_index, 0);
        assert_eq!(pick.player.id, "p1");
    }
}
