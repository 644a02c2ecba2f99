// The undrafted player pool.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::players::Player;

#[derive(Debug, Error, PartialEq)]
pub enum PoolError {
    #[error("player '{0}' is not in the pool")]
    NotFound(String),

    #[error("the pool is empty")]
    Empty,
}

/// The mutable set of undrafted players.
///
/// Players are stored in input order; that order is the tie-break for
/// equal-ranked players and never changes between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPool {
    players: Vec<Player>,
}

impl PlayerPool {
    pub fn new(players: Vec<Player>) -> Self {
        PlayerPool { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// All undrafted players, in input order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Whether the given player is still undrafted.
    pub fn contains(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    /// Atomically remove and return the player with the given id.
    pub fn take(&mut self, player_id: &str) -> Result<Player, PoolError> {
        match self.players.iter().position(|p| p.id == player_id) {
            Some(idx) => Ok(self.players.remove(idx)),
            None => Err(PoolError::NotFound(player_id.to_string())),
        }
    }

    /// The best available player under ascending ADP, without removing it.
    ///
    /// A missing ADP sorts as worst-possible. Ties keep the earliest player
    /// in input order, so repeated calls always return the same player.
    pub fn peek_best_available(&self) -> Result<&Player, PoolError> {
        self.peek_min_by_key(ranking_key)
    }

    /// The pool's minimum element under the supplied ordering key, without
    /// removing it. Ties keep the earliest player in input order.
    pub fn peek_min_by_key(&self, key: impl Fn(&Player) -> f64) -> Result<&Player, PoolError> {
        // Strictly-less scan: on equal keys the earlier player wins.
        let mut best: Option<&Player> = None;
        for player in &self.players {
            match best {
                Some(b) if key(player).total_cmp(&key(b)).is_lt() => {
                    best = Some(player);
                }
                None => best = Some(player),
                _ => {}
            }
        }
        best.ok_or(PoolError::Empty)
    }
}

/// Default auto-pick ordering key: ascending ADP, unranked last.
fn ranking_key(player: &Player) -> f64 {
    player.adp.unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::Position;

    fn player(id: &str, adp: Option<f64>) -> Player {
        Player {
            id: id.to_string(),
            name: format!("Player {id}"),
            position: Position::WideReceiver,
            team: "FA".to_string(),
            adp,
            bye_week: None,
            projected_points: 0.0,
        }
    }

    fn pool(specs: &[(&str, Option<f64>)]) -> PlayerPool {
        PlayerPool::new(specs.iter().map(|(id, adp)| player(id, *adp)).collect())
    }

    #[test]
    fn take_removes_and_returns() {
        let mut pool = pool(&[("p1", Some(1.0)), ("p2", Some(2.0))]);
        let taken = pool.take("p1").unwrap();
        assert_eq!(taken.id, "p1");
        assert_eq!(pool.len(), 1);
        assert!(!pool.contains("p1"));
        assert!(pool.contains("p2"));
    }

    #[test]
    fn take_unknown_id_fails() {
        let mut pool = pool(&[("p1", Some(1.0))]);
        assert_eq!(
            pool.take("nope"),
            Err(PoolError::NotFound("nope".to_string()))
        );
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn take_twice_fails_second_time() {
        let mut pool = pool(&[("p1", Some(1.0))]);
        assert!(pool.take("p1").is_ok());
        assert_eq!(pool.take("p1"), Err(PoolError::NotFound("p1".to_string())));
    }

    #[test]
    fn peek_best_returns_lowest_adp() {
        let pool = pool(&[("p1", Some(9.0)), ("p2", Some(2.5)), ("p3", Some(4.0))]);
        assert_eq!(pool.peek_best_available().unwrap().id, "p2");
    }

    #[test]
    fn peek_best_does_not_remove() {
        let pool = pool(&[("p1", Some(1.0))]);
        assert_eq!(pool.peek_best_available().unwrap().id, "p1");
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.peek_best_available().unwrap().id, "p1");
    }

    #[test]
    fn missing_adp_sorts_worst() {
        let pool = pool(&[("unranked", None), ("ranked", Some(200.0))]);
        assert_eq!(pool.peek_best_available().unwrap().id, "ranked");
    }

    #[test]
    fn all_unranked_falls_back_to_input_order() {
        let pool = pool(&[("p1", None), ("p2", None)]);
        assert_eq!(pool.peek_best_available().unwrap().id, "p1");
    }

    #[test]
    fn ties_keep_stable_input_order() {
        let pool = pool(&[("first", Some(5.0)), ("second", Some(5.0))]);
        for _ in 0..3 {
            assert_eq!(pool.peek_best_available().unwrap().id, "first");
        }
    }

    #[test]
    fn peek_min_by_key_supports_custom_orderings() {
        let mut a = player("a", Some(1.0));
        a.projected_points = 120.0;
        let mut b = player("b", Some(2.0));
        b.projected_points = 310.0;
        let pool = PlayerPool::new(vec![a, b]);
        // Highest projection wins under a negated key, regardless of ADP.
        let best = pool.peek_min_by_key(|p| -p.projected_points).unwrap();
        assert_eq!(best.id, "b");
    }

    #[test]
    fn peek_best_on_empty_pool_fails() {
        let pool = PlayerPool::new(vec![]);
        assert_eq!(pool.peek_best_available().err(), Some(PoolError::Empty));
    }
}
