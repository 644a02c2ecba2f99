// Live ranking feed: fetch and merge over the static player list.
//
// The feed is a JSON object keyed by player id, each entry carrying the
// current ADP. It is fetched once at startup, before the engine exists;
// ranking updates mid-draft are not part of the pick-processing path.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::players::Player;

/// How long to wait for the ranking feed before giving up and falling back
/// to the static ADP values.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum RankingsError {
    #[error("ranking feed request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// One entry in the live ranking feed.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingEntry {
    pub adp: f64,
}

/// Fetch the live ranking feed from `url`.
///
/// The response body is a JSON object mapping player id to a ranking entry:
/// `{"p1": {"adp": 1.4}, "p2": {"adp": 2.8}, ...}`.
pub async fn fetch_live_rankings(
    url: &str,
) -> Result<HashMap<String, RankingEntry>, RankingsError> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    let rankings: HashMap<String, RankingEntry> =
        client.get(url).send().await?.error_for_status()?.json().await?;
    info!("fetched live rankings for {} players", rankings.len());
    Ok(rankings)
}

/// Merge live rankings over the static player list, keyed by player id.
///
/// A live value always wins; players absent from the feed keep their static
/// ADP. Non-finite feed values are ignored with a warning. Returns the number
/// of players whose ADP was overridden.
pub fn apply_rankings(players: &mut [Player], rankings: &HashMap<String, RankingEntry>) -> usize {
    let mut applied = 0;
    for player in players.iter_mut() {
        if let Some(entry) = rankings.get(&player.id) {
            if !entry.adp.is_finite() {
                warn!(
                    "ignoring non-finite live ADP for player '{}' ({})",
                    player.name, player.id
                );
                continue;
            }
            player.adp = Some(entry.adp);
            applied += 1;
        }
    }
    applied
}
