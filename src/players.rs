// Static player reference data: types and CSV loading.
//
// Reads the player reference CSV (id, name, position, team, ADP, bye week,
// projected points). Malformed rows are skipped with a warning rather than
// failing the whole load.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Fantasy-football positions eligible for drafting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Handles the standard abbreviations: "QB", "RB", "WR", "TE".
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
        }
    }

    /// Whether this position may occupy a FLEX roster slot (RB/WR/TE).
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A draftable player from the reference list.
///
/// Immutable once loaded. Owned by the pool until drafted, then by the pick
/// that claimed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable external identifier.
    pub id: String,
    pub name: String,
    pub position: Position,
    /// NFL team abbreviation (e.g. "KC", "SF").
    pub team: String,
    /// Average draft position. `None` when the player is unranked.
    pub adp: Option<f64>,
    pub bye_week: Option<u8>,
    pub projected_points: f64,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlayerDataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Raw player CSV row. ADP and bye are optional columns; extra columns the
/// data source includes are ignored.
#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    id: String,
    name: String,
    position: String,
    #[serde(default)]
    team: String,
    #[serde(default)]
    adp: Option<f64>,
    #[serde(default)]
    bye_week: Option<u8>,
    #[serde(default)]
    projected_points: f64,
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayerRow>() {
        match result {
            Ok(raw) => {
                let id = raw.id.trim().to_string();
                let name = raw.name.trim().to_string();
                if id.is_empty() || name.is_empty() {
                    warn!("skipping player row with empty id or name");
                    continue;
                }
                let position = match Position::from_str_pos(raw.position.trim()) {
                    Some(p) => p,
                    None => {
                        warn!(
                            "skipping player '{}': unknown position '{}'",
                            name, raw.position
                        );
                        continue;
                    }
                };
                let adp = match raw.adp {
                    Some(v) if !v.is_finite() => {
                        warn!("skipping player '{}': non-finite ADP value", name);
                        continue;
                    }
                    other => other,
                };
                players.push(Player {
                    id,
                    name,
                    position,
                    team: raw.team.trim().to_string(),
                    adp,
                    bye_week: raw.bye_week,
                    projected_points: raw.projected_points,
                });
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Public loading API
// ---------------------------------------------------------------------------

/// Load the static player reference list from a CSV file.
///
/// Rows with a missing id/name, an unknown position, or a non-finite ADP are
/// skipped with a warning. The returned order is the file's row order, which
/// the pool preserves as its tie-break order.
pub fn load_players(path: &Path) -> Result<Vec<Player>, PlayerDataError> {
    let file = std::fs::File::open(path).map_err(|e| PlayerDataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_players_from_reader(file).map_err(|e| PlayerDataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}
