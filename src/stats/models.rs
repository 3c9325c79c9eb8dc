use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// The JSON document served by `GET /api/games/{id}`. Only the fields the
/// pipeline consumes are modeled; `teamScores` is passed through verbatim.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatchPayload {
    pub map_name: String,
    #[serde(default)]
    pub team_scores: Value,
    #[serde(default)]
    pub player_stats: Vec<RawPlayerStats>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayerStats {
    pub steam64_id: String,
    pub name: String,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub total_kills: u32,
    #[serde(default)]
    pub total_assists: u32,
    #[serde(default)]
    pub total_deaths: u32,
    #[serde(default)]
    pub total_damage: u32,
    #[serde(default)]
    pub kd_ratio: f64,
    #[serde(default)]
    pub t_rounds_won: u32,
    #[serde(default)]
    pub ct_rounds_won: u32,
    #[serde(default)]
    pub t_rounds_lost: u32,
    #[serde(default)]
    pub ct_rounds_lost: u32,
}

/// One tracked player's stats with the round-outcome fields stripped; they
/// are consumed by the outcome derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub name: String,
    pub accuracy: f64,
    pub total_kills: u32,
    pub total_assists: u32,
    pub total_deaths: u32,
    pub total_damage: u32,
    pub kd_ratio: f64,
}

impl From<&RawPlayerStats> for PlayerSummary {
    fn from(player: &RawPlayerStats) -> Self {
        Self {
            name: player.name.clone(),
            accuracy: player.accuracy,
            total_kills: player.total_kills,
            total_assists: player.total_assists,
            total_deaths: player.total_deaths,
            total_damage: player.total_damage,
            kd_ratio: player.kd_ratio,
        }
    }
}

/// Match-level metadata. `match_won` is `None` (JSON `null`) on round ties
/// and when no tracked player took part.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub map: String,
    pub score: Value,
    pub match_won: Option<bool>,
}

/// Per-match result with a positional contract consumers rely on: player
/// summaries in payload order, then exactly one outcome record last. It
/// therefore serializes as a JSON array, not an object.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    pub players: Vec<PlayerSummary>,
    pub outcome: MatchOutcome,
}

impl Serialize for MatchReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.players.len() + 1))?;
        for player in &self.players {
            seq.serialize_element(player)?;
        }
        seq.serialize_element(&self.outcome)?;
        seq.end()
    }
}

/// Round totals are match-level: teammates carry the same match's counts,
/// so summing over the tracked players preserves the sign of the
/// comparison while keeping the derivation a single pure reduction.
pub fn derive_match_won(tracked: &[&RawPlayerStats]) -> Option<bool> {
    if tracked.is_empty() {
        return None;
    }

    let (won, lost) = tracked.iter().fold((0u32, 0u32), |(won, lost), player| {
        (
            won + player.t_rounds_won + player.ct_rounds_won,
            lost + player.t_rounds_lost + player.ct_rounds_lost,
        )
    });

    match won.cmp(&lost) {
        std::cmp::Ordering::Greater => Some(true),
        std::cmp::Ordering::Less => Some(false),
        std::cmp::Ordering::Equal => None,
    }
}
