//! Typed views of the MLB Stats API payloads.
//!
//! Every nested field the upstream schema does not guarantee is an Option or
//! defaults to empty, so the payload is validated exactly once at
//! deserialization and downstream code never re-navigates raw JSON.

use std::collections::HashMap;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// /schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleDate {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub games: Vec<ScheduledGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledGame {
    pub game_pk: u64,
    #[serde(default)]
    pub status: GameStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    #[serde(default)]
    pub detailed_state: String,
}

impl ScheduledGame {
    /// Only "Final" games carry complete stats. In-progress, postponed and
    /// cancelled games are excluded outright.
    pub fn is_final(&self) -> bool {
        self.status.detailed_state == "Final"
    }
}

// ---------------------------------------------------------------------------
// /game/{gamePk}/boxscore
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct Boxscore {
    #[serde(default)]
    pub teams: BoxscoreTeams,
    #[serde(default)]
    pub decisions: Decisions,
}

#[derive(Debug, Default, Deserialize)]
pub struct BoxscoreTeams {
    #[serde(default)]
    pub home: BoxscoreSide,
    #[serde(default)]
    pub away: BoxscoreSide,
}

#[derive(Debug, Default, Deserialize)]
pub struct BoxscoreSide {
    #[serde(default)]
    pub team: TeamInfo,
    /// Player ids in pitching order; the first entry is the starter.
    #[serde(default)]
    pub pitchers: Vec<u64>,
    /// Keyed as "ID{playerId}".
    #[serde(default)]
    pub players: HashMap<String, PlayerEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamInfo {
    #[serde(default)]
    pub abbreviation: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerEntry {
    #[serde(default)]
    pub person: Person,
    pub stats: Option<PlayerStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default = "unknown_name")]
    pub full_name: String,
}

impl Default for Person {
    fn default() -> Self {
        Self {
            full_name: unknown_name(),
        }
    }
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerStats {
    pub pitching: Option<PitchingLine>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchingLine {
    /// Reported as a string, e.g. "6.1".
    #[serde(default)]
    pub innings_pitched: Option<String>,
    #[serde(default)]
    pub earned_runs: Option<u32>,
    #[serde(default)]
    pub hits: Option<u32>,
    #[serde(default)]
    pub base_on_balls: Option<u32>,
    #[serde(default)]
    pub strike_outs: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Decisions {
    pub winner: Option<PersonRef>,
    pub loser: Option<PersonRef>,
}

#[derive(Debug, Deserialize)]
pub struct PersonRef {
    pub id: u64,
}

impl BoxscoreSide {
    /// Per-game pitching line for the first-listed pitcher, if both the
    /// pitching order and that player's stats block are present.
    pub fn starter(&self) -> Option<(u64, &PlayerEntry, &PitchingLine)> {
        let starter_id = *self.pitchers.first()?;
        let entry = self.players.get(&format!("ID{starter_id}"))?;
        let line = entry.stats.as_ref()?.pitching.as_ref()?;
        Some((starter_id, entry, line))
    }
}
