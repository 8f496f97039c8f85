use serde::{Deserialize, Serialize};

use crate::config::{QUALITY_START_MAX_ER, QUALITY_START_MIN_IP};

// ---------------------------------------------------------------------------
// League
// ---------------------------------------------------------------------------

/// Leagues the MLB Stats API exposes under distinct sport ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum League {
    Mlb,
    TripleA,
    DoubleA,
    HighA,
    LowA,
}

impl League {
    pub fn sport_id(self) -> u32 {
        match self {
            League::Mlb => 1,
            League::TripleA => 11,
            League::DoubleA => 12,
            League::HighA => 13,
            League::LowA => 14,
        }
    }

    /// Unrecognized input falls back to MLB rather than failing —
    /// the league selector is advisory, not a validity gate.
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "triple-a" => League::TripleA,
            "double-a" => League::DoubleA,
            "high-a" => League::HighA,
            "low-a" => League::LowA,
            _ => League::Mlb,
        }
    }
}

impl std::fmt::Display for League {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            League::Mlb => "mlb",
            League::TripleA => "triple-a",
            League::DoubleA => "double-a",
            League::HighA => "high-a",
            League::LowA => "low-a",
        };
        write!(f, "{s}")
    }
}

/// Regular-season date window for each supported season.
/// Years outside this set are rejected up front by the collector.
pub fn season_window(year: u16) -> Option<(&'static str, &'static str)> {
    match year {
        2023 => Some(("2023-03-30", "2023-10-01")),
        2024 => Some(("2024-03-28", "2024-09-29")),
        2025 => Some(("2025-03-27", "2025-09-29")),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
    #[serde(rename = "ND")]
    NoDecision,
}

impl Decision {
    /// Classify by comparing the starter's id against the game's credited
    /// winner/loser ids (either may be absent, e.g. suspended decisions).
    pub fn classify(starter_id: u64, winner_id: Option<u64>, loser_id: Option<u64>) -> Self {
        if winner_id == Some(starter_id) {
            Decision::Win
        } else if loser_id == Some(starter_id) {
            Decision::Loss
        } else {
            Decision::NoDecision
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Decision::Win => "W",
            Decision::Loss => "L",
            Decision::NoDecision => "ND",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// PitcherStart — one record per starting pitcher per completed game
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitcherStart {
    pub pitcher_name: String,
    pub team: String,
    /// Schedule date, YYYY-MM-DD. Lexicographic order is date order.
    pub game_date: String,
    pub game_pk: u64,
    /// Innings pitched as the API reports it: outs encoded as tenths
    /// ("6.1" = 6 innings, 1 out), parsed and summed as a plain decimal.
    pub ip: f64,
    pub er: u32,
    pub h: u32,
    pub bb: u32,
    pub so: u32,
    pub decision: Decision,
    pub quality_start: bool,
    pub wasted_start: bool,
}

/// At least 6 innings with at most 3 earned runs.
pub fn is_quality_start(ip: f64, er: u32) -> bool {
    ip >= QUALITY_START_MIN_IP && er <= QUALITY_START_MAX_ER
}

/// A quality start the starter did not win.
pub fn is_wasted_start(quality_start: bool, decision: Decision) -> bool {
    quality_start && decision != Decision::Win
}

// ---------------------------------------------------------------------------
// SeasonStat — one row per (pitcher, team) meeting the min-starts threshold
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStat {
    pub name: String,
    pub team: String,
    pub games_started: u32,
    pub innings_pitched: f64,
    pub earned_runs: u32,
    pub hits: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub quality_starts: u32,
    pub wasted_starts: u32,
    pub wins: u32,
    pub losses: u32,
    /// Earned runs per 9 innings, rounded to 2 decimals.
    pub era: f64,
    /// (Hits + walks) per inning, rounded to 2 decimals.
    pub whip: f64,
    /// Quality starts per game started, as a percentage to 1 decimal.
    pub quality_start_rate: f64,
    /// Wasted starts per quality start, as a percentage to 1 decimal.
    /// Defined as 0.0 when quality_starts is 0.
    pub wasted_start_rate: f64,
    /// Earliest wasted start, formatted for display; None until attached.
    pub wasted_start_example: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_start_boundaries() {
        assert!(is_quality_start(6.0, 3));
        assert!(is_quality_start(9.0, 0));
        assert!(!is_quality_start(5.2, 0));
        assert!(!is_quality_start(7.0, 4));
    }

    #[test]
    fn wasted_requires_quality_and_no_win() {
        assert!(is_wasted_start(true, Decision::Loss));
        assert!(is_wasted_start(true, Decision::NoDecision));
        assert!(!is_wasted_start(true, Decision::Win));
        assert!(!is_wasted_start(false, Decision::Loss));
    }

    #[test]
    fn decision_from_credited_ids() {
        assert_eq!(Decision::classify(7, Some(7), Some(9)), Decision::Win);
        assert_eq!(Decision::classify(9, Some(7), Some(9)), Decision::Loss);
        assert_eq!(Decision::classify(5, Some(7), Some(9)), Decision::NoDecision);
        assert_eq!(Decision::classify(5, None, None), Decision::NoDecision);
    }

    #[test]
    fn league_parse_defaults_to_mlb() {
        assert_eq!(League::parse_or_default("triple-a"), League::TripleA);
        assert_eq!(League::parse_or_default("MLB"), League::Mlb);
        assert_eq!(League::parse_or_default("korean-league"), League::Mlb);
        assert_eq!(League::Mlb.sport_id(), 1);
        assert_eq!(League::LowA.sport_id(), 14);
    }

    #[test]
    fn season_windows_cover_supported_years_only() {
        assert_eq!(season_window(2024), Some(("2024-03-28", "2024-09-29")));
        assert!(season_window(2022).is_none());
        assert!(season_window(2026).is_none());
    }
}
