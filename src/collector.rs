use std::time::Duration;

use tracing::{info, warn};

use crate::config::{
    BOXSCORE_DELAY_MS, BOXSCORE_TIMEOUT_SECS, MIN_INNINGS_PER_START, SCHEDULE_TIMEOUT_SECS,
};
use crate::error::{AppError, Result};
use crate::schema::{Boxscore, ScheduleResponse};
use crate::types::{is_quality_start, is_wasted_start, season_window, Decision, League, PitcherStart};

#[derive(Debug, Default)]
pub struct CollectStats {
    pub games_final: usize,
    pub games_skipped_not_final: usize,
    pub boxscore_failures: usize,
    pub sides_missing_starter: usize,
    pub short_starts: usize,
    pub starts: usize,
}

/// Sequential collector for a season's starting-pitcher lines.
///
/// One outstanding request at a time: the season schedule first, then each
/// Final game's boxscore in schedule order, with a flat pause between
/// boxscores to bound the outbound request rate.
pub struct Collector {
    client: reqwest::Client,
    base_url: String,
}

impl Collector {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SCHEDULE_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Collect every qualifying start for `(year, league)`.
    ///
    /// An unsupported year fails fast with `UnsupportedSeason`; a schedule
    /// fetch failure aborts the whole collection; a single boxscore failure
    /// only drops that game. A supported season with no qualifying starts
    /// returns an empty collection, which is not an error.
    pub async fn collect(&self, year: u16, league: League) -> Result<(Vec<PitcherStart>, CollectStats)> {
        let (start_date, end_date) =
            season_window(year).ok_or(AppError::UnsupportedSeason(year))?;
        let sport_id = league.sport_id();

        info!("Fetching {year} {league} regular season games ({start_date}..{end_date})");

        let url = format!(
            "{}/schedule?sportId={}&startDate={}&endDate={}&gameType=R",
            self.base_url, sport_id, start_date, end_date
        );
        let schedule: ScheduleResponse = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Schedule(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Schedule(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::Schedule(e.to_string()))?;

        let mut starts = Vec::new();
        let mut stats = CollectStats::default();

        for date_info in &schedule.dates {
            for game in &date_info.games {
                if !game.is_final() {
                    stats.games_skipped_not_final += 1;
                    continue;
                }
                stats.games_final += 1;

                match self.fetch_boxscore(game.game_pk).await {
                    Ok(box_data) => {
                        extract_starts(&box_data, &date_info.date, game.game_pk, &mut starts, &mut stats);
                    }
                    Err(e) => {
                        stats.boxscore_failures += 1;
                        warn!("Error fetching boxscore for game {}: {e}", game.game_pk);
                    }
                }

                tokio::time::sleep(Duration::from_millis(BOXSCORE_DELAY_MS)).await;
            }
        }

        stats.starts = starts.len();
        info!(
            "Collected {} starts from {} final games ({} not final, {} boxscore failures, {} sides without starter stats, {} short starts dropped)",
            stats.starts,
            stats.games_final,
            stats.games_skipped_not_final,
            stats.boxscore_failures,
            stats.sides_missing_starter,
            stats.short_starts,
        );

        Ok((starts, stats))
    }

    async fn fetch_boxscore(&self, game_pk: u64) -> Result<Boxscore> {
        let url = format!("{}/game/{}/boxscore", self.base_url, game_pk);
        let box_data = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(BOXSCORE_TIMEOUT_SECS))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(box_data)
    }
}

/// Extract up to two start records (home and away) from one Final boxscore.
/// A side with no pitching order or no stats for its first-listed pitcher is
/// skipped without failing the game.
fn extract_starts(
    box_data: &Boxscore,
    game_date: &str,
    game_pk: u64,
    out: &mut Vec<PitcherStart>,
    stats: &mut CollectStats,
) {
    let winner_id = box_data.decisions.winner.as_ref().map(|p| p.id);
    let loser_id = box_data.decisions.loser.as_ref().map(|p| p.id);

    for side in [&box_data.teams.home, &box_data.teams.away] {
        let Some((starter_id, entry, line)) = side.starter() else {
            stats.sides_missing_starter += 1;
            continue;
        };

        let ip: f64 = line
            .innings_pitched
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);
        let er = line.earned_runs.unwrap_or(0);

        if ip < MIN_INNINGS_PER_START {
            stats.short_starts += 1;
            continue;
        }

        let decision = Decision::classify(starter_id, winner_id, loser_id);
        let quality_start = is_quality_start(ip, er);
        let wasted_start = is_wasted_start(quality_start, decision);

        out.push(PitcherStart {
            pitcher_name: entry.person.full_name.clone(),
            team: side.team.abbreviation.clone(),
            game_date: game_date.to_string(),
            game_pk,
            ip,
            er,
            h: line.hits.unwrap_or(0),
            bb: line.base_on_balls.unwrap_or(0),
            so: line.strike_outs.unwrap_or(0),
            decision,
            quality_start,
            wasted_start,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side_json(abbr: &str, starter_id: u64, name: &str, ip: &str, er: u32) -> serde_json::Value {
        let mut players = serde_json::Map::new();
        players.insert(
            format!("ID{starter_id}"),
            serde_json::json!({
                "person": { "fullName": name },
                "stats": {
                    "pitching": {
                        "inningsPitched": ip,
                        "earnedRuns": er,
                        "hits": 6,
                        "baseOnBalls": 2,
                        "strikeOuts": 7
                    }
                }
            }),
        );
        serde_json::json!({
            "team": { "abbreviation": abbr },
            "pitchers": [starter_id, 999],
            "players": players
        })
    }

    fn boxscore(home: serde_json::Value, away: serde_json::Value, winner: Option<u64>, loser: Option<u64>) -> Boxscore {
        let mut decisions = serde_json::Map::new();
        if let Some(w) = winner {
            decisions.insert("winner".into(), serde_json::json!({ "id": w }));
        }
        if let Some(l) = loser {
            decisions.insert("loser".into(), serde_json::json!({ "id": l }));
        }
        serde_json::from_value(serde_json::json!({
            "teams": { "home": home, "away": away },
            "decisions": decisions
        }))
        .unwrap()
    }

    #[test]
    fn extracts_both_sides_with_decisions() {
        let box_data = boxscore(
            side_json("NYY", 1, "Home Ace", "7.0", 2),
            side_json("BOS", 2, "Away Ace", "6.0", 3),
            Some(1),
            Some(2),
        );
        let mut out = Vec::new();
        let mut stats = CollectStats::default();
        extract_starts(&box_data, "2024-05-01", 777, &mut out, &mut stats);

        assert_eq!(out.len(), 2);
        let home = &out[0];
        assert_eq!(home.pitcher_name, "Home Ace");
        assert_eq!(home.team, "NYY");
        assert_eq!(home.game_pk, 777);
        assert_eq!(home.decision, Decision::Win);
        assert!(home.quality_start);
        assert!(!home.wasted_start);

        let away = &out[1];
        assert_eq!(away.decision, Decision::Loss);
        assert!(away.quality_start);
        assert!(away.wasted_start);
    }

    #[test]
    fn short_start_is_dropped() {
        let box_data = boxscore(
            side_json("NYY", 1, "Short Outing", "3.2", 5),
            side_json("BOS", 2, "Away Ace", "6.0", 1),
            None,
            None,
        );
        let mut out = Vec::new();
        let mut stats = CollectStats::default();
        extract_starts(&box_data, "2024-05-01", 778, &mut out, &mut stats);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pitcher_name, "Away Ace");
        assert_eq!(stats.short_starts, 1);
    }

    #[test]
    fn no_decision_when_starter_not_credited() {
        let box_data = boxscore(
            side_json("NYY", 1, "Home Ace", "7.0", 1),
            side_json("BOS", 2, "Away Ace", "6.2", 2),
            Some(50),
            Some(51),
        );
        let mut out = Vec::new();
        let mut stats = CollectStats::default();
        extract_starts(&box_data, "2024-05-01", 779, &mut out, &mut stats);

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|s| s.decision == Decision::NoDecision));
        assert!(out.iter().all(|s| s.wasted_start));
    }

    #[test]
    fn side_without_pitchers_is_skipped() {
        let empty_side = serde_json::json!({ "team": { "abbreviation": "TB" }, "pitchers": [], "players": {} });
        let box_data = boxscore(
            side_json("NYY", 1, "Home Ace", "6.0", 0),
            empty_side,
            None,
            None,
        );
        let mut out = Vec::new();
        let mut stats = CollectStats::default();
        extract_starts(&box_data, "2024-05-01", 780, &mut out, &mut stats);

        assert_eq!(out.len(), 1);
        assert_eq!(stats.sides_missing_starter, 1);
    }

    #[test]
    fn unparseable_innings_counts_as_zero_and_drops() {
        let box_data = boxscore(
            side_json("NYY", 1, "Bad Line", "n/a", 0),
            side_json("BOS", 2, "Away Ace", "6.0", 1),
            None,
            None,
        );
        let mut out = Vec::new();
        let mut stats = CollectStats::default();
        extract_starts(&box_data, "2024-05-01", 781, &mut out, &mut stats);

        assert_eq!(out.len(), 1);
        assert_eq!(stats.short_starts, 1);
    }
}
