use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::types::{Decision, PitcherStart, SeasonStat};

pub const NO_WASTED_STARTS: &str = "No wasted starts";

#[derive(Debug, Default)]
struct Totals {
    games_started: u32,
    ip: f64,
    er: u32,
    h: u32,
    bb: u32,
    so: u32,
    quality_starts: u32,
    wasted_starts: u32,
    wins: u32,
    losses: u32,
}

/// Roll start records up into one season row per (pitcher, team) with at
/// least `min_starts` games started.
///
/// Pure function of its inputs; rows come back in (name, team) key order,
/// presentation decides the display sort. A group whose innings sum to zero
/// is malformed input (every record passed the per-start innings floor) and
/// surfaces as `ZeroInnings` rather than dividing by zero.
pub fn aggregate(records: &[PitcherStart], min_starts: u32) -> Result<Vec<SeasonStat>> {
    let mut groups: BTreeMap<(String, String), Totals> = BTreeMap::new();

    for rec in records {
        let totals = groups
            .entry((rec.pitcher_name.clone(), rec.team.clone()))
            .or_default();
        totals.games_started += 1;
        totals.ip += rec.ip;
        totals.er += rec.er;
        totals.h += rec.h;
        totals.bb += rec.bb;
        totals.so += rec.so;
        totals.quality_starts += rec.quality_start as u32;
        totals.wasted_starts += rec.wasted_start as u32;
        match rec.decision {
            Decision::Win => totals.wins += 1,
            Decision::Loss => totals.losses += 1,
            Decision::NoDecision => {}
        }
    }

    let mut rows = Vec::new();
    for ((name, team), t) in groups {
        if t.games_started < min_starts {
            continue;
        }
        if t.ip <= 0.0 {
            return Err(AppError::ZeroInnings { pitcher: name, team });
        }

        let era = round2(t.er as f64 * 9.0 / t.ip);
        let whip = round2((t.h + t.bb) as f64 / t.ip);
        let quality_start_rate = round1(t.quality_starts as f64 / t.games_started as f64 * 100.0);
        let wasted_start_rate = if t.quality_starts == 0 {
            0.0
        } else {
            round1(t.wasted_starts as f64 / t.quality_starts as f64 * 100.0)
        };

        rows.push(SeasonStat {
            name,
            team,
            games_started: t.games_started,
            innings_pitched: t.ip,
            earned_runs: t.er,
            hits: t.h,
            walks: t.bb,
            strikeouts: t.so,
            quality_starts: t.quality_starts,
            wasted_starts: t.wasted_starts,
            wins: t.wins,
            losses: t.losses,
            era,
            whip,
            quality_start_rate,
            wasted_start_rate,
            wasted_start_example: None,
        });
    }

    Ok(rows)
}

/// Attach each pitcher's earliest wasted start as a formatted example, or
/// the fixed "No wasted starts" marker. Matches records by pitcher name —
/// the stable lookup key the presentation layer searches on.
pub fn attach_examples(records: &[PitcherStart], rows: &mut [SeasonStat]) {
    for row in rows {
        let earliest = records
            .iter()
            .filter(|r| r.wasted_start && r.pitcher_name == row.name)
            .min_by(|a, b| a.game_date.cmp(&b.game_date));

        row.wasted_start_example = Some(match earliest {
            Some(r) => format!(
                "{} (IP:{:.1}, ER:{}, Dec:{})",
                r.game_date, r.ip, r.er, r.decision
            ),
            None => NO_WASTED_STARTS.to_string(),
        });
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
