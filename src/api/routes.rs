use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregator::{aggregate, attach_examples};
use crate::api::health::HealthState;
use crate::cache::SeasonCache;
use crate::collector::Collector;
use crate::config::DEFAULT_MIN_STARTS;
use crate::error::AppError;
use crate::types::{League, PitcherStart, SeasonStat};

#[derive(Clone)]
pub struct ApiState {
    pub collector: Arc<Collector>,
    pub cache: Arc<SeasonCache>,
    pub health: Arc<HealthState>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/stats", get(get_stats))
        .route("/api/stats/summary", get(get_summary))
        .route("/api/pitchers/:name", get(get_pitcher))
        .route("/health", get(get_health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct StatsQuery {
    pub year: u16,
    pub league: Option<String>,
    pub min_starts: Option<u32>,
}

#[derive(Deserialize)]
pub struct PitcherQuery {
    pub year: u16,
    pub league: Option<String>,
}

// ---------------------------------------------------------------------------
// Response types — display-column projection of SeasonStat
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct StatRowResponse {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "GS")]
    pub games_started: u32,
    #[serde(rename = "W")]
    pub wins: u32,
    #[serde(rename = "L")]
    pub losses: u32,
    #[serde(rename = "ERA")]
    pub era: f64,
    #[serde(rename = "IP")]
    pub innings_pitched: f64,
    #[serde(rename = "SO")]
    pub strikeouts: u32,
    #[serde(rename = "BB")]
    pub walks: u32,
    #[serde(rename = "WHIP")]
    pub whip: f64,
    #[serde(rename = "QS%")]
    pub quality_start_rate: f64,
    #[serde(rename = "Wasted%")]
    pub wasted_start_rate: f64,
    #[serde(rename = "Quality_Starts")]
    pub quality_starts: u32,
    #[serde(rename = "Wasted_Starts")]
    pub wasted_starts: u32,
    #[serde(rename = "Wasted_Start_Example", skip_serializing_if = "Option::is_none")]
    pub wasted_start_example: Option<String>,
}

impl From<SeasonStat> for StatRowResponse {
    fn from(row: SeasonStat) -> Self {
        Self {
            name: row.name,
            team: row.team,
            games_started: row.games_started,
            wins: row.wins,
            losses: row.losses,
            era: row.era,
            innings_pitched: row.innings_pitched,
            strikeouts: row.strikeouts,
            walks: row.walks,
            whip: row.whip,
            quality_start_rate: row.quality_start_rate,
            wasted_start_rate: row.wasted_start_rate,
            quality_starts: row.quality_starts,
            wasted_starts: row.wasted_starts,
            wasted_start_example: row.wasted_start_example,
        }
    }
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub total_quality_starts: u32,
    pub total_wasted_starts: u32,
    /// League-wide wasted starts per quality start, percent to 1 decimal.
    pub league_wasted_rate: f64,
    pub qualified_pitchers: usize,
    pub pitchers_with_wasted_starts: usize,
}

#[derive(Serialize)]
pub struct WastedGameResponse {
    pub game_date: String,
    pub ip: f64,
    pub er: u32,
    pub h: u32,
    pub bb: u32,
    pub so: u32,
    pub decision: String,
}

#[derive(Serialize)]
pub struct PitcherLookupResponse {
    pub matches: Vec<StatRowResponse>,
    /// Full wasted-start game log for the matched pitchers, by date.
    pub wasted_games: Vec<WastedGameResponse>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_stats(
    State(state): State<ApiState>,
    Query(params): Query<StatsQuery>,
) -> Result<Response, AppError> {
    state.health.inc_requests();
    let records = season_records(&state, params.year, league_of(&params.league)).await?;
    if records.is_empty() {
        return Ok(no_data_response());
    }

    let min_starts = params.min_starts.unwrap_or(DEFAULT_MIN_STARTS);
    let mut rows = aggregate(&records, min_starts)?;
    attach_examples(&records, &mut rows);
    rows.sort_by(|a, b| b.wasted_starts.cmp(&a.wasted_starts));

    let body: Vec<StatRowResponse> = rows.into_iter().map(StatRowResponse::from).collect();
    Ok(Json(body).into_response())
}

async fn get_summary(
    State(state): State<ApiState>,
    Query(params): Query<StatsQuery>,
) -> Result<Response, AppError> {
    state.health.inc_requests();
    let records = season_records(&state, params.year, league_of(&params.league)).await?;
    if records.is_empty() {
        return Ok(no_data_response());
    }

    let total_quality_starts = records.iter().filter(|r| r.quality_start).count() as u32;
    let total_wasted_starts = records.iter().filter(|r| r.wasted_start).count() as u32;
    let league_wasted_rate = if total_quality_starts == 0 {
        0.0
    } else {
        let rate = total_wasted_starts as f64 / total_quality_starts as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    };

    let min_starts = params.min_starts.unwrap_or(DEFAULT_MIN_STARTS);
    let rows = aggregate(&records, min_starts)?;

    Ok(Json(SummaryResponse {
        total_quality_starts,
        total_wasted_starts,
        league_wasted_rate,
        qualified_pitchers: rows.len(),
        pitchers_with_wasted_starts: rows.iter().filter(|r| r.wasted_starts > 0).count(),
    })
    .into_response())
}

async fn get_pitcher(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Query(params): Query<PitcherQuery>,
) -> Result<Response, AppError> {
    state.health.inc_requests();
    let records = season_records(&state, params.year, league_of(&params.league)).await?;
    if records.is_empty() {
        return Ok(no_data_response());
    }

    // Lookup has no leaderboard threshold — every start counts.
    let mut rows = aggregate(&records, 1)?;
    attach_examples(&records, &mut rows);

    let needle = name.to_lowercase();
    let matches: Vec<SeasonStat> = rows
        .into_iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect();
    if matches.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "No pitchers found matching your search" })),
        )
            .into_response());
    }

    let mut wasted_games: Vec<&PitcherStart> = records
        .iter()
        .filter(|r| r.wasted_start && matches.iter().any(|m| m.name == r.pitcher_name))
        .collect();
    wasted_games.sort_by(|a, b| a.game_date.cmp(&b.game_date));

    Ok(Json(PitcherLookupResponse {
        matches: matches.into_iter().map(StatRowResponse::from).collect(),
        wasted_games: wasted_games
            .into_iter()
            .map(|r| WastedGameResponse {
                game_date: r.game_date.clone(),
                ip: r.ip,
                er: r.er,
                h: r.h,
                bb: r.bb,
                so: r.so,
                decision: r.decision.to_string(),
            })
            .collect(),
    })
    .into_response())
}

async fn get_health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "uptime_secs": state.health.uptime_secs(),
        "seasons_cached": state.cache.season_count(),
        "requests_served": state.health.requests_served(),
        "last_collection_at": state.health.last_collection_at(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn league_of(param: &Option<String>) -> League {
    param
        .as_deref()
        .map(League::parse_or_default)
        .unwrap_or(League::Mlb)
}

/// Serve start records from the cache, collecting from the upstream API on a
/// miss. Collection is sequential and can take a while for a full season;
/// the cache keeps repeat requests off the network.
async fn season_records(
    state: &ApiState,
    year: u16,
    league: League,
) -> Result<Arc<Vec<PitcherStart>>, AppError> {
    if let Some(records) = state.cache.get(year, league) {
        return Ok(records);
    }

    let (records, _) = state.collector.collect(year, league).await?;
    state.health.mark_collection();
    info!("Caching {} starts for {year} {league}", records.len());
    Ok(state.cache.insert(year, league, records))
}

fn no_data_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "No data available for the selected year and league"
        })),
    )
        .into_response()
}
