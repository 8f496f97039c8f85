use crate::error::{AppError, Result};

pub const STATS_API_URL: &str = "https://statsapi.mlb.com/api/v1";

/// Schedule requests cover a whole season and can be slow upstream.
pub const SCHEDULE_TIMEOUT_SECS: u64 = 60;

/// Boxscore requests are small; fail fast and move on to the next game.
pub const BOXSCORE_TIMEOUT_SECS: u64 = 15;

/// Flat pause after each boxscore fetch. Not a rate limiter — it does not
/// account for request duration — just a bound on outbound request rate.
pub const BOXSCORE_DELAY_MS: u64 = 20;

/// A start shorter than this never reaches aggregation.
pub const MIN_INNINGS_PER_START: f64 = 4.0;

/// Quality start thresholds: at least 6 innings, at most 3 earned runs.
pub const QUALITY_START_MIN_IP: f64 = 6.0;
pub const QUALITY_START_MAX_ER: u32 = 3;

/// Default minimum games started for a pitcher to appear in leaderboards.
pub const DEFAULT_MIN_STARTS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub stats_api_url: String,
    pub log_level: String,
    pub api_port: u16,
    /// Seconds before a cached season collection is considered stale
    /// and re-fetched (CACHE_TTL_SECS).
    pub cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            stats_api_url: std::env::var("STATS_API_URL")
                .unwrap_or_else(|_| STATS_API_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse::<u64>()
                .unwrap_or(3600),
        })
    }
}
