mod aggregator;
mod api;
mod cache;
mod collector;
mod config;
mod error;
mod schema;
mod types;

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::routes::{router, ApiState};
use crate::cache::SeasonCache;
use crate::collector::Collector;
use crate::config::Config;
use crate::error::Result;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let collector = Arc::new(Collector::new(cfg.stats_api_url.clone())?);
    let cache = SeasonCache::new(Duration::from_secs(cfg.cache_ttl_secs));
    let health = Arc::new(HealthState::new());

    info!(
        "Stats API at {}, season cache TTL {}s",
        cfg.stats_api_url, cfg.cache_ttl_secs
    );

    let api_state = ApiState {
        collector,
        cache,
        health,
    };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
