use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::types::{League, PitcherStart};

#[derive(Clone)]
struct CacheEntry {
    records: Arc<Vec<PitcherStart>>,
    fetched_at: Instant,
}

/// Explicit season cache keyed by (year, league).
///
/// Collection walks an entire season of boxscores, so repeated identical
/// requests must not re-hit the upstream API. Entries expire after a fixed
/// TTL; a stale entry is dropped on read and the caller re-collects.
pub struct SeasonCache {
    entries: DashMap<(u16, League), CacheEntry>,
    ttl: Duration,
}

impl SeasonCache {
    pub fn new(ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            entries: DashMap::new(),
            ttl,
        })
    }

    pub fn get(&self, year: u16, league: League) -> Option<Arc<Vec<PitcherStart>>> {
        let key = (year, league);
        let entry = self.entries.get(&key)?;
        if entry.fetched_at.elapsed() > self.ttl {
            drop(entry);
            self.entries.remove(&key);
            return None;
        }
        Some(Arc::clone(&entry.records))
    }

    pub fn insert(&self, year: u16, league: League, records: Vec<PitcherStart>) -> Arc<Vec<PitcherStart>> {
        let records = Arc::new(records);
        self.entries.insert(
            (year, league),
            CacheEntry {
                records: Arc::clone(&records),
                fetched_at: Instant::now(),
            },
        );
        records
    }

    pub fn invalidate(&self, year: u16, league: League) {
        self.entries.remove(&(year, league));
    }

    pub fn season_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Decision;

    fn record() -> PitcherStart {
        PitcherStart {
            pitcher_name: "X".to_string(),
            team: "T".to_string(),
            game_date: "2024-04-01".to_string(),
            game_pk: 1,
            ip: 6.0,
            er: 2,
            h: 5,
            bb: 1,
            so: 6,
            decision: Decision::Win,
            quality_start: true,
            wasted_start: false,
        }
    }

    #[test]
    fn fresh_entry_is_returned() {
        let cache = SeasonCache::new(Duration::from_secs(3600));
        cache.insert(2024, League::Mlb, vec![record()]);
        let hit = cache.get(2024, League::Mlb).unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(cache.season_count(), 1);
    }

    #[test]
    fn expired_entry_is_dropped_on_read() {
        let cache = SeasonCache::new(Duration::ZERO);
        cache.insert(2024, League::Mlb, vec![record()]);
        assert!(cache.get(2024, League::Mlb).is_none());
        assert_eq!(cache.season_count(), 0);
    }

    #[test]
    fn seasons_are_keyed_independently() {
        let cache = SeasonCache::new(Duration::from_secs(3600));
        cache.insert(2024, League::Mlb, vec![record()]);
        assert!(cache.get(2024, League::TripleA).is_none());
        assert!(cache.get(2023, League::Mlb).is_none());
    }

    #[test]
    fn invalidate_forces_recollection() {
        let cache = SeasonCache::new(Duration::from_secs(3600));
        cache.insert(2024, League::Mlb, vec![record()]);
        cache.invalidate(2024, League::Mlb);
        assert!(cache.get(2024, League::Mlb).is_none());
    }
}
