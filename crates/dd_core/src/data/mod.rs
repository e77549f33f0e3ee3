//! League-context (era) statistics.
//!
//! The simulation runs thousands of matchup lookups per game, so contexts
//! are cached in memory for the life of the process. Years with no
//! historical row resolve to the hardcoded modern-era defaults, and the
//! fallback is cached under the same key to avoid repeated lookups.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// League-average per-PA walk rate assumed when no context value exists.
pub const DEFAULT_BB_PA: f64 = 0.08;
/// League-average per-PA strikeout rate assumed when no context value exists.
pub const DEFAULT_SO_PA: f64 = 0.20;
/// League-average per-PA home-run rate assumed when no context value exists.
pub const DEFAULT_HR_PA: f64 = 0.03;
/// League batting average assumed when no context value exists.
pub const DEFAULT_BA: f64 = 0.250;

/// League-wide averages for one season year.
///
/// The per-9-inning and rate-stat fields are present in every row (and in
/// the modern-era default); the per-PA fields are only available for years
/// where the source data carries them, so they are optional with constant
/// fallbacks in the accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueContext {
    pub year: u16,
    pub avg_k_9: f64,
    pub avg_bb_9: f64,
    pub avg_hr_9: f64,
    pub avg_era: f64,
    pub avg_whip: f64,
    pub avg_ba: f64,
    pub avg_obp: f64,
    pub avg_slg: f64,
    #[serde(default)]
    pub avg_bb_pa: Option<f64>,
    #[serde(default)]
    pub avg_so_pa: Option<f64>,
    #[serde(default)]
    pub avg_hr_pa: Option<f64>,
}

static MODERN_ERA: Lazy<LeagueContext> = Lazy::new(|| LeagueContext {
    year: 0,
    avg_k_9: 8.50,
    avg_bb_9: 3.20,
    avg_hr_9: 1.10,
    avg_era: 4.00,
    avg_whip: 1.300,
    avg_ba: 0.250,
    avg_obp: 0.320,
    avg_slg: 0.410,
    avg_bb_pa: None,
    avg_so_pa: None,
    avg_hr_pa: None,
});

impl LeagueContext {
    /// Modern-era defaults, used whenever a year has no historical row.
    pub fn modern_default(year: u16) -> Self {
        LeagueContext {
            year,
            ..MODERN_ERA.clone()
        }
    }

    pub fn walk_rate(&self) -> f64 {
        self.avg_bb_pa.unwrap_or(DEFAULT_BB_PA)
    }

    pub fn strikeout_rate(&self) -> f64 {
        self.avg_so_pa.unwrap_or(DEFAULT_SO_PA)
    }

    pub fn home_run_rate(&self) -> f64 {
        self.avg_hr_pa.unwrap_or(DEFAULT_HR_PA)
    }

    pub fn batting_average(&self) -> f64 {
        self.avg_ba
    }
}

/// Collaborator contract for the league-context store. A `None` row triggers
/// the modern-era fallback in the provider.
pub trait LeagueStatsSource: Send + Sync {
    fn year_row(&self, year: u16) -> Result<Option<LeagueContext>>;
}

/// Source with no historical data at all; every year resolves to defaults.
struct NoHistoricalData;

impl LeagueStatsSource for NoHistoricalData {
    fn year_row(&self, _year: u16) -> Result<Option<LeagueContext>> {
        Ok(None)
    }
}

/// Lazily-loading, process-lifetime cache over a [`LeagueStatsSource`].
///
/// `context_for` never fails: source errors and missing rows both degrade to
/// the modern-era defaults. There is no eviction; the key space is bounded
/// by realistic season years.
pub struct LeagueContextProvider {
    source: Arc<dyn LeagueStatsSource>,
    cache: Mutex<HashMap<u16, LeagueContext>>,
}

impl LeagueContextProvider {
    pub fn new(source: Arc<dyn LeagueStatsSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Provider with no historical backing; every lookup yields defaults.
    pub fn modern_only() -> Self {
        Self::new(Arc::new(NoHistoricalData))
    }

    pub fn context_for(&self, year: u16) -> LeagueContext {
        if let Some(ctx) = self.cache.lock().unwrap().get(&year) {
            return ctx.clone();
        }

        let ctx = match self.source.year_row(year) {
            Ok(Some(row)) => row,
            Ok(None) => LeagueContext::modern_default(year),
            Err(err) => {
                log::warn!(
                    "league stats lookup failed for year {}: {}; using modern-era defaults",
                    year,
                    err
                );
                LeagueContext::modern_default(year)
            }
        };

        self.cache.lock().unwrap().insert(year, ctx.clone());
        ctx
    }
}
