//! Player stat profiles.
//!
//! Profiles are immutable snapshots of a player's career counting stats as of
//! a given season year, loaded from the player catalog. All rates are derived
//! on demand; nothing mutable is stored. Missing or zero denominators fall
//! back to small non-zero defaults so no rate calculation can divide by zero
//! or produce NaN.

use serde::{Deserialize, Serialize};

use crate::data::{DEFAULT_BA, DEFAULT_BB_PA, DEFAULT_HR_PA, DEFAULT_SO_PA};

pub type PlayerId = i64;

/// Season assumed for profiles that carry no year of their own.
pub const DEFAULT_SEASON_YEAR: u16 = 2024;

/// Below this many estimated batters faced a pitcher's computed rates are
/// meaningless; league-average constants are used instead.
const MIN_BATTERS_FACED: f64 = 5.0;

/// Innings-to-batters-faced heuristic multiplier. True BF is not tracked in
/// the catalog, so it is approximated as IP * 2.9 + H + BB.
const OUTS_TO_BF_FACTOR: f64 = 2.9;

/// Hardest opponent average a pitcher can be assigned. Anything above this
/// breaks the log5 math into runaway hit probabilities.
const OPPONENT_AVG_CAP: f64 = 0.450;

/// Role resolved at roster ingestion. The catalog stores a compact marker
/// string ("S7", "R3", a fielding rating); parsing it is a roster concern,
/// the core only ever sees the resolved enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterRole {
    StartingPitcher,
    ReliefPitcher,
    PositionPlayer,
}

/// Career batting stats as of `year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingProfile {
    pub player_id: PlayerId,
    pub name: String,
    pub year: Option<u16>,
    pub ab: u32,
    pub h: u32,
    pub doubles: u32,
    pub triples: u32,
    pub hr: u32,
    pub bb: u32,
    pub so: u32,
    /// Catalog batting average, when the source supplies one.
    pub avg: Option<f64>,
}

impl BattingProfile {
    /// Approximate plate appearances: AB + BB, with AB floored to 1 so the
    /// denominator is never zero.
    pub fn plate_appearances(&self) -> f64 {
        let ab = if self.ab > 0 { self.ab } else { 1 };
        (ab + self.bb) as f64
    }

    pub fn walk_rate(&self) -> f64 {
        self.bb as f64 / self.plate_appearances()
    }

    pub fn strikeout_rate(&self) -> f64 {
        self.so as f64 / self.plate_appearances()
    }

    pub fn home_run_rate(&self) -> f64 {
        self.hr as f64 / self.plate_appearances()
    }

    /// Catalog average when present, else H/AB. Callers that feed this into
    /// the matchup math apply the pitchers-as-hitters floor on top.
    pub fn batting_average(&self) -> f64 {
        if let Some(avg) = self.avg {
            return avg;
        }
        if self.ab > 0 {
            self.h as f64 / self.ab as f64
        } else {
            0.0
        }
    }

    /// League-average-ish stand-in for an unresolvable lineup slot.
    pub fn replacement(player_id: PlayerId, name: &str) -> Self {
        Self {
            player_id,
            name: name.to_string(),
            year: None,
            ab: 100,
            h: 22,
            doubles: 0,
            triples: 0,
            hr: 5,
            bb: 0,
            so: 0,
            avg: Some(0.220),
        }
    }
}

/// Career pitching stats as of `year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchingProfile {
    pub player_id: PlayerId,
    pub name: String,
    pub year: Option<u16>,
    pub ip: f64,
    pub h: u32,
    pub bb: u32,
    pub so: u32,
    pub hr: u32,
}

impl PitchingProfile {
    /// Approximate batters faced: IP * 2.9 + H + BB, with the IP term floored
    /// to 1 when no innings are recorded.
    pub fn batters_faced_estimate(&self) -> f64 {
        let ip_term = if self.ip > 0.0 {
            self.ip * OUTS_TO_BF_FACTOR
        } else {
            1.0
        };
        ip_term + (self.h + self.bb) as f64
    }

    fn rate_or(&self, count: u32, default: f64) -> f64 {
        let bf = self.batters_faced_estimate();
        if bf < MIN_BATTERS_FACED {
            return default;
        }
        count as f64 / bf
    }

    pub fn walk_rate(&self) -> f64 {
        self.rate_or(self.bb, DEFAULT_BB_PA)
    }

    pub fn strikeout_rate(&self) -> f64 {
        self.rate_or(self.so, DEFAULT_SO_PA)
    }

    pub fn home_run_rate(&self) -> f64 {
        self.rate_or(self.hr, DEFAULT_HR_PA)
    }

    /// Batting average allowed, derived as H / (BF - BB). Sparse samples fall
    /// back to the league baseline; the result is capped so a heavily-hit
    /// pitcher can still record outs.
    pub fn opponent_average(&self) -> f64 {
        if self.h == 0 || self.ip < 5.0 {
            return DEFAULT_BA;
        }
        let bf = self.ip * OUTS_TO_BF_FACTOR + (self.h + self.bb) as f64;
        let ab = bf - self.bb as f64;
        if ab <= 0.0 {
            return DEFAULT_BA;
        }
        let base_avg = self.h as f64 / ab;
        base_avg.min(OPPONENT_AVG_CAP)
    }

    /// League-average-ish stand-in for a roster with no usable pitcher.
    pub fn replacement(player_id: PlayerId, name: &str) -> Self {
        Self {
            player_id,
            name: name.to_string(),
            year: None,
            ip: 200.0,
            h: 200,
            bb: 60,
            so: 120,
            hr: 25,
        }
    }
}

/// One roster row, stat-hydrated at the catalog boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub player_id: PlayerId,
    pub name: String,
    pub role: RosterRole,
    pub batting: Option<BattingProfile>,
    pub pitching: Option<PitchingProfile>,
}

impl RosterPlayer {
    pub fn is_pitcher(&self) -> bool {
        matches!(
            self.role,
            RosterRole::StartingPitcher | RosterRole::ReliefPitcher
        )
    }

    /// Batting stats for the matchup, substituting replacement-level numbers
    /// when the catalog has none for this player.
    pub fn batting_or_replacement(&self) -> BattingProfile {
        self.batting
            .clone()
            .unwrap_or_else(|| BattingProfile::replacement(self.player_id, &self.name))
    }

    /// Pitching stats for the matchup, substituting replacement-level numbers
    /// when the catalog has none for this player.
    pub fn pitching_or_replacement(&self) -> PitchingProfile {
        self.pitching
            .clone()
            .unwrap_or_else(|| PitchingProfile::replacement(self.player_id, &self.name))
    }
}
