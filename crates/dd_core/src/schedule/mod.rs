//! Season schedule generation.
//!
//! Circle-method round robin: one fixed anchor team, everyone else rotates
//! through a circular array each round. Each pairing emits a 3-game series
//! on consecutive calendar days; home/away flips by cycle parity so home
//! games balance out across full repetitions of the rotation.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::Result;
use crate::models::{GameStatus, ScheduledGame, TeamId, DEFAULT_SEASON_YEAR};
use crate::store::ResultSink;

/// Rows per schedule insert batch. Persisting one row at a time is far too
/// slow for a 972-game calendar; oversized single statements are the other
/// failure mode.
pub const SCHEDULE_INSERT_CHUNK: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub season_year: i32,
    /// Series rounds to generate: 54 rounds of 3 games = 162 games a team.
    pub target_series: u32,
    pub series_length: u32,
    /// Full rotations through the circle before giving up; the target is
    /// normally reached mid-cycle before this.
    pub max_cycles: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            season_year: DEFAULT_SEASON_YEAR as i32,
            target_series: 54,
            series_length: 3,
            max_cycles: 6,
        }
    }
}

impl ScheduleConfig {
    pub fn for_year(season_year: i32) -> Self {
        Self {
            season_year,
            ..Self::default()
        }
    }
}

/// The schedule opens on the closest Thursday on or before March 31.
pub fn opening_day_anchor(year: i32) -> NaiveDate {
    let mut date = NaiveDate::from_ymd_opt(year, 3, 31).unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(DEFAULT_SEASON_YEAR as i32, 3, 31).expect("valid anchor date")
    });
    while date.weekday() != Weekday::Thu {
        date -= Duration::days(1);
    }
    date
}

/// Generates the full season calendar. Fewer than two teams is a no-op, not
/// an error. Game ids are left at zero; the sink assigns them on insert.
pub fn generate_schedule(
    league_id: u32,
    team_ids: &[TeamId],
    config: &ScheduleConfig,
) -> Vec<ScheduledGame> {
    if team_ids.len() < 2 {
        return Vec::new();
    }

    let mut teams: Vec<Option<TeamId>> = team_ids.iter().copied().map(Some).collect();
    if teams.len() % 2 != 0 {
        // phantom bye slot; never paired into a game
        teams.push(None);
    }
    let n = teams.len();

    let mut date = opening_day_anchor(config.season_year);
    let mut schedule = Vec::new();
    let mut round = 0u32;

    'cycles: for cycle in 0..config.max_cycles {
        for _ in 0..(n - 1) {
            if round >= config.target_series {
                break 'cycles;
            }

            let series_date = date;
            for i in 0..n / 2 {
                let (t1, t2) = (teams[i], teams[n - 1 - i]);
                if let (Some(t1), Some(t2)) = (t1, t2) {
                    let (home, away) = if cycle % 2 == 0 { (t1, t2) } else { (t2, t1) };
                    for g in 0..config.series_length {
                        schedule.push(ScheduledGame {
                            game_id: 0,
                            league_id,
                            home_team_id: home,
                            away_team_id: away,
                            date: series_date + Duration::days(g as i64),
                            game_number: round * config.series_length + g + 1,
                            series_id: round,
                            status: GameStatus::Scheduled,
                        });
                    }
                }
            }

            // rotate everyone but the anchor one step
            teams[1..].rotate_left(1);
            date += Duration::days(3);
            round += 1;
        }
    }

    schedule
}

/// Persists a generated calendar in insertion order, chunked into batched
/// inserts.
pub fn save_schedule<S: ResultSink>(sink: &S, games: &[ScheduledGame]) -> Result<()> {
    for chunk in games.chunks(SCHEDULE_INSERT_CHUNK) {
        sink.insert_schedule(chunk)?;
    }
    log::info!(
        "schedule saved: {} games in {} batches",
        games.len(),
        games.len().div_ceil(SCHEDULE_INSERT_CHUNK)
    );
    Ok(())
}
