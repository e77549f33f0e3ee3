//! Schedule entries, box-score lines, and completed-game records.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::team::TeamId;

pub type GameId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Scheduled,
    Played,
    /// Present in the status vocabulary for completeness; the core never
    /// produces it.
    Rainout,
}

/// One calendar entry produced by the scheduler. `game_number` is the
/// per-team season sequence (1..=162); `series_id` groups the 3-game set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledGame {
    /// Assigned by the persistence sink on insert.
    pub game_id: GameId,
    pub league_id: u32,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub date: NaiveDate,
    pub game_number: u32,
    pub series_id: u32,
    pub status: GameStatus,
}

/// Single-game hitting accumulator, also the unit of season-total upserts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingLine {
    pub ab: u32,
    pub r: u32,
    pub h: u32,
    pub rbi: u32,
    pub doubles: u32,
    pub triples: u32,
    pub hr: u32,
    pub bb: u32,
    pub so: u32,
}

impl BattingLine {
    /// Additive merge, used by season-total upserts.
    pub fn add(&mut self, other: &BattingLine) {
        self.ab += other.ab;
        self.r += other.r;
        self.h += other.h;
        self.rbi += other.rbi;
        self.doubles += other.doubles;
        self.triples += other.triples;
        self.hr += other.hr;
        self.bb += other.bb;
        self.so += other.so;
    }
}

/// Single-game pitching accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchingLine {
    pub outs_recorded: u32,
    pub h: u32,
    pub r: u32,
    pub er: u32,
    pub bb: u32,
    pub so: u32,
    pub hr: u32,
    pub bf: u32,
}

impl PitchingLine {
    /// Innings pitched in baseball notation: whole innings plus partial outs
    /// in the tenths place (7.2 = 7 innings and 2 outs).
    pub fn innings_pitched(&self) -> f64 {
        let whole = (self.outs_recorded / 3) as f64;
        let partial = (self.outs_recorded % 3) as f64;
        whole + partial * 0.1
    }

    pub fn add(&mut self, other: &PitchingLine) {
        self.outs_recorded += other.outs_recorded;
        self.h += other.h;
        self.r += other.r;
        self.er += other.er;
        self.bb += other.bb;
        self.so += other.so;
        self.hr += other.hr;
        self.bf += other.bf;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingBoxLine {
    pub game_id: GameId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub name: String,
    pub line: BattingLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchingBoxLine {
    pub game_id: GameId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub name: String,
    pub line: PitchingLine,
    pub win: bool,
    pub loss: bool,
}

/// Terminal record of a finished game, handed to the persistence sink as one
/// transactional unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedGame {
    pub game_id: GameId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_score: u32,
    pub away_score: u32,
    pub winner: TeamId,
    pub loser: TeamId,
    /// Runs per inning, per side.
    pub home_line_score: BTreeMap<u8, u32>,
    pub away_line_score: BTreeMap<u8, u32>,
    pub batting_lines: Vec<BattingBoxLine>,
    pub pitching_lines: Vec<PitchingBoxLine>,
}

/// Lightweight result returned by the season driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: GameId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_score: u32,
    pub away_score: u32,
    pub winner: TeamId,
    pub innings: u8,
}

impl GameSummary {
    pub fn from_completed(game: &CompletedGame, innings: u8) -> Self {
        Self {
            game_id: game.game_id,
            home_team_id: game.home_team_id,
            away_team_id: game.away_team_id,
            home_score: game.home_score,
            away_score: game.away_score,
            winner: game.winner,
            innings,
        }
    }
}
