//! Collaborator contracts and the in-memory reference store.
//!
//! The traits are the seams between the simulation core and the surrounding
//! application (player catalog, roster provider, schedule/result
//! persistence). [`MemoryLeague`] implements all of them behind one mutex,
//! which makes `save_game_result` trivially transactional: every write of a
//! game's result lands under a single lock acquisition or none do.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::{LeagueContext, LeagueStatsSource};
use crate::error::Result;
use crate::models::{
    BattingLine, BattingProfile, CompletedGame, GameId, GameStatus, PitchingLine, PitchingProfile,
    PlayerId, RosterPlayer, RosterRole, ScheduledGame, TeamId,
};

/// Player catalog lookup.
pub trait PlayerCatalog {
    fn batting_profile(&self, player_id: PlayerId) -> Option<BattingProfile>;
    fn pitching_profile(&self, player_id: PlayerId) -> Option<PitchingProfile>;
}

/// Roster provider. Rows come back stat-hydrated with resolved roles.
pub trait RosterSource {
    fn roster_for_team(&self, team_id: TeamId) -> Vec<RosterPlayer>;
}

/// Persistence sink for schedules and finished games.
pub trait ResultSink {
    fn scheduled_game(&self, game_id: GameId) -> Result<Option<ScheduledGame>>;

    /// Ids of still-scheduled games on exactly this date.
    fn games_on_date(&self, date: NaiveDate) -> Result<Vec<GameId>>;

    /// Inserts one batch of schedule rows, assigning game ids in insertion
    /// order.
    fn insert_schedule(&self, games: &[ScheduledGame]) -> Result<()>;

    /// Persists a finished game: game record, standings increments, box
    /// lines, and season-total additive upserts. Transactional — either all
    /// of it lands or none of it does, and a failure means the result was
    /// rolled back.
    fn save_game_result(&self, game: &CompletedGame) -> Result<()>;
}

/// Team standings row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team_id: TeamId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
}

/// Season pitching totals including decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitcherSeasonTotals {
    pub line: PitchingLine,
    pub wins: u32,
    pub losses: u32,
}

#[derive(Default)]
struct LeagueData {
    teams: BTreeMap<TeamId, TeamRecord>,
    batting_catalog: HashMap<PlayerId, BattingProfile>,
    pitching_catalog: HashMap<PlayerId, PitchingProfile>,
    rosters: HashMap<TeamId, Vec<(PlayerId, RosterRole)>>,
    league_rows: HashMap<u16, LeagueContext>,
    games: BTreeMap<GameId, ScheduledGame>,
    next_game_id: GameId,
    results: HashMap<GameId, CompletedGame>,
    season_batting: BTreeMap<(PlayerId, TeamId), BattingLine>,
    season_pitching: BTreeMap<(PlayerId, TeamId), PitcherSeasonTotals>,
}

/// In-memory league store: catalog, rosters, league context rows, schedule,
/// standings, and season stat totals.
#[derive(Default)]
pub struct MemoryLeague {
    data: Mutex<LeagueData>,
}

impl MemoryLeague {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_team(&self, team_id: TeamId, name: &str) {
        let mut data = self.data.lock().unwrap();
        data.teams.insert(
            team_id,
            TeamRecord {
                team_id,
                name: name.to_string(),
                wins: 0,
                losses: 0,
            },
        );
    }

    /// Adds a batter to the catalog and to a team's roster.
    pub fn add_batter(&self, team_id: TeamId, profile: BattingProfile) {
        let mut data = self.data.lock().unwrap();
        let player_id = profile.player_id;
        data.batting_catalog.insert(player_id, profile);
        data.rosters
            .entry(team_id)
            .or_default()
            .push((player_id, RosterRole::PositionPlayer));
    }

    /// Adds a pitcher to the catalog and to a team's roster.
    pub fn add_pitcher(&self, team_id: TeamId, profile: PitchingProfile, role: RosterRole) {
        let mut data = self.data.lock().unwrap();
        let player_id = profile.player_id;
        data.pitching_catalog.insert(player_id, profile);
        data.rosters.entry(team_id).or_default().push((player_id, role));
    }

    pub fn set_league_row(&self, row: LeagueContext) {
        let mut data = self.data.lock().unwrap();
        data.league_rows.insert(row.year, row);
    }

    /// Seeds league-context rows from a JSON array of rows; returns how many
    /// were loaded.
    pub fn load_league_stats_json(&self, json: &str) -> Result<usize> {
        let rows: Vec<LeagueContext> = serde_json::from_str(json)?;
        let count = rows.len();
        let mut data = self.data.lock().unwrap();
        for row in rows {
            data.league_rows.insert(row.year, row);
        }
        Ok(count)
    }

    pub fn standings(&self) -> Vec<TeamRecord> {
        self.data.lock().unwrap().teams.values().cloned().collect()
    }

    pub fn scheduled_games(&self) -> Vec<ScheduledGame> {
        self.data.lock().unwrap().games.values().cloned().collect()
    }

    pub fn completed_game(&self, game_id: GameId) -> Option<CompletedGame> {
        self.data.lock().unwrap().results.get(&game_id).cloned()
    }

    pub fn season_batting_total(&self, player_id: PlayerId, team_id: TeamId) -> Option<BattingLine> {
        self.data
            .lock()
            .unwrap()
            .season_batting
            .get(&(player_id, team_id))
            .copied()
    }

    pub fn season_pitching_total(
        &self,
        player_id: PlayerId,
        team_id: TeamId,
    ) -> Option<PitcherSeasonTotals> {
        self.data
            .lock()
            .unwrap()
            .season_pitching
            .get(&(player_id, team_id))
            .copied()
    }

    fn hydrate(data: &LeagueData, player_id: PlayerId, role: RosterRole) -> RosterPlayer {
        let batting = data.batting_catalog.get(&player_id).cloned();
        let pitching = data.pitching_catalog.get(&player_id).cloned();
        let name = batting
            .as_ref()
            .map(|p| p.name.clone())
            .or_else(|| pitching.as_ref().map(|p| p.name.clone()))
            .unwrap_or_else(|| format!("Player {}", player_id));
        RosterPlayer {
            player_id,
            name,
            role,
            batting,
            pitching,
        }
    }
}

impl PlayerCatalog for MemoryLeague {
    fn batting_profile(&self, player_id: PlayerId) -> Option<BattingProfile> {
        self.data.lock().unwrap().batting_catalog.get(&player_id).cloned()
    }

    fn pitching_profile(&self, player_id: PlayerId) -> Option<PitchingProfile> {
        self.data.lock().unwrap().pitching_catalog.get(&player_id).cloned()
    }
}

impl RosterSource for MemoryLeague {
    fn roster_for_team(&self, team_id: TeamId) -> Vec<RosterPlayer> {
        let data = self.data.lock().unwrap();
        data.rosters
            .get(&team_id)
            .map(|slots| {
                slots
                    .iter()
                    .map(|(player_id, role)| Self::hydrate(&data, *player_id, *role))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl LeagueStatsSource for MemoryLeague {
    fn year_row(&self, year: u16) -> Result<Option<LeagueContext>> {
        Ok(self.data.lock().unwrap().league_rows.get(&year).cloned())
    }
}

impl ResultSink for MemoryLeague {
    fn scheduled_game(&self, game_id: GameId) -> Result<Option<ScheduledGame>> {
        Ok(self.data.lock().unwrap().games.get(&game_id).cloned())
    }

    fn games_on_date(&self, date: NaiveDate) -> Result<Vec<GameId>> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .games
            .values()
            .filter(|g| g.date == date && g.status == GameStatus::Scheduled)
            .map(|g| g.game_id)
            .collect())
    }

    fn insert_schedule(&self, games: &[ScheduledGame]) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        for game in games {
            data.next_game_id += 1;
            let game_id = data.next_game_id;
            let mut row = game.clone();
            row.game_id = game_id;
            data.games.insert(game_id, row);
        }
        log::info!("inserted schedule batch of {} games", games.len());
        Ok(())
    }

    fn save_game_result(&self, game: &CompletedGame) -> Result<()> {
        // one lock acquisition = one transaction; every write below lands
        // together or not at all
        let mut data = self.data.lock().unwrap();

        if let Some(row) = data.games.get_mut(&game.game_id) {
            row.status = GameStatus::Played;
        }

        data.teams
            .entry(game.winner)
            .or_insert_with(|| TeamRecord {
                team_id: game.winner,
                name: format!("Team {}", game.winner),
                wins: 0,
                losses: 0,
            })
            .wins += 1;
        data.teams
            .entry(game.loser)
            .or_insert_with(|| TeamRecord {
                team_id: game.loser,
                name: format!("Team {}", game.loser),
                wins: 0,
                losses: 0,
            })
            .losses += 1;

        for line in &game.batting_lines {
            data.season_batting
                .entry((line.player_id, line.team_id))
                .or_default()
                .add(&line.line);
        }
        for line in &game.pitching_lines {
            let totals = data
                .season_pitching
                .entry((line.player_id, line.team_id))
                .or_default();
            totals.line.add(&line.line);
            if line.win {
                totals.wins += 1;
            }
            if line.loss {
                totals.losses += 1;
            }
        }

        data.results.insert(game.game_id, game.clone());
        log::info!(
            "game {} saved: home {} - away {}",
            game.game_id,
            game.home_score,
            game.away_score
        );
        Ok(())
    }
}
