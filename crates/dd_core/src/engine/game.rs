//! Inning/game state machine.
//!
//! `GameEngine` owns a serializable [`GameState`] and a seeded RNG, and
//! drives one game plate appearance by plate appearance. The state is
//! mutated exclusively here; persistence at the boundaries (start, per
//! at-bat, termination) is the caller's concern.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::data::LeagueContextProvider;
use crate::engine::at_bat::{resolve_at_bat, PlayEvent, PlayOutcome};
use crate::engine::bases::{advance, BaseState, Runner};
use crate::models::{
    BattingBoxLine, BattingLine, CompletedGame, GameId, Lineup, PitchingBoxLine, PitchingLine,
    PlayerId, RosterPlayer, ScheduledGame, TeamId, LINEUP_SIZE,
};

pub const REGULATION_INNINGS: u8 = 9;

/// Extra innings stop here no matter the score. Prevents unbounded games
/// under pathological random sequences.
pub const HARD_CUTOFF_INNINGS: u8 = 20;

/// Per-game safety cap on plate appearances in `run_to_completion`.
pub const MAX_PLATE_APPEARANCES: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Half {
    Top,
    Bottom,
}

/// Manager decision for the next plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayCall {
    Swing,
    IntentionalWalk,
    SacrificeBunt,
}

/// One side's live game state: order, pitcher, score, and accumulators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamGameState {
    pub team_id: TeamId,
    pub name: String,
    pub lineup: Vec<RosterPlayer>,
    pub pitcher: RosterPlayer,
    /// Current batting-order slot; advances modulo 9.
    pub batter_idx: usize,
    pub runs: u32,
    /// Runs per inning number, recorded at each side switch.
    pub inning_runs: std::collections::BTreeMap<u8, u32>,
    pub batting_lines: std::collections::BTreeMap<PlayerId, BattingLine>,
    pub pitching_lines: std::collections::BTreeMap<PlayerId, PitchingLine>,
}

impl TeamGameState {
    fn new(team_id: TeamId, name: &str, lineup: Lineup) -> Self {
        let mut batting_lines = std::collections::BTreeMap::new();
        for player in &lineup.batting_order {
            batting_lines.insert(player.player_id, BattingLine::default());
        }
        let mut pitching_lines = std::collections::BTreeMap::new();
        pitching_lines.insert(lineup.pitcher.player_id, PitchingLine::default());

        Self {
            team_id,
            name: name.to_string(),
            lineup: lineup.batting_order,
            pitcher: lineup.pitcher,
            batter_idx: 0,
            runs: 0,
            inning_runs: std::collections::BTreeMap::new(),
            batting_lines,
            pitching_lines,
        }
    }
}

/// Full serializable game state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: GameId,
    pub inning: u8,
    pub half: Half,
    pub outs: u8,
    pub bases: BaseState,
    pub home: TeamGameState,
    pub away: TeamGameState,
    pub current_inning_runs: u32,
    /// Reverse-chronological play log: newest entry first.
    pub log: VecDeque<String>,
    pub game_over: bool,
}

impl GameState {
    /// (batting side, pitching side) for the current half.
    fn sides_mut(&mut self) -> (&mut TeamGameState, &mut TeamGameState) {
        match self.half {
            Half::Top => (&mut self.away, &mut self.home),
            Half::Bottom => (&mut self.home, &mut self.away),
        }
    }

    pub fn batting(&self) -> &TeamGameState {
        match self.half {
            Half::Top => &self.away,
            Half::Bottom => &self.home,
        }
    }

    pub fn pitching(&self) -> &TeamGameState {
        match self.half {
            Half::Top => &self.home,
            Half::Bottom => &self.away,
        }
    }
}

pub struct GameEngine {
    state: GameState,
    rng: ChaCha8Rng,
    context: Arc<LeagueContextProvider>,
}

impl GameEngine {
    pub fn new(
        game: &ScheduledGame,
        home_lineup: Lineup,
        away_lineup: Lineup,
        seed: u64,
        context: Arc<LeagueContextProvider>,
    ) -> Self {
        let mut log = VecDeque::new();
        log.push_front("Play Ball! Top of the 1st.".to_string());

        let state = GameState {
            game_id: game.game_id,
            inning: 1,
            half: Half::Top,
            outs: 0,
            bases: BaseState::empty(),
            home: TeamGameState::new(game.home_team_id, "Home", home_lineup),
            away: TeamGameState::new(game.away_team_id, "Away", away_lineup),
            current_inning_runs: 0,
            log,
            game_over: false,
        };

        Self {
            state,
            rng: ChaCha8Rng::seed_from_u64(seed),
            context,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Plays one plate appearance. Returns `None` once the game is over.
    pub fn play_at_bat(&mut self, call: PlayCall) -> Option<PlayOutcome> {
        if self.state.game_over {
            return None;
        }

        let (batter, pitcher) = {
            let bat = self.state.batting();
            let pit = self.state.pitching();
            (bat.lineup[bat.batter_idx].clone(), pit.pitcher.clone())
        };

        let outcome = match call {
            PlayCall::IntentionalWalk => PlayOutcome::new(PlayEvent::Walk, "Intentional Walk"),
            PlayCall::SacrificeBunt => {
                if self.rng.gen_range(0..100) < 70 {
                    PlayOutcome::new(PlayEvent::Sacrifice, "Sacrifice Bunt")
                } else {
                    PlayOutcome::new(PlayEvent::Out, "Failed Bunt")
                }
            }
            PlayCall::Swing => resolve_at_bat(
                &batter.batting_or_replacement(),
                &pitcher.pitching_or_replacement(),
                &self.context,
                &mut self.rng,
            ),
        };

        self.apply_play(&outcome, &batter, pitcher.player_id);

        // Walk-off: ends the game immediately, even mid-half. The only case
        // where a half-inning ends without three outs.
        if self.state.inning >= REGULATION_INNINGS
            && self.state.half == Half::Bottom
            && self.state.home.runs > self.state.away.runs
        {
            self.state.game_over = true;
            let msg = format!(
                "WALK OFF! Home team wins {} - {}",
                self.state.home.runs, self.state.away.runs
            );
            self.state.log.push_front(msg);
            return Some(outcome);
        }

        {
            let (bat, _) = self.state.sides_mut();
            bat.batter_idx = (bat.batter_idx + 1) % LINEUP_SIZE;
        }

        if self.state.outs >= 3 {
            self.switch_sides();
            if self.check_game_end() {
                self.state.game_over = true;
                let msg = format!(
                    "GAME OVER! Final Score: Home {} - Away {}",
                    self.state.home.runs, self.state.away.runs
                );
                self.state.log.push_front(msg);
            }
        }

        Some(outcome)
    }

    /// Drives swings until the game terminates, bounded by the plate
    /// appearance safety cap.
    pub fn run_to_completion(&mut self) -> &GameState {
        let mut plays = 0u32;
        while !self.state.game_over && plays < MAX_PLATE_APPEARANCES {
            self.play_at_bat(PlayCall::Swing);
            plays += 1;
        }
        if !self.state.game_over {
            log::warn!(
                "game {} hit the {}-play safety cap; forcing termination",
                self.state.game_id,
                MAX_PLATE_APPEARANCES
            );
            self.state.game_over = true;
        }
        &self.state
    }

    /// Brings in a new pitcher for the side currently in the field.
    pub fn change_pitcher(&mut self, new_pitcher: RosterPlayer) {
        let new_name = new_pitcher.name.clone();
        let new_id = new_pitcher.player_id;
        let old_name = {
            let (_, pit) = self.state.sides_mut();
            let old = std::mem::replace(&mut pit.pitcher, new_pitcher);
            pit.pitching_lines.entry(new_id).or_default();
            old.name
        };
        self.state
            .log
            .push_front(format!("PITCHING CHANGE: {} replaces {}", new_name, old_name));
    }

    /// Pinch hitter for the batter currently due up.
    pub fn pinch_hit(&mut self, new_batter: RosterPlayer) {
        let new_name = new_batter.name.clone();
        let new_id = new_batter.player_id;
        let old_name = {
            let (bat, _) = self.state.sides_mut();
            let idx = bat.batter_idx;
            let old = std::mem::replace(&mut bat.lineup[idx], new_batter);
            bat.batting_lines.entry(new_id).or_default();
            old.name
        };
        self.state
            .log
            .push_front(format!("PINCH HITTER: {} batting for {}", new_name, old_name));
    }

    fn apply_play(&mut self, outcome: &PlayOutcome, batter: &RosterPlayer, pitcher_id: PlayerId) {
        let event = outcome.event;
        let batter_id = batter.player_id;
        let desc = format!("{}: {}", batter.name, outcome.desc);

        {
            let (bat, pit) = self.state.sides_mut();
            let bline = bat.batting_lines.entry(batter_id).or_default();
            if !matches!(event, PlayEvent::Walk | PlayEvent::Sacrifice) {
                bline.ab += 1;
            }
            match event {
                PlayEvent::Strikeout => bline.so += 1,
                PlayEvent::Walk => bline.bb += 1,
                PlayEvent::Single => bline.h += 1,
                PlayEvent::Double => {
                    bline.h += 1;
                    bline.doubles += 1;
                }
                PlayEvent::Triple => {
                    bline.h += 1;
                    bline.triples += 1;
                }
                PlayEvent::HomeRun => {
                    bline.h += 1;
                    bline.hr += 1;
                }
                PlayEvent::Out | PlayEvent::Sacrifice => {}
            }

            let pline = pit.pitching_lines.entry(pitcher_id).or_default();
            pline.bf += 1;
            match event {
                PlayEvent::Strikeout => {
                    pline.so += 1;
                    pline.outs_recorded += 1;
                }
                PlayEvent::Out | PlayEvent::Sacrifice => pline.outs_recorded += 1,
                PlayEvent::Walk => pline.bb += 1,
                PlayEvent::Single | PlayEvent::Double | PlayEvent::Triple => pline.h += 1,
                PlayEvent::HomeRun => {
                    pline.h += 1;
                    pline.hr += 1;
                }
            }
        }

        if matches!(
            event,
            PlayEvent::Strikeout | PlayEvent::Out | PlayEvent::Sacrifice
        ) {
            self.state.outs += 1;
        }

        let batter_runner = Runner::new(batter_id, &batter.name);
        let runs = match event {
            PlayEvent::Walk => advance(
                &mut self.state.bases,
                1,
                true,
                true,
                batter_runner,
                &mut self.rng,
            ),
            PlayEvent::Sacrifice => advance(
                &mut self.state.bases,
                1,
                false,
                false,
                batter_runner,
                &mut self.rng,
            ),
            PlayEvent::Single | PlayEvent::Double | PlayEvent::Triple | PlayEvent::HomeRun => {
                advance(
                    &mut self.state.bases,
                    event.bases(),
                    true,
                    false,
                    batter_runner,
                    &mut self.rng,
                )
            }
            PlayEvent::Strikeout | PlayEvent::Out => 0,
        };

        let entry = match event {
            PlayEvent::HomeRun => format!("HOMERUN! {} runs score!", runs),
            PlayEvent::Single | PlayEvent::Double | PlayEvent::Triple if runs > 0 => {
                format!("{} ({} scored)", desc, runs)
            }
            _ => desc,
        };
        self.state.log.push_front(entry);

        if runs > 0 {
            self.state.current_inning_runs += runs;
            let (bat, pit) = self.state.sides_mut();
            bat.runs += runs;
            let bline = bat.batting_lines.entry(batter_id).or_default();
            bline.rbi += runs;
            bline.r += 1;
            let pline = pit.pitching_lines.entry(pitcher_id).or_default();
            pline.r += runs;
            pline.er += runs;
        }
    }

    /// Three outs: record the half's runs, reset outs and bases, flip the
    /// half (incrementing the inning on a bottom-to-top flip).
    fn switch_sides(&mut self) {
        let inning = self.state.inning;
        let inning_runs = self.state.current_inning_runs;
        {
            let (bat, _) = self.state.sides_mut();
            bat.inning_runs.insert(inning, inning_runs);
        }
        self.state.current_inning_runs = 0;
        self.state.outs = 0;
        self.state.bases.clear();

        match self.state.half {
            Half::Top => {
                self.state.half = Half::Bottom;
                self.state
                    .log
                    .push_front(format!("--- End of Top {} ---", inning));
            }
            Half::Bottom => {
                self.state.half = Half::Top;
                self.state.inning += 1;
                self.state
                    .log
                    .push_front(format!("--- End of Inning {} ---", inning));
            }
        }
    }

    /// Standard termination, evaluated at the start of a new half (right
    /// after a side switch): after the top of the 9th or later the home team
    /// already leads, or a completed bottom half of an extra inning left the
    /// scores unequal. The hard cutoff overrides everything.
    fn check_game_end(&self) -> bool {
        if self.state.inning > HARD_CUTOFF_INNINGS {
            return true;
        }
        if self.state.inning < REGULATION_INNINGS {
            return false;
        }
        let home = self.state.home.runs;
        let away = self.state.away.runs;
        match self.state.half {
            Half::Bottom => home > away,
            Half::Top => self.state.inning > REGULATION_INNINGS && home != away,
        }
    }

    /// Consumes the engine, finalizing the in-progress half's run ledger and
    /// assembling the terminal record for the persistence sink.
    pub fn into_completed(mut self) -> CompletedGame {
        let inning = self.state.inning;
        let inning_runs = self.state.current_inning_runs;
        {
            let (bat, _) = self.state.sides_mut();
            bat.inning_runs.insert(inning, inning_runs);
        }

        let state = self.state;
        let home_score = state.home.runs;
        let away_score = state.away.runs;
        let (winner, loser) = if home_score > away_score {
            (state.home.team_id, state.away.team_id)
        } else {
            (state.away.team_id, state.home.team_id)
        };

        let mut batting_lines = Vec::new();
        let mut pitching_lines = Vec::new();
        for side in [&state.home, &state.away] {
            let is_winner = side.team_id == winner;
            for (player_id, line) in &side.batting_lines {
                // don't emit blank rows for players who never came up
                if line.ab + line.bb == 0 {
                    continue;
                }
                let name = side
                    .lineup
                    .iter()
                    .find(|p| p.player_id == *player_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                batting_lines.push(BattingBoxLine {
                    game_id: state.game_id,
                    team_id: side.team_id,
                    player_id: *player_id,
                    name,
                    line: *line,
                });
            }
            for (player_id, line) in &side.pitching_lines {
                if line.bf == 0 {
                    continue;
                }
                let name = if side.pitcher.player_id == *player_id {
                    side.pitcher.name.clone()
                } else {
                    "Unknown".to_string()
                };
                pitching_lines.push(PitchingBoxLine {
                    game_id: state.game_id,
                    team_id: side.team_id,
                    player_id: *player_id,
                    name,
                    line: *line,
                    win: is_winner,
                    loss: !is_winner,
                });
            }
        }

        CompletedGame {
            game_id: state.game_id,
            home_team_id: state.home.team_id,
            away_team_id: state.away.team_id,
            home_score,
            away_score,
            winner,
            loser,
            home_line_score: state.home.inning_runs,
            away_line_score: state.away.inning_runs,
            batting_lines,
            pitching_lines,
        }
    }
}
