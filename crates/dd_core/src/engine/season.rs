//! Season driver: runs scheduled games against the collaborator stores.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::data::LeagueContextProvider;
use crate::engine::game::GameEngine;
use crate::error::Result;
use crate::models::{build_lineup, GameId, GameStatus, GameSummary};
use crate::store::{ResultSink, RosterSource};

/// Batch cap for one day-simulation call: one full league day. Bounds the
/// worst-case latency of a single invocation even on a broken calendar.
pub const MAX_GAMES_PER_DAY: usize = 15;

/// Drives whole games from schedule to saved result.
///
/// Each game's engine is seeded from `base_seed` and the game id, so a
/// season replayed against the same stores reproduces itself.
pub struct SeasonSimulator<S> {
    store: Arc<S>,
    context: Arc<LeagueContextProvider>,
    base_seed: u64,
}

impl<S: RosterSource + ResultSink> SeasonSimulator<S> {
    pub fn new(store: Arc<S>, context: Arc<LeagueContextProvider>, base_seed: u64) -> Self {
        Self {
            store,
            context,
            base_seed,
        }
    }

    /// Runs one scheduled game start to finish and persists the result.
    ///
    /// Returns `Ok(None)` when the game does not exist or was already
    /// played. A persistence failure is fatal for the game: the sink rolls
    /// back and the error propagates; the caller owns any retry policy.
    pub fn simulate_game(&self, game_id: GameId) -> Result<Option<GameSummary>> {
        let Some(game) = self.store.scheduled_game(game_id)? else {
            return Ok(None);
        };
        if game.status == GameStatus::Played {
            return Ok(None);
        }

        let home_lineup = build_lineup(&self.store.roster_for_team(game.home_team_id));
        let away_lineup = build_lineup(&self.store.roster_for_team(game.away_team_id));

        let seed = self.base_seed ^ game_id;
        let mut engine = GameEngine::new(
            &game,
            home_lineup,
            away_lineup,
            seed,
            Arc::clone(&self.context),
        );
        engine.run_to_completion();
        let innings = engine.state().inning;
        let completed = engine.into_completed();

        self.store.save_game_result(&completed)?;
        log::info!(
            "game {} final after {} innings: home {} - away {}",
            game_id,
            innings,
            completed.home_score,
            completed.away_score
        );

        Ok(Some(GameSummary::from_completed(&completed, innings)))
    }

    /// Simulates every still-scheduled game dated exactly `date`, capped at
    /// one league day's worth of games. Returns how many games were run.
    pub fn simulate_day(&self, date: NaiveDate) -> Result<usize> {
        let mut game_ids = self.store.games_on_date(date)?;
        game_ids.truncate(MAX_GAMES_PER_DAY);

        for game_id in &game_ids {
            self.simulate_game(*game_id)?;
        }
        Ok(game_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::models::{CompletedGame, RosterPlayer, ScheduledGame, TeamId};
    use crate::store::MemoryLeague;

    fn seeded_store() -> Arc<MemoryLeague> {
        let store = MemoryLeague::new();
        store.add_team(1, "Aces");
        store.add_team(2, "Bears");
        let games = crate::schedule::generate_schedule(
            1,
            &[1, 2],
            &crate::schedule::ScheduleConfig::for_year(2024),
        );
        crate::schedule::save_schedule(&store, &games).unwrap();
        Arc::new(store)
    }

    fn simulator(store: Arc<MemoryLeague>) -> SeasonSimulator<MemoryLeague> {
        let context = Arc::new(LeagueContextProvider::new(store.clone()));
        SeasonSimulator::new(store, context, 99)
    }

    #[test]
    fn unknown_game_is_none_not_an_error() {
        let sim = simulator(seeded_store());
        assert!(sim.simulate_game(999_999).unwrap().is_none());
    }

    #[test]
    fn played_games_are_not_resimulated() {
        let store = seeded_store();
        let sim = simulator(store.clone());

        let first = sim.simulate_game(1).unwrap();
        assert!(first.is_some());
        let standings_after_one: u32 = store.standings().iter().map(|t| t.wins).sum();
        assert_eq!(standings_after_one, 1);

        // second attempt is a no-op, nothing double-counts
        assert!(sim.simulate_game(1).unwrap().is_none());
        let standings_after_retry: u32 = store.standings().iter().map(|t| t.wins).sum();
        assert_eq!(standings_after_retry, 1);
    }

    #[test]
    fn day_simulation_caps_the_batch() {
        let store = seeded_store();
        let sim = simulator(store.clone());

        // first series day carries 1 game for a 2-team league; widen it by
        // stacking extra games on the same date
        let first_date = store.scheduled_games()[0].date;
        let extra: Vec<ScheduledGame> = (0..20)
            .map(|_| ScheduledGame {
                game_id: 0,
                league_id: 1,
                home_team_id: 1,
                away_team_id: 2,
                date: first_date,
                game_number: 1,
                series_id: 0,
                status: crate::models::GameStatus::Scheduled,
            })
            .collect();
        store.insert_schedule(&extra).unwrap();

        let processed = sim.simulate_day(first_date).unwrap();
        assert_eq!(processed, MAX_GAMES_PER_DAY);

        // a later call picks up the remainder
        let rest = sim.simulate_day(first_date).unwrap();
        assert_eq!(rest, 21 - MAX_GAMES_PER_DAY);
        assert_eq!(sim.simulate_day(first_date).unwrap(), 0);
    }

    struct FailingStore {
        inner: MemoryLeague,
    }

    impl RosterSource for FailingStore {
        fn roster_for_team(&self, team_id: TeamId) -> Vec<RosterPlayer> {
            self.inner.roster_for_team(team_id)
        }
    }

    impl ResultSink for FailingStore {
        fn scheduled_game(&self, game_id: GameId) -> Result<Option<ScheduledGame>> {
            self.inner.scheduled_game(game_id)
        }
        fn games_on_date(&self, date: NaiveDate) -> Result<Vec<GameId>> {
            self.inner.games_on_date(date)
        }
        fn insert_schedule(&self, games: &[ScheduledGame]) -> Result<()> {
            self.inner.insert_schedule(games)
        }
        fn save_game_result(&self, _game: &CompletedGame) -> Result<()> {
            Err(SimError::Persistence("write rejected".to_string()))
        }
    }

    #[test]
    fn persistence_failure_is_fatal_and_leaves_no_partial_state() {
        let inner = MemoryLeague::new();
        inner.add_team(1, "Aces");
        inner.add_team(2, "Bears");
        let games = crate::schedule::generate_schedule(
            1,
            &[1, 2],
            &crate::schedule::ScheduleConfig::for_year(2024),
        );
        crate::schedule::save_schedule(&inner, &games).unwrap();

        let store = Arc::new(FailingStore { inner });
        let context = Arc::new(LeagueContextProvider::modern_only());
        let sim = SeasonSimulator::new(store.clone(), context, 7);

        let err = sim.simulate_game(1).unwrap_err();
        assert!(matches!(err, SimError::Persistence(_)));

        // the rejected result left nothing behind
        assert!(store.inner.completed_game(1).is_none());
        assert!(store.inner.standings().iter().all(|t| t.wins == 0 && t.losses == 0));
        assert_eq!(
            store.inner.scheduled_game(1).unwrap().unwrap().status,
            crate::models::GameStatus::Scheduled
        );
    }
}
