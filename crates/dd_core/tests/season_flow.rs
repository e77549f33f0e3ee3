//! End-to-end season slice: build a league, generate and persist a
//! schedule, simulate two calendar days, and check that standings, box
//! scores, and season totals stay consistent.

use std::sync::Arc;

use dd_core::{
    generate_schedule, save_schedule, BattingProfile, GameStatus, LeagueContext,
    LeagueContextProvider, MemoryLeague, PitchingProfile, RosterRole, ScheduleConfig,
    SeasonSimulator, TeamId,
};

fn batter(player_id: i64, name: &str, year: u16) -> BattingProfile {
    BattingProfile {
        player_id,
        name: name.to_string(),
        year: Some(year),
        ab: 520,
        h: 150,
        doubles: 28,
        triples: 4,
        hr: 18,
        bb: 55,
        so: 95,
        avg: None,
    }
}

fn pitcher(player_id: i64, name: &str, year: u16) -> PitchingProfile {
    PitchingProfile {
        player_id,
        name: name.to_string(),
        year: Some(year),
        ip: 210.0,
        h: 195,
        bb: 60,
        so: 170,
        hr: 22,
    }
}

fn build_league() -> Arc<MemoryLeague> {
    let store = MemoryLeague::new();
    let team_names = ["Aces", "Bears", "Cyclones", "Drakes"];
    for (idx, name) in team_names.iter().enumerate() {
        let team_id = idx as TeamId + 1;
        store.add_team(team_id, name);
        let base = (team_id as i64) * 100;
        for slot in 1..=9 {
            store.add_batter(
                team_id,
                batter(base + slot, &format!("{} Batter {}", name, slot), 1968),
            );
        }
        store.add_pitcher(
            team_id,
            pitcher(base + 10, &format!("{} Ace", name), 1968),
            RosterRole::StartingPitcher,
        );
    }

    // a pitcher-friendly historical era so the context path is exercised
    store.set_league_row(LeagueContext {
        year: 1968,
        avg_k_9: 5.95,
        avg_bb_9: 2.80,
        avg_hr_9: 0.60,
        avg_era: 2.98,
        avg_whip: 1.170,
        avg_ba: 0.237,
        avg_obp: 0.299,
        avg_slg: 0.340,
        avg_bb_pa: Some(0.072),
        avg_so_pa: Some(0.155),
        avg_hr_pa: Some(0.017),
    });

    Arc::new(store)
}

#[test]
fn two_day_season_slice_stays_consistent() {
    let store = build_league();
    let teams: Vec<TeamId> = vec![1, 2, 3, 4];
    let games = generate_schedule(1, &teams, &ScheduleConfig::for_year(2024));

    // a 4-team circle has 3 rounds per cycle, so the 6-cycle limit caps the
    // calendar at 18 rounds x 2 pairings x 3 games
    assert_eq!(games.len(), 108);
    save_schedule(store.as_ref(), &games).unwrap();

    let context = Arc::new(LeagueContextProvider::new(store.clone()));
    let sim = SeasonSimulator::new(store.clone(), context, 2024);

    let day_one = store.scheduled_games()[0].date;
    let played_day_one = sim.simulate_day(day_one).unwrap();
    assert_eq!(played_day_one, 2, "two pairings play on each series day");

    // every decided game adds exactly one win and one loss
    let standings = store.standings();
    let wins: u32 = standings.iter().map(|t| t.wins).sum();
    let losses: u32 = standings.iter().map(|t| t.losses).sum();
    assert_eq!(wins, 2);
    assert_eq!(losses, 2);

    // the day's games flipped to played, with full box scores behind them
    for game in store
        .scheduled_games()
        .iter()
        .filter(|g| g.date == day_one)
    {
        assert_eq!(game.status, GameStatus::Played);
        let result = store.completed_game(game.game_id).expect("saved result");
        assert_ne!(result.winner, result.loser);

        let home_total: u32 = result.home_line_score.values().sum();
        let away_total: u32 = result.away_line_score.values().sum();
        assert_eq!(home_total, result.home_score);
        assert_eq!(away_total, result.away_score);

        // both starting pitchers faced batters; decisions match the result
        assert_eq!(result.pitching_lines.len(), 2);
        for line in &result.pitching_lines {
            assert!(line.line.bf > 0);
            assert_eq!(line.win, line.team_id == result.winner);
        }

        // a nine-man order over nine innings leaves no empty box line
        assert!(result.batting_lines.len() >= 18);
        assert!(result
            .batting_lines
            .iter()
            .all(|b| b.line.ab + b.line.bb > 0));
    }

    // season totals accumulate additively across days
    let first_game = store.scheduled_games()[0].clone();
    let sample_player = (first_game.home_team_id as i64) * 100 + 1;
    let after_day_one = store
        .season_batting_total(sample_player, first_game.home_team_id)
        .expect("played on day one");
    assert!(after_day_one.ab + after_day_one.bb >= 3);

    let day_two = day_one + chrono::Duration::days(1);
    assert_eq!(sim.simulate_day(day_two).unwrap(), 2);

    let after_day_two = store
        .season_batting_total(sample_player, first_game.home_team_id)
        .expect("still accumulating");
    assert!(after_day_two.ab > after_day_one.ab);
    assert!(after_day_two.h >= after_day_one.h);

    let wins: u32 = store.standings().iter().map(|t| t.wins).sum();
    assert_eq!(wins, 4);

    // starter season totals carry pitching decisions
    let ace_totals = store
        .season_pitching_total(
            (first_game.home_team_id as i64) * 100 + 10,
            first_game.home_team_id,
        )
        .expect("ace pitched both days");
    assert_eq!(ace_totals.wins + ace_totals.losses, 2);
    assert!(ace_totals.line.outs_recorded >= 48);
}

#[test]
fn replaying_a_saved_schedule_is_deterministic() {
    let run = || {
        let store = build_league();
        let games = generate_schedule(1, &[1, 2, 3, 4], &ScheduleConfig::for_year(2024));
        save_schedule(store.as_ref(), &games).unwrap();
        let context = Arc::new(LeagueContextProvider::new(store.clone()));
        let sim = SeasonSimulator::new(store.clone(), context, 777);
        let summary = sim.simulate_game(1).unwrap().expect("game exists");
        (summary.home_score, summary.away_score, summary.winner)
    };
    assert_eq!(run(), run());
}
