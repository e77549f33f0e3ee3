//! Dugout Dynasty CLI
//!
//! Drives the simulation core against the in-memory league store: generate
//! a season calendar, run an exhibition game, or simulate a slice of a
//! season and print standings and box scores.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use dd_core::models::ingest;
use dd_core::{
    build_lineup, generate_schedule, save_schedule, GameEngine, LeagueContextProvider,
    MemoryLeague, RosterRole, RosterSource, ScheduleConfig, SeasonSimulator, TeamId,
};

#[derive(Parser)]
#[command(name = "dugout")]
#[command(about = "Era-normalized baseball season simulator", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a season calendar and print or write it as JSON
    Schedule {
        /// Number of teams in the league
        #[arg(long, default_value = "12")]
        teams: u32,

        /// Season year (sets the opening-day anchor)
        #[arg(long, default_value = "2024")]
        year: i32,

        /// Output JSON file path; prints a summary when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Play a single exhibition game and print the play log and box score
    Exhibition {
        /// Simulation seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Roster JSON file (see --help for the record format)
        #[arg(long)]
        players: Option<PathBuf>,
    },

    /// Simulate the first days of a season and print the standings
    Season {
        /// Number of teams in the league
        #[arg(long, default_value = "4")]
        teams: u32,

        /// Calendar days to simulate
        #[arg(long, default_value = "3")]
        days: u32,

        /// Season year
        #[arg(long, default_value = "2024")]
        year: i32,

        /// Simulation seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Roster JSON file; built-in demo rosters when omitted
        #[arg(long)]
        players: Option<PathBuf>,

        /// League-context JSON file (array of per-year rows)
        #[arg(long)]
        league_stats: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Schedule { teams, year, out } => run_schedule(teams, year, out),
        Commands::Exhibition { seed, players } => run_exhibition(seed, players),
        Commands::Season {
            teams,
            days,
            year,
            seed,
            players,
            league_stats,
        } => run_season(teams, days, year, seed, players, league_stats),
    }
}

fn run_schedule(teams: u32, year: i32, out: Option<PathBuf>) -> Result<()> {
    if teams < 2 {
        bail!("a schedule needs at least 2 teams");
    }
    let team_ids: Vec<TeamId> = (1..=teams).collect();
    let games = generate_schedule(1, &team_ids, &ScheduleConfig::for_year(year));
    println!(
        "{} games across {} series rounds, opening {}",
        games.len(),
        games.iter().map(|g| g.series_id).max().map(|s| s + 1).unwrap_or(0),
        games.first().map(|g| g.date.to_string()).unwrap_or_default()
    );

    if let Some(path) = out {
        let json = serde_json::to_string_pretty(&games)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("schedule written to {}", path.display());
    }
    Ok(())
}

fn run_exhibition(seed: u64, players: Option<PathBuf>) -> Result<()> {
    let store = MemoryLeague::new();
    store.add_team(1, "Home Nine");
    store.add_team(2, "Visiting Nine");
    match players {
        Some(path) => load_players(&store, &path)?,
        None => seed_demo_rosters(&store, 2),
    }

    let game = dd_core::ScheduledGame {
        game_id: 1,
        league_id: 1,
        home_team_id: 1,
        away_team_id: 2,
        date: dd_core::opening_day_anchor(2024),
        game_number: 1,
        series_id: 0,
        status: dd_core::GameStatus::Scheduled,
    };

    let context = Arc::new(LeagueContextProvider::modern_only());
    let mut engine = GameEngine::new(
        &game,
        build_lineup(&store.roster_for_team(1)),
        build_lineup(&store.roster_for_team(2)),
        seed,
        context,
    );
    engine.run_to_completion();

    // the log is stored newest-first; replay it in game order
    for entry in engine.state().log.iter().rev() {
        println!("{}", entry);
    }

    let result = engine.into_completed();
    println!();
    println!("Final: Home {} - Away {}", result.home_score, result.away_score);
    print_box_score(&result);
    Ok(())
}

fn run_season(
    teams: u32,
    days: u32,
    year: i32,
    seed: u64,
    players: Option<PathBuf>,
    league_stats: Option<PathBuf>,
) -> Result<()> {
    if teams < 2 {
        bail!("a league needs at least 2 teams");
    }

    let store = Arc::new(MemoryLeague::new());
    for team_id in 1..=teams {
        store.add_team(team_id, &format!("Team {}", team_id));
    }
    match players {
        Some(path) => load_players(&store, &path)?,
        None => seed_demo_rosters(&store, teams),
    }
    if let Some(path) = league_stats {
        let json = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let loaded = store.load_league_stats_json(&json)?;
        log::info!("loaded {} league-context rows", loaded);
    }

    let team_ids: Vec<TeamId> = (1..=teams).collect();
    let games = generate_schedule(1, &team_ids, &ScheduleConfig::for_year(year));
    save_schedule(store.as_ref(), &games)?;

    let context = Arc::new(LeagueContextProvider::new(store.clone()));
    let sim = SeasonSimulator::new(store.clone(), context, seed);

    let opening = dd_core::opening_day_anchor(year);
    let mut total = 0usize;
    for offset in 0..days {
        let date = opening + chrono::Duration::days(offset as i64);
        let played = sim.simulate_day(date)?;
        println!("{}: {} games played", date, played);
        total += played;
    }

    println!();
    println!("{} games simulated. Standings:", total);
    let mut standings = store.standings();
    standings.sort_by(|a, b| b.wins.cmp(&a.wins));
    for team in standings {
        println!("  {:<12} {:>3}-{:<3}", team.name, team.wins, team.losses);
    }
    Ok(())
}

/// Loads rosters from a JSON array of records:
/// `{"player_id": 101, "name": "...", "team": 1, "kind": "batter"|"pitcher",
///   "role": "S"|"R", ...stats}` where stats accept the catalog's alias
/// spellings (`BA`/`AVG`, `SO`/`K`, `YR`/`Year`).
fn load_players(store: &MemoryLeague, path: &PathBuf) -> Result<()> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let rows: Vec<serde_json::Value> = serde_json::from_str(&json)?;

    for row in rows {
        let record = row
            .as_object()
            .context("player record must be a JSON object")?;
        let player_id = record
            .get("player_id")
            .and_then(|v| v.as_i64())
            .context("player record needs a numeric player_id")?;
        let name = record
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown");
        let team = record
            .get("team")
            .and_then(|v| v.as_u64())
            .context("player record needs a team id")? as TeamId;
        let kind = record.get("kind").and_then(|v| v.as_str()).unwrap_or("batter");

        if kind == "pitcher" {
            // endurance-style role marker: leading 'S' means starter
            let role = match record.get("role").and_then(|v| v.as_str()) {
                Some(r) if r.to_uppercase().starts_with('S') => RosterRole::StartingPitcher,
                _ => RosterRole::ReliefPitcher,
            };
            store.add_pitcher(team, ingest::pitching_from_record(player_id, name, record), role);
        } else {
            store.add_batter(team, ingest::batting_from_record(player_id, name, record));
        }
    }
    Ok(())
}

/// Deterministic demo rosters: nine batters and a starter per team, with
/// stats spread around league average so games stay interesting.
fn seed_demo_rosters(store: &MemoryLeague, teams: u32) {
    for team_id in 1..=teams {
        let base = (team_id as i64) * 1000;
        for slot in 1..=9i64 {
            let spread = ((slot * 7 + team_id as i64 * 3) % 9) - 4; // -4..=4
            store.add_batter(
                team_id,
                dd_core::BattingProfile {
                    player_id: base + slot,
                    name: format!("Batter {}-{}", team_id, slot),
                    year: Some(2024),
                    ab: 540,
                    h: (145 + spread * 6) as u32,
                    doubles: (26 + spread) as u32,
                    triples: 3,
                    hr: (16 + spread * 2) as u32,
                    bb: (50 + spread * 4) as u32,
                    so: (110 - spread * 5) as u32,
                    avg: None,
                },
            );
        }
        let spread = (team_id as i64 % 5) - 2;
        store.add_pitcher(
            team_id,
            dd_core::PitchingProfile {
                player_id: base + 10,
                name: format!("Starter {}", team_id),
                year: Some(2024),
                ip: 205.0,
                h: (190 - spread * 8) as u32,
                bb: (58 + spread * 3) as u32,
                so: (165 + spread * 10) as u32,
                hr: (21 - spread) as u32,
            },
            RosterRole::StartingPitcher,
        );
    }
}

fn print_box_score(result: &dd_core::CompletedGame) {
    println!();
    println!(
        "{:<22} {:>3} {:>3} {:>3} {:>4} {:>3} {:>3} {:>3}",
        "BATTING", "AB", "R", "H", "RBI", "HR", "BB", "SO"
    );
    for line in &result.batting_lines {
        println!(
            "{:<22} {:>3} {:>3} {:>3} {:>4} {:>3} {:>3} {:>3}",
            line.name,
            line.line.ab,
            line.line.r,
            line.line.h,
            line.line.rbi,
            line.line.hr,
            line.line.bb,
            line.line.so
        );
    }

    println!();
    println!(
        "{:<22} {:>5} {:>3} {:>3} {:>3} {:>3} {:>3}",
        "PITCHING", "IP", "H", "R", "ER", "BB", "SO"
    );
    for line in &result.pitching_lines {
        let decision = if line.win { " (W)" } else { " (L)" };
        println!(
            "{:<22} {:>5.1} {:>3} {:>3} {:>3} {:>3} {:>3}",
            format!("{}{}", line.name, decision),
            line.line.innings_pitched(),
            line.line.h,
            line.line.r,
            line.line.er,
            line.line.bb,
            line.line.so
        );
    }
}
