//! # dd_core - Era-Normalized Baseball Franchise Simulation Engine
//!
//! Simulation core for a historical baseball franchise game: rosters drafted
//! across eras, plate appearances resolved with the log5 odds-ratio model
//! against per-year league context, a full inning/game state machine, and a
//! circle-method round-robin season scheduler.
//!
//! ## Features
//! - Deterministic simulation (same seed = same game)
//! - Era normalization via cached per-year league averages
//! - Serializable game state, persisted at boundaries by the caller
//! - Collaborator traits for catalog, rosters, and persistence

// Game state APIs carry many fields by nature
#![allow(clippy::too_many_arguments)]

pub mod data;
pub mod engine;
pub mod error;
pub mod models;
pub mod schedule;
pub mod store;

pub use error::{Result, SimError};

// Re-export the main engine surface
pub use engine::at_bat::{calc_log5, resolve_at_bat, PlayEvent, PlayOutcome};
pub use engine::bases::{advance, BaseState, Runner};
pub use engine::game::{GameEngine, GameState, Half, PlayCall};
pub use engine::season::{SeasonSimulator, MAX_GAMES_PER_DAY};
pub use schedule::{generate_schedule, opening_day_anchor, save_schedule, ScheduleConfig};

// Re-export the data model
pub use data::{LeagueContext, LeagueContextProvider, LeagueStatsSource};
pub use models::{
    build_lineup, BattingProfile, CompletedGame, GameId, GameStatus, GameSummary, Lineup,
    PitchingProfile, PlayerId, RosterPlayer, RosterRole, ScheduledGame, TeamId,
    DEFAULT_SEASON_YEAR,
};

// Re-export the collaborator contracts and reference store
pub use store::{MemoryLeague, PlayerCatalog, ResultSink, RosterSource, TeamRecord};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
