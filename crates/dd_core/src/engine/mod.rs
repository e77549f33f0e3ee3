//! The simulation engine: plate appearances, base running, the game state
//! machine, and the season driver.

pub mod at_bat;
pub mod bases;
pub mod game;
pub mod season;

pub use at_bat::{calc_log5, resolve_at_bat, PlayEvent, PlayOutcome};
pub use bases::{advance, BaseState, Runner};
pub use game::{
    GameEngine, GameState, Half, PlayCall, TeamGameState, HARD_CUTOFF_INNINGS,
    MAX_PLATE_APPEARANCES, REGULATION_INNINGS,
};
pub use season::{SeasonSimulator, MAX_GAMES_PER_DAY};
