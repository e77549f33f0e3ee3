//! Teams and lineup construction.

use serde::{Deserialize, Serialize};

use super::player::{BattingProfile, PitchingProfile, RosterPlayer, RosterRole};

pub type TeamId = u32;

/// Batting order slots. Indices wrap with modulo-9 advancement.
pub const LINEUP_SIZE: usize = 9;

/// A game-ready lineup: nine batters and a starting pitcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lineup {
    pub batting_order: Vec<RosterPlayer>,
    pub pitcher: RosterPlayer,
}

/// Builds a lineup from a stat-hydrated roster.
///
/// Starting pitcher selection: first roster entry marked as a starter, then
/// any pitcher at all, then a synthetic replacement. The batting order takes
/// the first nine position players and pads any remaining holes with
/// replacement hitters, so an incomplete roster can never stall a game.
pub fn build_lineup(roster: &[RosterPlayer]) -> Lineup {
    let pitcher = roster
        .iter()
        .find(|p| p.role == RosterRole::StartingPitcher)
        .or_else(|| roster.iter().find(|p| p.is_pitcher()))
        .cloned()
        .unwrap_or_else(replacement_pitcher);

    let mut batting_order: Vec<RosterPlayer> = roster
        .iter()
        .filter(|p| p.role == RosterRole::PositionPlayer)
        .take(LINEUP_SIZE)
        .cloned()
        .collect();

    while batting_order.len() < LINEUP_SIZE {
        batting_order.push(replacement_hitter(batting_order.len()));
    }

    Lineup {
        batting_order,
        pitcher,
    }
}

/// Synthetic starter used when a roster has no pitcher at all.
pub fn replacement_pitcher() -> RosterPlayer {
    RosterPlayer {
        player_id: 0,
        name: "Replacement Pitcher".to_string(),
        role: RosterRole::StartingPitcher,
        batting: None,
        pitching: Some(PitchingProfile::replacement(0, "Replacement Pitcher")),
    }
}

/// Synthetic hitter used to pad a short batting order. Each slot gets a
/// distinct negative id so stat buckets never collide.
pub fn replacement_hitter(slot: usize) -> RosterPlayer {
    let player_id = -((slot as i64) + 1);
    RosterPlayer {
        player_id,
        name: "Replacement Player".to_string(),
        role: RosterRole::PositionPlayer,
        batting: Some(BattingProfile::replacement(player_id, "Replacement Player")),
        pitching: None,
    }
}
