//! Base runners and advancement.
//!
//! Two advancement policies: walks force runners ahead of an occupied chain
//! only, hits advance runners with fixed probabilities. The probabilities
//! (60% to score from 2nd on a single, 40% from 1st on a double) are a
//! deliberate simplification of real baserunning decision-making, not tuned
//! values.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::PlayerId;

/// A runner occupying a base. Weak reference back to the lineup entry; the
/// player also exists independently as a batting-order slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    pub player_id: PlayerId,
    pub name: String,
}

impl Runner {
    pub fn new(player_id: PlayerId, name: &str) -> Self {
        Self {
            player_id,
            name: name.to_string(),
        }
    }
}

/// The three bases: index 0 = 1st, 1 = 2nd, 2 = 3rd.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseState {
    slots: [Option<Runner>; 3],
}

impl BaseState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn runner_on(&self, base: usize) -> Option<&Runner> {
        self.slots.get(base).and_then(|slot| slot.as_ref())
    }

    /// Places a runner for test setup or pinch-running; index 0 = 1st base.
    pub fn put(&mut self, base: usize, runner: Runner) {
        if base < 3 {
            self.slots[base] = Some(runner);
        }
    }

    pub fn occupied_count(&self) -> u32 {
        self.slots.iter().filter(|slot| slot.is_some()).count() as u32
    }

    pub fn is_loaded(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_some())
    }

    pub fn clear(&mut self) {
        self.slots = [None, None, None];
    }
}

/// Advances the runners for one play and returns the runs scored.
///
/// `bases_hit` is the batter's advancement (1..=3, or 4+ for a home run);
/// `batter_reaches` is false for sacrifices, where the advancement still
/// runs but the batter is out; `is_walk` switches to the forced-advance
/// policy (where `bases_hit` and `batter_reaches` are ignored: the batter
/// always takes 1st).
pub fn advance(
    bases: &mut BaseState,
    bases_hit: u8,
    batter_reaches: bool,
    is_walk: bool,
    batter: Runner,
    rng: &mut impl Rng,
) -> u32 {
    if is_walk {
        return advance_on_walk(bases, batter);
    }

    // Home run: dedicated branch, clears the bases.
    if bases_hit >= 4 {
        let runs = 1 + bases.occupied_count();
        bases.clear();
        return runs;
    }

    let mut runs = 0u32;
    let mut new_slots: [Option<Runner>; 3] = [None, None, None];

    // Runner on 3rd always scores.
    if bases.slots[2].is_some() {
        runs += 1;
    }

    // Runner on 2nd: scores on any extra-base hit; on a single, scores 60%
    // of the time, else takes 3rd.
    if let Some(runner) = bases.slots[1].take() {
        if bases_hit >= 2 || rng.gen_range(0..100) < 60 {
            runs += 1;
        } else {
            new_slots[2] = Some(runner);
        }
    }

    // Runner on 1st: scores on a triple; on a double, scores 40% of the
    // time, else takes 3rd; on a single, takes 2nd.
    if let Some(runner) = bases.slots[0].take() {
        if bases_hit >= 3 {
            runs += 1;
        } else if bases_hit == 2 {
            if rng.gen_range(0..100) < 40 {
                runs += 1;
            } else {
                new_slots[2] = Some(runner);
            }
        } else {
            new_slots[1] = Some(runner);
        }
    }

    if batter_reaches {
        match bases_hit {
            3 => new_slots[2] = Some(batter),
            2 => new_slots[1] = Some(batter),
            _ => new_slots[0] = Some(batter),
        }
    }

    bases.slots = new_slots;
    runs
}

/// Forced advancement only: a runner moves up exactly when every base behind
/// him back to the batter is occupied. A run scores from 3rd only with the
/// bases loaded.
fn advance_on_walk(bases: &mut BaseState, batter: Runner) -> u32 {
    let mut runs = 0u32;

    let first = bases.slots[0].is_some();
    let second = bases.slots[1].is_some();
    let third = bases.slots[2].is_some();

    if first && second && third {
        runs += 1;
        bases.slots[2] = bases.slots[1].take();
        bases.slots[1] = bases.slots[0].take();
    } else if first && second {
        bases.slots[2] = bases.slots[1].take();
        bases.slots[1] = bases.slots[0].take();
    } else if first {
        bases.slots[1] = bases.slots[0].take();
    }
    bases.slots[0] = Some(batter);

    runs
}
