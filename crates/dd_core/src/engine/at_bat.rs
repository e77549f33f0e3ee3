//! Plate-appearance resolution.
//!
//! Converts a batter/pitcher matchup plus era context into one play outcome
//! using the log5 odds-ratio model. The outcome buckets are drawn in a fixed
//! order (walk, strikeout, home run, other hit, remainder out) and are
//! deliberately not renormalized to sum to 1; any probability mass left over
//! is an out.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::LeagueContextProvider;
use crate::models::{BattingProfile, PitchingProfile, DEFAULT_SEASON_YEAR};

/// Batting averages below this are treated as malformed (or a pitcher
/// hitting) and floored.
const MIN_CREDIBLE_AVG: f64 = 0.05;
const FLOORED_AVG: f64 = 0.150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayEvent {
    Out,
    Single,
    Double,
    Triple,
    HomeRun,
    Walk,
    Strikeout,
    /// Produced by the sacrifice-bunt play call, never by a swing.
    Sacrifice,
}

impl PlayEvent {
    pub fn is_hit(&self) -> bool {
        matches!(
            self,
            PlayEvent::Single | PlayEvent::Double | PlayEvent::Triple | PlayEvent::HomeRun
        )
    }

    /// Bases the batter takes when reaching on this event.
    pub fn bases(&self) -> u8 {
        match self {
            PlayEvent::Single => 1,
            PlayEvent::Double => 2,
            PlayEvent::Triple => 3,
            PlayEvent::HomeRun => 4,
            _ => 0,
        }
    }
}

/// A resolved plate appearance: the event plus its play-by-play description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub event: PlayEvent,
    pub desc: String,
}

impl PlayOutcome {
    pub fn new(event: PlayEvent, desc: &str) -> Self {
        Self {
            event,
            desc: desc.to_string(),
        }
    }
}

/// log5 matchup combination of a batter rate, a pitcher rate, and the league
/// rate for the same event.
///
/// Inputs are clamped away from 0 and 1 so the odds ratio can never
/// degenerate; for any x in (0,1), `calc_log5(x, x, x) == x`.
pub fn calc_log5(b: f64, p: f64, l: f64) -> f64 {
    let l = l.clamp(0.01, 0.99);
    let b = b.clamp(0.001, 0.999);
    let p = p.clamp(0.001, 0.999);
    let odds = (b * p) / l;
    let inverse = ((1.0 - b) * (1.0 - p)) / (1.0 - l);
    odds / (odds + inverse)
}

/// Resolves one plate appearance between `batter` and `pitcher`.
///
/// The pitcher's season year selects the era context: the matchup is played
/// in the pitcher's environment. Profiles without a year use the configured
/// current season.
pub fn resolve_at_bat(
    batter: &BattingProfile,
    pitcher: &PitchingProfile,
    context: &LeagueContextProvider,
    rng: &mut impl Rng,
) -> PlayOutcome {
    let year = pitcher.year.unwrap_or(DEFAULT_SEASON_YEAR);
    let env = context.context_for(year);

    let prob_bb = calc_log5(batter.walk_rate(), pitcher.walk_rate(), env.walk_rate());
    let prob_so = calc_log5(
        batter.strikeout_rate(),
        pitcher.strikeout_rate(),
        env.strikeout_rate(),
    );
    let prob_hr = calc_log5(
        batter.home_run_rate(),
        pitcher.home_run_rate(),
        env.home_run_rate(),
    );

    let mut avg = batter.batting_average();
    if avg < MIN_CREDIBLE_AVG {
        // Floor for pitchers hitting
        avg = FLOORED_AVG;
    }
    let prob_hit = calc_log5(avg, pitcher.opponent_average(), env.batting_average());

    let mut roll: f64 = rng.gen();

    if roll < prob_bb {
        return PlayOutcome::new(PlayEvent::Walk, "Walk");
    }
    roll -= prob_bb;

    if roll < prob_so {
        return PlayOutcome::new(PlayEvent::Strikeout, "Strikeout");
    }
    roll -= prob_so;

    if roll < prob_hr {
        return PlayOutcome::new(PlayEvent::HomeRun, "Home Run");
    }
    roll -= prob_hr;

    // Hit check: home runs already consumed their share above.
    if roll < prob_hit - prob_hr {
        return determine_hit_type(batter, rng);
    }

    PlayOutcome::new(PlayEvent::Out, "Out")
}

/// Splits a non-home-run hit by the batter's own career distribution of
/// doubles and triples per hit; whatever remains is a single.
fn determine_hit_type(batter: &BattingProfile, rng: &mut impl Rng) -> PlayOutcome {
    let hits = batter.h.max(1) as f64;
    let double_share = batter.doubles as f64 / hits;
    let triple_share = batter.triples as f64 / hits;

    let roll: f64 = rng.gen();
    if roll < double_share {
        PlayOutcome::new(PlayEvent::Double, "Double")
    } else if roll < double_share + triple_share {
        PlayOutcome::new(PlayEvent::Triple, "Triple")
    } else {
        PlayOutcome::new(PlayEvent::Single, "Single")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_batter() -> BattingProfile {
        BattingProfile {
            player_id: 1,
            name: "Batter".to_string(),
            year: Some(2024),
            ab: 550,
            h: 165,
            doubles: 30,
            triples: 5,
            hr: 25,
            bb: 60,
            so: 110,
            avg: None,
        }
    }

    fn test_pitcher() -> PitchingProfile {
        PitchingProfile {
            player_id: 2,
            name: "Pitcher".to_string(),
            year: Some(2024),
            ip: 190.0,
            h: 175,
            bb: 55,
            so: 180,
            hr: 20,
        }
    }

    #[test]
    fn log5_known_values() {
        // equal batter and league rates collapse to the pitcher rate side
        let p = calc_log5(0.300, 0.250, 0.250);
        assert!(p > 0.250 && p < 0.400);
        // degenerate league input is clamped, not divided by
        let q = calc_log5(0.3, 0.3, 0.0);
        assert!(q.is_finite() && q > 0.0 && q < 1.0);
    }

    #[test]
    fn floored_average_guards_pitchers_hitting() {
        let mut weak = test_batter();
        weak.ab = 100;
        weak.h = 2;
        weak.hr = 0;
        weak.bb = 5;
        weak.so = 20;
        weak.avg = None;
        // 0.020 average floors to 0.150: hit probability must not collapse
        let provider = LeagueContextProvider::modern_only();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut hits = 0u32;
        for _ in 0..4000 {
            if resolve_at_bat(&weak, &test_pitcher(), &provider, &mut rng)
                .event
                .is_hit()
            {
                hits += 1;
            }
        }
        let rate = hits as f64 / 4000.0;
        assert!(rate > 0.08, "floor keeps hit rate alive, got {}", rate);
    }

    #[test]
    fn bucket_order_walk_first() {
        // a batter who walked every career PA should walk essentially always
        let mut walker = test_batter();
        walker.ab = 1;
        walker.h = 1;
        walker.bb = 999;
        walker.so = 0;
        let provider = LeagueContextProvider::modern_only();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut walks = 0u32;
        for _ in 0..1000 {
            if resolve_at_bat(&walker, &test_pitcher(), &provider, &mut rng).event
                == PlayEvent::Walk
            {
                walks += 1;
            }
        }
        assert!(walks > 900, "expected walk-dominated outcomes, got {}", walks);
    }

    #[test]
    fn hit_type_split_follows_career_shares() {
        let mut batter = test_batter();
        batter.h = 100;
        batter.doubles = 30;
        batter.triples = 10;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut counts = [0u32; 3]; // single, double, triple
        for _ in 0..10_000 {
            match determine_hit_type(&batter, &mut rng).event {
                PlayEvent::Single => counts[0] += 1,
                PlayEvent::Double => counts[1] += 1,
                PlayEvent::Triple => counts[2] += 1,
                other => unreachable!("unexpected hit type {:?}", other),
            }
        }
        let doubles = counts[1] as f64 / 10_000.0;
        let triples = counts[2] as f64 / 10_000.0;
        assert!((doubles - 0.30).abs() < 0.02, "doubles share {}", doubles);
        assert!((triples - 0.10).abs() < 0.02, "triples share {}", triples);
    }

    #[test]
    fn empirical_hit_rate_matches_log5() {
        // .400 hitter with no walk/strikeout history against a pitcher whose
        // derived opponent average is exactly the league .250:
        // expected hit probability = log5(.400, .250, .250) = .400
        let batter = BattingProfile {
            player_id: 1,
            name: "Slugger".to_string(),
            year: Some(2024),
            ab: 1000,
            h: 400,
            doubles: 0,
            triples: 0,
            hr: 0,
            bb: 0,
            so: 0,
            avg: Some(0.400),
        };
        // 145 H over 150 * 2.9 + 145 = 580 at-bats faced = .250 allowed
        let pitcher = PitchingProfile {
            player_id: 2,
            name: "League Average".to_string(),
            year: Some(2024),
            ip: 150.0,
            h: 145,
            bb: 45,
            so: 110,
            hr: 15,
        };
        assert!((pitcher.opponent_average() - 0.250).abs() < 1e-9);

        let expected = calc_log5(0.400, pitcher.opponent_average(), 0.250);
        assert!((expected - 0.400).abs() < 1e-9);

        let provider = LeagueContextProvider::modern_only();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut hits = 0u32;
        let trials = 10_000;
        for _ in 0..trials {
            if resolve_at_bat(&batter, &pitcher, &provider, &mut rng)
                .event
                .is_hit()
            {
                hits += 1;
            }
        }
        let rate = hits as f64 / trials as f64;
        assert!(
            (rate - expected).abs() < 0.02,
            "empirical {} vs log5 {}",
            rate,
            expected
        );
    }

    proptest! {
        /// Property: output stays inside (0,1) for the whole valid input cube.
        #[test]
        fn prop_log5_in_open_unit_interval(
            b in 0.0001f64..0.9999,
            p in 0.0001f64..0.9999,
            l in 0.0001f64..0.9999
        ) {
            let out = calc_log5(b, p, l);
            prop_assert!(out > 0.0 && out < 1.0);
            prop_assert!(out.is_finite());
        }

        /// Property: identical batter/pitcher/league rates are a fixed point.
        #[test]
        fn prop_log5_fixed_point(x in 0.01f64..0.99) {
            let out = calc_log5(x, x, x);
            prop_assert!((out - x).abs() < 1e-9);
        }

        /// Property: hostile inputs (outside [0,1]) still yield a probability.
        #[test]
        fn prop_log5_clamps_hostile_inputs(
            b in -5.0f64..5.0,
            p in -5.0f64..5.0,
            l in -5.0f64..5.0
        ) {
            let out = calc_log5(b, p, l);
            prop_assert!(out > 0.0 && out < 1.0);
        }
    }
}
