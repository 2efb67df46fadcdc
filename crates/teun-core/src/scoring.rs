//! Volume and difficulty arithmetic applied to every generated prompt.
//!
//! Factors are held in basis points so the AI-volume estimate is exact
//! integer arithmetic with round-half-up.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Difficulty, Intent, TrendSignal};

/// Volume assumed when the generator omits or zeroes `estimatedGoogleVolume`.
pub const DEFAULT_GOOGLE_VOLUME: u32 = 500;

const COMMERCIAL_BP: u32 = 2_000;
const INFORMATIONAL_BP: u32 = 1_500;
const TREND_ADJUST_BP: u32 = 500;
const MIN_FACTOR_BP: u32 = 800;

/// AI volume at or above which a prompt lands at the top of its difficulty band.
const DIFFICULTY_VOLUME_CAP: u32 = 400;

/// Multiplier from Google volume to AI volume, in basis points.
#[must_use]
pub fn ai_factor_bp(intent: Intent, trend: TrendSignal) -> u32 {
    let base = match intent {
        Intent::Commercial => COMMERCIAL_BP,
        Intent::Informational => INFORMATIONAL_BP,
    };
    let adjusted = match trend {
        TrendSignal::Rising => base + TREND_ADJUST_BP,
        TrendSignal::Stable => base,
        TrendSignal::Declining => base.saturating_sub(TREND_ADJUST_BP),
    };
    adjusted.max(MIN_FACTOR_BP)
}

/// Multiplier as a fraction, for display.
#[must_use]
pub fn ai_factor(intent: Intent, trend: TrendSignal) -> f64 {
    f64::from(ai_factor_bp(intent, trend)) / 10_000.0
}

/// `round(google_volume * factor)`.
#[must_use]
pub fn estimate_ai_volume(google_volume: u32, intent: Intent, trend: TrendSignal) -> u32 {
    let scaled = u64::from(google_volume) * u64::from(ai_factor_bp(intent, trend));
    u32::try_from((scaled + 5_000) / 10_000).unwrap_or(u32::MAX)
}

/// Half-open score band `[lo, hi)` for a difficulty level.
#[must_use]
pub fn difficulty_band(difficulty: Difficulty) -> (u8, u8) {
    match difficulty {
        Difficulty::Easy => (8, 30),
        Difficulty::Medium => (30, 60),
        Difficulty::Hard => (60, 85),
    }
}

/// Assigns a `difficultyScore` inside the band of the prompt's difficulty.
///
/// Without a seed the score is a pure function of difficulty and AI volume:
/// higher volume sits higher in the band. With a seed, scores are drawn
/// uniformly from the band by a seeded generator, so a run is reproducible.
#[derive(Debug)]
pub struct DifficultyScorer {
    rng: Option<StdRng>,
}

impl DifficultyScorer {
    #[must_use]
    pub fn deterministic() -> Self {
        Self { rng: None }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }

    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::deterministic, Self::seeded)
    }

    pub fn score(&mut self, difficulty: Difficulty, ai_volume: u32) -> u8 {
        let (lo, hi) = difficulty_band(difficulty);
        match self.rng.as_mut() {
            Some(rng) => rng.random_range(lo..hi),
            None => {
                let span = u32::from(hi - 1 - lo);
                let v = ai_volume.min(DIFFICULTY_VOLUME_CAP);
                let offset = (span * v * 2 + DIFFICULTY_VOLUME_CAP) / (DIFFICULTY_VOLUME_CAP * 2);
                lo + u8::try_from(offset).unwrap_or(hi - 1 - lo)
            }
        }
    }
}
