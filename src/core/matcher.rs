use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use crate::models::Decision;

/// Default chance that an accept turns into a match
pub const DEFAULT_MATCH_PROBABILITY: f64 = 0.2;

/// Decides whether an accept on a candidate produces a match
///
/// Stand-in for a real matching service. Implemented for closures so callers
/// can force outcomes.
pub trait MatchPolicy: Send + Sync {
    fn should_match(&self, candidate_id: &str, decision: Decision) -> bool;
}

impl<F> MatchPolicy for F
where
    F: Fn(&str, Decision) -> bool + Send + Sync,
{
    fn should_match(&self, candidate_id: &str, decision: Decision) -> bool {
        self(candidate_id, decision)
    }
}

/// Independent uniform draw per decision; matches iff the draw is below `probability`
#[derive(Debug)]
pub struct RandomMatchPolicy {
    probability: f64,
    rng: Option<Mutex<StdRng>>,
}

impl RandomMatchPolicy {
    /// Draws from the thread-local RNG
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng: None,
        }
    }

    /// Reproducible draws from a seeded RNG
    pub fn seeded(probability: f64, seed: u64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    fn draw(&self) -> f64 {
        match &self.rng {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                rng.gen::<f64>()
            }
            None => rand::random::<f64>(),
        }
    }
}

impl Default for RandomMatchPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_PROBABILITY)
    }
}

impl MatchPolicy for RandomMatchPolicy {
    fn should_match(&self, candidate_id: &str, decision: Decision) -> bool {
        if !decision.is_accept() {
            return false;
        }
        let draw = self.draw();
        let matched = draw < self.probability;
        tracing::trace!("Match draw for {}: {:.3} (threshold {:.3}) -> {}", candidate_id, draw, self.probability, matched);
        matched
    }
}
