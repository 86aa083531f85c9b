//! Opportunity windows: stochastic resets of a collapsing substrate.
//!
//! When the smallest component of S2 drops below the threshold `τ`, S2 is
//! about to settle on a vertex of the simplex. The monitor then subtracts an
//! independent uniform draw scaled by `σ` from every component, floors at ε,
//! and renormalises.
//!
//! # Invariants
//!
//! - Fires if and only if `min(S2) < τ` at the moment of the check.
//! - A check that does not fire leaves S2 untouched and consumes no randomness,
//!   so quiet iterations do not advance the random stream.
//! - The trigger counter only ever increments, by exactly one per firing.

use rand::Rng;
use tracing::debug;

use crate::simplex::SimplexVector;

/// Watches S2 for concentration collapse and opens an opportunity window.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpportunityResetMonitor {
    /// Trigger threshold `τ` on `min(S2)`.
    pub threshold: f64,
    /// Perturbation scale `σ` multiplying each uniform draw.
    pub scale: f64,
    triggered: u64,
}

impl OpportunityResetMonitor {
    /// Create a monitor with threshold `τ` and perturbation scale `σ`.
    pub fn new(threshold: f64, scale: f64) -> Self {
        Self { threshold, scale, triggered: 0 }
    }

    /// Whether `s2` is concentrated enough to open a window.
    pub fn should_fire(&self, s2: &SimplexVector) -> bool {
        s2.min() < self.threshold
    }

    /// Check `s2` and perturb it if the window opens. Returns `true` on firing.
    pub fn check<R: Rng>(&mut self, s2: &mut SimplexVector, rng: &mut R) -> bool {
        if !self.should_fire(s2) {
            return false;
        }
        let min_before = s2.min();
        for s in s2.components_mut() {
            let u: f64 = rng.gen();
            *s -= self.scale * u;
        }
        s2.renormalize();
        self.triggered += 1;
        debug!(
            min_before,
            min_after = s2.min(),
            windows = self.triggered,
            "opportunity window opened"
        );
        true
    }

    /// Number of windows opened so far.
    pub fn triggered(&self) -> u64 {
        self.triggered
    }
}
