//! The relaxation engine: state ownership, the step loop and the trajectory log.
//!
//! One [`RelaxationEngine`] owns S1, S2, the latent cloud, the reset monitor,
//! the random source and the append-only trajectory. Each step runs, in order:
//!
//! 1. [`OpportunityResetMonitor::check`] on S2,
//! 2. [`entropy_gradient_step`] on S1,
//! 3. [`gate_transport_step`] on S2 using the S1 produced by (2),
//!
//! and appends one [`MeasurementRecord`].
//!
//! # Invariants
//!
//! - Configuration is validated once, at construction; a built engine never fails.
//! - The trajectory never holds more than `iterations` records and is never truncated.
//! - Given the same configuration and the same seeded source, two engines
//!   produce identical trajectories.
//! - The engine is the only writer of S1 and S2. Readers get shared references.

use alloc::vec::Vec;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, trace};

use crate::entropy::entropy_gradient_step;
use crate::error::ConfigError;
use crate::gate::gate_transport_step;
use crate::hyperbolic::{embed_all, expansion_factor, EmbeddedPoint, LatentCoordinate};
use crate::simplex::SimplexVector;
use crate::summary::RunSummary;
use crate::window::OpportunityResetMonitor;

/// Upper bound on the trajectory capacity reserved at construction.
const TRAJECTORY_PREALLOC: usize = 4096;

// ─── EngineConfig ────────────────────────────────────────────────────────────

/// Immutable engine parameters.
///
/// Default values reproduce the "broken gate" run: twelve concepts, 150
/// iterations, `γ = 0.15`, `β = 0.85`, `τ = 0.08`, `σ = 0.3`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Simplex dimension N. Must be at least 1.
    pub dimension: usize,
    /// Number of steps [`RelaxationEngine::run`] performs.
    pub iterations: usize,
    /// Step size `γ` shared by both phases, in `(0, 1]`.
    pub learning_rate: f64,
    /// Gating exponent `β`, positive; values below 1 flatten the S2 target.
    pub gate_exponent: f64,
    /// Reset threshold `τ` on `min(S2)`, in `[0, 1]`. Zero disables resets.
    pub reset_threshold: f64,
    /// Reset perturbation scale `σ`, non-negative.
    pub reset_scale: f64,
    /// Standard deviation of the latent cloud coordinates, non-negative.
    pub latent_scale: f64,
}

impl EngineConfig {
    /// The "broken gate" run with opportunity windows enabled.
    pub fn broken_gate() -> Self {
        Self {
            dimension: 12,
            iterations: 150,
            learning_rate: 0.15,
            gate_exponent: 0.85,
            reset_threshold: 0.08,
            reset_scale: 0.3,
            latent_scale: 0.3,
        }
    }

    /// The canonical visualisation run: 100 frames, no opportunity windows.
    pub fn canonical() -> Self {
        Self {
            iterations: 100,
            reset_threshold: 0.0,
            ..Self::broken_gate()
        }
    }

    /// Check every parameter against its admissible range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimension == 0 {
            return Err(ConfigError::EmptyDimension(self.dimension));
        }
        check(
            "learning_rate",
            self.learning_rate,
            self.learning_rate > 0.0 && self.learning_rate <= 1.0,
            "(0, 1]",
        )?;
        check(
            "gate_exponent",
            self.gate_exponent,
            self.gate_exponent > 0.0 && self.gate_exponent.is_finite(),
            "(0, ∞)",
        )?;
        check(
            "reset_threshold",
            self.reset_threshold,
            (0.0..=1.0).contains(&self.reset_threshold),
            "[0, 1]",
        )?;
        check(
            "reset_scale",
            self.reset_scale,
            self.reset_scale >= 0.0 && self.reset_scale.is_finite(),
            "[0, ∞)",
        )?;
        check(
            "latent_scale",
            self.latent_scale,
            self.latent_scale >= 0.0 && self.latent_scale.is_finite(),
            "[0, ∞)",
        )
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::broken_gate()
    }
}

fn check(name: &'static str, value: f64, ok: bool, range: &'static str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value, range })
    }
}

// ─── MeasurementRecord ───────────────────────────────────────────────────────

/// Per-iteration measurements, appended once per step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurementRecord {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Entropy of S1 *before* this iteration's Alpha update, in nats.
    pub s1_entropy: f64,
    /// Mean of S2 after the step.
    pub s2_mean: f64,
    /// Minimum of S2 after the step.
    pub s2_min: f64,
    /// Maximum of S1 after the step.
    pub max_activation: f64,
    /// Whether an opportunity window opened at the start of this iteration.
    pub window_opened: bool,
}

// ─── RelaxationEngine ────────────────────────────────────────────────────────

/// Dual-state relaxation engine.
///
/// Generic over the random source so tests and callers can pass any seeded
/// [`Rng`]; [`RelaxationEngine::from_seed`] picks `ChaCha8Rng`.
///
/// ```rust,ignore
/// use gate_dynamics::{EngineConfig, RelaxationEngine};
///
/// let mut engine = RelaxationEngine::from_seed(EngineConfig::default(), 42)?;
/// engine.run();
/// assert_eq!(engine.trajectory().len(), 150);
/// ```
#[derive(Clone, Debug)]
pub struct RelaxationEngine<R = ChaCha8Rng> {
    config: EngineConfig,
    s1: SimplexVector,
    s2: SimplexVector,
    latent: Vec<LatentCoordinate>,
    monitor: OpportunityResetMonitor,
    trajectory: Vec<MeasurementRecord>,
    rng: R,
}

impl RelaxationEngine<ChaCha8Rng> {
    /// Build an engine whose random source is `ChaCha8Rng` seeded with `seed`.
    pub fn from_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> RelaxationEngine<R> {
    /// Validate `config`, then draw S1, S2 (uniform on the simplex) and the
    /// latent cloud from `rng`, in that order.
    pub fn new(config: EngineConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let s1 = SimplexVector::sample_dirichlet(config.dimension, &mut rng)?;
        let s2 = SimplexVector::sample_dirichlet(config.dimension, &mut rng)?;
        let latent = LatentCoordinate::sample_cloud(config.dimension, config.latent_scale, &mut rng);
        Ok(Self::assemble(config, s1, s2, latent, rng))
    }

    /// Build an engine from caller-supplied S1 and S2.
    ///
    /// Both vectors must have exactly `config.dimension` components. The
    /// latent cloud is still drawn from `rng`.
    pub fn with_state(
        config: EngineConfig,
        s1: SimplexVector,
        s2: SimplexVector,
        mut rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        for (name, v) in [("s1", &s1), ("s2", &s2)] {
            if v.len() != config.dimension {
                return Err(ConfigError::DimensionMismatch {
                    name,
                    expected: config.dimension,
                    actual: v.len(),
                });
            }
        }
        let latent = LatentCoordinate::sample_cloud(config.dimension, config.latent_scale, &mut rng);
        Ok(Self::assemble(config, s1, s2, latent, rng))
    }

    fn assemble(
        config: EngineConfig,
        s1: SimplexVector,
        s2: SimplexVector,
        latent: Vec<LatentCoordinate>,
        rng: R,
    ) -> Self {
        let monitor = OpportunityResetMonitor::new(config.reset_threshold, config.reset_scale);
        let trajectory = Vec::with_capacity(config.iterations.min(TRAJECTORY_PREALLOC));
        Self { config, s1, s2, latent, monitor, trajectory, rng }
    }

    /// Advance one iteration and return its record.
    ///
    /// Returns `None` once `iterations` records exist; the state is then left
    /// untouched. Stopping early is simply not calling `step` again.
    pub fn step(&mut self) -> Option<MeasurementRecord> {
        if self.is_complete() {
            return None;
        }
        let iteration = self.trajectory.len();
        let gamma = self.config.learning_rate;

        let window_opened = self.monitor.check(&mut self.s2, &mut self.rng);
        let s1_entropy = entropy_gradient_step(&mut self.s1, gamma);
        gate_transport_step(&mut self.s2, &self.s1, gamma, self.config.gate_exponent);

        let record = MeasurementRecord {
            iteration,
            s1_entropy,
            s2_mean: self.s2.mean(),
            s2_min: self.s2.min(),
            max_activation: self.s1.max(),
            window_opened,
        };
        trace!(
            iteration,
            s1_entropy,
            s2_min = record.s2_min,
            max_activation = record.max_activation,
            window_opened,
            "step"
        );
        self.trajectory.push(record);

        if self.is_complete() {
            info!(
                iterations = self.trajectory.len(),
                windows = self.monitor.triggered(),
                final_entropy = self.s1.entropy(),
                "relaxation run complete"
            );
        }
        Some(record)
    }

    /// Run every remaining iteration. Afterwards the trajectory holds exactly
    /// `iterations` records.
    pub fn run(&mut self) {
        while self.step().is_some() {}
    }

    /// `true` once the configured number of iterations has been performed.
    pub fn is_complete(&self) -> bool {
        self.trajectory.len() >= self.config.iterations
    }

    /// Current inference state S1.
    pub fn s1(&self) -> &SimplexVector {
        &self.s1
    }

    /// Current substrate state S2.
    pub fn s2(&self) -> &SimplexVector {
        &self.s2
    }

    /// All records so far, in iteration order.
    pub fn trajectory(&self) -> &[MeasurementRecord] {
        &self.trajectory
    }

    /// Number of opportunity windows opened so far.
    pub fn windows_triggered(&self) -> u64 {
        self.monitor.triggered()
    }

    /// The fixed latent cloud, one point per state component.
    pub fn latent(&self) -> &[LatentCoordinate] {
        &self.latent
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Project the latent cloud for one rendered frame.
    pub fn embed_frame(&self, frame: usize, total_frames: usize) -> Vec<EmbeddedPoint> {
        embed_all(&self.latent, expansion_factor(frame, total_frames))
    }

    /// Whole-run statistics over the trajectory so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_trajectory(&self.trajectory, self.monitor.triggered())
    }
}
