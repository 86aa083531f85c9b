//! Python FFI bindings via PyO3.
//!
//! Exposes the relaxation engine to Python with a `ChaCha8Rng` random source
//! seeded from an integer, so Python runs are reproducible.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from gate_dynamics import EngineConfig, RelaxationEngine, embed, expansion_factor
//!
//! config = EngineConfig(dimension=12, iterations=150)
//! engine = RelaxationEngine(config, seed=42)
//! engine.run()
//! print(engine.windows_triggered)
//! print(engine.trajectory()[-1])   # (iteration, s1_entropy, s2_mean, s2_min, max_activation, window_opened)
//! print(engine.embed_frame(99, 100))
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::engine::{EngineConfig as RustEngineConfig, RelaxationEngine as RustEngine};
use crate::error::ConfigError;
use crate::hyperbolic::{self, LatentCoordinate};

fn to_py_err(e: ConfigError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ── EngineConfig ─────────────────────────────────────────────────────────────

/// Engine parameters. Validated when a RelaxationEngine is built.
#[pyclass(name = "EngineConfig")]
#[derive(Clone)]
pub struct PyEngineConfig {
    inner: RustEngineConfig,
}

#[pymethods]
impl PyEngineConfig {
    /// Create a configuration. Defaults reproduce the "broken gate" run.
    ///
    /// Args:
    ///     dimension:       simplex dimension N (default 12)
    ///     iterations:      number of steps (default 150)
    ///     learning_rate:   γ in (0, 1] (default 0.15)
    ///     gate_exponent:   β > 0 (default 0.85)
    ///     reset_threshold: τ in [0, 1], 0 disables windows (default 0.08)
    ///     reset_scale:     σ ≥ 0 (default 0.3)
    ///     latent_scale:    latent cloud standard deviation (default 0.3)
    #[new]
    #[pyo3(signature = (
        dimension=12,
        iterations=150,
        learning_rate=0.15,
        gate_exponent=0.85,
        reset_threshold=0.08,
        reset_scale=0.3,
        latent_scale=0.3
    ))]
    pub fn new(
        dimension: usize,
        iterations: usize,
        learning_rate: f64,
        gate_exponent: f64,
        reset_threshold: f64,
        reset_scale: f64,
        latent_scale: f64,
    ) -> PyResult<Self> {
        let inner = RustEngineConfig {
            dimension,
            iterations,
            learning_rate,
            gate_exponent,
            reset_threshold,
            reset_scale,
            latent_scale,
        };
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// The reset-free canonical visualisation preset.
    #[staticmethod]
    pub fn canonical() -> Self {
        Self { inner: RustEngineConfig::canonical() }
    }

    /// Simplex dimension N.
    #[getter]
    pub fn dimension(&self) -> usize {
        self.inner.dimension
    }

    /// Configured iteration count.
    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        let c = &self.inner;
        format!(
            "EngineConfig(dimension={}, iterations={}, learning_rate={}, gate_exponent={}, \
             reset_threshold={}, reset_scale={}, latent_scale={})",
            c.dimension,
            c.iterations,
            c.learning_rate,
            c.gate_exponent,
            c.reset_threshold,
            c.reset_scale,
            c.latent_scale,
        )
    }
}

// ── RelaxationEngine ─────────────────────────────────────────────────────────

/// Dual-state relaxation engine with a seeded ChaCha8 random source.
#[pyclass(name = "RelaxationEngine")]
pub struct PyRelaxationEngine {
    inner: RustEngine,
}

type PyRecord = (usize, f64, f64, f64, f64, bool);

#[pymethods]
impl PyRelaxationEngine {
    /// Build an engine from a configuration and an integer seed.
    #[new]
    #[pyo3(signature = (config, seed=42))]
    pub fn new(config: &PyEngineConfig, seed: u64) -> PyResult<Self> {
        let inner = RustEngine::from_seed(config.inner.clone(), seed).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Advance one step. Returns the record tuple, or None once the run is complete.
    pub fn step(&mut self) -> Option<PyRecord> {
        self.inner.step().map(|r| {
            (r.iteration, r.s1_entropy, r.s2_mean, r.s2_min, r.max_activation, r.window_opened)
        })
    }

    /// Run every remaining iteration.
    pub fn run(&mut self) {
        self.inner.run();
    }

    /// Current S1 as a list of floats.
    pub fn s1(&self) -> Vec<f64> {
        self.inner.s1().as_slice().to_vec()
    }

    /// Current S2 as a list of floats.
    pub fn s2(&self) -> Vec<f64> {
        self.inner.s2().as_slice().to_vec()
    }

    /// Trajectory as a list of
    /// (iteration, s1_entropy, s2_mean, s2_min, max_activation, window_opened) tuples.
    pub fn trajectory(&self) -> Vec<PyRecord> {
        self.inner
            .trajectory()
            .iter()
            .map(|r| (r.iteration, r.s1_entropy, r.s2_mean, r.s2_min, r.max_activation, r.window_opened))
            .collect()
    }

    /// Number of opportunity windows opened so far.
    #[getter]
    pub fn windows_triggered(&self) -> u64 {
        self.inner.windows_triggered()
    }

    /// True once every configured iteration has run.
    #[getter]
    pub fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    /// Latent cloud projected into the Poincaré disk for one frame, as (x, y) pairs.
    pub fn embed_frame(&self, frame: usize, total_frames: usize) -> Vec<(f64, f64)> {
        self.inner
            .embed_frame(frame, total_frames)
            .into_iter()
            .map(|p| (p.x, p.y))
            .collect()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "RelaxationEngine(step={}/{}, windows={})",
            self.inner.trajectory().len(),
            self.inner.config().iterations,
            self.inner.windows_triggered(),
        )
    }
}

// ── Free functions ───────────────────────────────────────────────────────────

/// Exponential map at the origin: project (x, y) × expansion into the unit disk.
#[pyfunction]
pub fn embed(x: f64, y: f64, expansion: f64) -> (f64, f64) {
    let p = hyperbolic::embed(&LatentCoordinate::new(x, y), expansion);
    (p.x, p.y)
}

/// Expansion factor 1 + frame / total_frames.
#[pyfunction]
pub fn expansion_factor(frame: usize, total_frames: usize) -> f64 {
    hyperbolic::expansion_factor(frame, total_frames)
}

// ── Module entry point ───────────────────────────────────────────────────────

/// Dual-state simplex relaxation engine, Python bindings.
#[pymodule]
pub fn gate_dynamics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyEngineConfig>()?;
    m.add_class::<PyRelaxationEngine>()?;
    m.add_function(wrap_pyfunction!(embed, m)?)?;
    m.add_function(wrap_pyfunction!(expansion_factor, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
