//! # gate-dynamics
//!
//! Two coupled probability vectors relaxing against each other on the simplex.
//!
//! ---
//!
//! ## Two states, two speeds
//!
//! **S1, the inference state**, climbs the entropy gradient every step. Mass is
//! pulled off the modal component and pushed onto the starved ones, so S1 drifts
//! toward the uniform distribution without ever landing on it.
//!
//! **S2, the substrate state**, moves slowly. Each step it relaxes a fraction `γ`
//! of the way toward a *gated transport* of the fresh S1: the componentwise
//! geometric coupling `√s2 · √s1`, raised to a power `β < 1` that flattens large
//! components and lifts small ones, then renormalised.
//!
//! **The opportunity window** watches S2. When any component of S2 collapses below
//! the threshold `τ`, a random perturbation is subtracted and the vector is
//! re-projected onto the simplex.
//! > "If the substrate gets stuck on a vertex, shake it loose."
//!
//! A separate, pure routine maps a fixed cloud of latent points into the
//! Poincaré disk so a renderer can draw the run frame by frame.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! RelaxationEngine::step
//!
//!   S2 ──► OpportunityResetMonitor ──────────────┐
//!                                                ↓
//!   S1 ──► entropy_gradient_step ──► S1' ──► gate_transport_step ──► S2'
//!                                                        ↓
//!                                                MeasurementRecord ──► trajectory
//!
//! latent cloud ──► embed(·, expansion_factor(frame)) ──► Poincaré disk
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`simplex`] | [`SimplexVector`] | ε-floored probability vector, entropy and moments |
//! | [`entropy`] | [`entropy_gradient_step`] | Phase Alpha: entropy ascent on S1 |
//! | [`gate`] | [`gate_transport_step`] | Phase Beta: power-gated relaxation of S2 |
//! | [`window`] | [`OpportunityResetMonitor`] | Stochastic reset when S2 concentrates |
//! | [`hyperbolic`] | [`LatentCoordinate`], [`EmbeddedPoint`] | Exponential map at the origin of the disk |
//! | [`engine`] | [`RelaxationEngine`], [`EngineConfig`], [`MeasurementRecord`] | Orchestration and the trajectory log |
//! | [`summary`] | [`RunSummary`] | Whole-run statistics derived from the log |
//! | [`error`] | [`ConfigError`] | Construction-time failures |
//! | [`snapshot`] | [`snapshot::TrajectorySnapshot`] | Serialisable run capture (requires `serde` feature) |
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` by default and needs only `alloc`. Transcendental
//! functions come from `libm`. Enable the `std` feature to forward `std` to the
//! dependencies, `serde` for serialisation, and `python-ffi` for the PyO3 module.
//!
//! ## License
//!
//! Business Source License 1.1.

#![cfg_attr(not(any(feature = "std", feature = "python-ffi")), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

#[cfg(any(feature = "std", feature = "python-ffi"))]
extern crate std;

pub mod error;
pub mod simplex;
pub mod entropy;
pub mod gate;
pub mod window;
pub mod hyperbolic;
pub mod engine;
pub mod summary;
#[cfg(feature = "serde")]
pub mod snapshot;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use engine::{EngineConfig, MeasurementRecord, RelaxationEngine};
pub use entropy::entropy_gradient_step;
pub use error::ConfigError;
pub use gate::{gate_transport_step, gated_target};
pub use hyperbolic::{embed, embed_all, expansion_factor, EmbeddedPoint, LatentCoordinate};
pub use simplex::{SimplexVector, EPSILON, SUM_TOLERANCE};
pub use summary::RunSummary;
pub use window::OpportunityResetMonitor;
