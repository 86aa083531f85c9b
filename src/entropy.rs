//! Phase Alpha: entropy ascent on the inference state S1.
//!
//! For `H = −Σ s ln s` the gradient restricted to the simplex is
//!
//! ```text
//! g_i = −ln(s_i + ε) − H
//! ```
//!
//! which is positive for components below `e^{−H}` and negative above it. One
//! step adds `γ·g`, floors at ε and renormalises, so repeated steps flatten S1
//! toward uniform without ever reaching it exactly.

use crate::simplex::{SimplexVector, EPSILON};

/// Advance S1 by one entropy-gradient step with rate `gamma`.
///
/// Returns the entropy of S1 *before* the update, which is the value the
/// engine records for this iteration. With `gamma == 0.0` the vector is only
/// renormalised.
pub fn entropy_gradient_step(s1: &mut SimplexVector, gamma: f64) -> f64 {
    let h = s1.entropy();
    for s in s1.components_mut() {
        let g = -libm::log(*s + EPSILON) - h;
        *s += gamma * g;
    }
    s1.renormalize();
    h
}
