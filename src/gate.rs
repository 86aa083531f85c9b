//! Phase Beta: power-gated relaxation of the substrate state S2.
//!
//! The target for S2 is built from the freshly updated S1:
//!
//! ```text
//! t_i = √s2_i · s1_i / (√s1_i + ε)        transport
//! ĝ_i = t_i^β / Σ_j t_j^β                  gate, β < 1 flattens
//! s2_i ← s2_i + γ (ĝ_i − s2_i)             relaxation
//! ```
//!
//! Away from the floor `s1/(√s1 + ε)` is just `√s1`, so `t ≈ √(s1·s2)`. The
//! unsimplified form is kept because the two disagree once `s1_i` sits at ε.
//!
//! S2 moves a fraction `γ` of the way toward `ĝ` and never jumps onto it, which
//! is what makes it the slow, low-pass state of the pair.

use alloc::vec::Vec;

use crate::simplex::{SimplexVector, EPSILON};

/// Transport `t_i = √s2_i · s1_i / (√s1_i + ε)` for a single component.
#[inline]
fn transport(s1: f64, s2: f64) -> f64 {
    libm::sqrt(s2) * (s1 / (libm::sqrt(s1) + EPSILON))
}

/// Compute the gated target `ĝ` that S2 relaxes toward.
///
/// # Panics
///
/// Panics if `s1` and `s2` differ in dimension. The engine rules this out at
/// construction.
pub fn gated_target(s1: &SimplexVector, s2: &SimplexVector, beta: f64) -> Vec<f64> {
    assert_eq!(s1.len(), s2.len(), "gated_target: S1 and S2 differ in dimension");
    let mut gated: Vec<f64> = s1
        .as_slice()
        .iter()
        .zip(s2.as_slice())
        .map(|(&a, &b)| libm::pow(transport(a, b), beta))
        .collect();
    let sum: f64 = gated.iter().sum();
    let inv = 1.0 / sum;
    for g in gated.iter_mut() {
        *g *= inv;
    }
    gated
}

/// Relax S2 one step toward the gated transport of `s1` (the updated S1).
///
/// With `gamma == 1.0` S2 lands exactly on the target; with `gamma == 0.0` it
/// is only renormalised.
///
/// # Panics
///
/// Panics if `s2` and `s1` differ in dimension; S2 is left untouched.
pub fn gate_transport_step(s2: &mut SimplexVector, s1: &SimplexVector, gamma: f64, beta: f64) {
    let target = gated_target(s1, s2, beta);
    for (s, g) in s2.components_mut().iter_mut().zip(target) {
        *s += gamma * (g - *s);
    }
    s2.renormalize();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simplex(w: &[f64]) -> SimplexVector {
        SimplexVector::from_weights(w.to_vec()).unwrap()
    }

    #[test]
    fn test_target_is_probability_vector() {
        let s1 = simplex(&[0.2, 0.3, 0.5]);
        let s2 = simplex(&[0.6, 0.3, 0.1]);
        let g = gated_target(&s1, &s2, 0.85);
        assert!((g.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(g.iter().all(|&x| x > 0.0));
    }

    #[test]
    fn test_known_target_and_step() {
        let s1 = simplex(&[0.27005, 0.30692, 0.42303]);
        let mut s2 = simplex(&[0.6, 0.3, 0.1]);
        let g = gated_target(&s1, &s2, 0.85);
        let want_g = [0.42525, 0.33445, 0.24031];
        for (a, b) in g.iter().zip(want_g.iter()) {
            assert!((a - b).abs() < 1e-3, "target {} vs {}", a, b);
        }

        gate_transport_step(&mut s2, &s1, 0.15, 0.85);
        let want = [0.57379, 0.30517, 0.12105];
        for (a, b) in s2.as_slice().iter().zip(want.iter()) {
            assert!((a - b).abs() < 1e-3, "s2 {} vs {}", a, b);
        }
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let s1 = simplex(&[0.2, 0.3, 0.5]);
        let original = simplex(&[0.6, 0.3, 0.1]);
        let mut s2 = original.clone();
        gate_transport_step(&mut s2, &s1, 0.0, 0.85);
        for (a, b) in s2.as_slice().iter().zip(original.as_slice()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unit_rate_lands_on_target() {
        let s1 = simplex(&[0.1, 0.6, 0.3]);
        let mut s2 = simplex(&[0.5, 0.25, 0.25]);
        let g = gated_target(&s1, &s2, 0.85);
        gate_transport_step(&mut s2, &s1, 1.0, 0.85);
        for (a, b) in s2.as_slice().iter().zip(g.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_each_component_moves_toward_target() {
        let s1 = simplex(&[0.2, 0.3, 0.5]);
        let before = simplex(&[0.6, 0.3, 0.1]);
        let g = gated_target(&s1, &before, 0.85);
        let mut s2 = before.clone();
        gate_transport_step(&mut s2, &s1, 0.15, 0.85);
        for i in 0..3 {
            let d_before = (before.as_slice()[i] - g[i]).abs();
            let d_after = (s2.as_slice()[i] - g[i]).abs();
            assert!(d_after < d_before, "component {} did not approach target", i);
        }
    }

    #[test]
    fn test_gate_flattens_relative_to_linear() {
        // β < 1 pulls the target toward uniform compared with β = 1.
        let s1 = simplex(&[0.05, 0.15, 0.8]);
        let s2 = simplex(&[0.05, 0.15, 0.8]);
        let linear = gated_target(&s1, &s2, 1.0);
        let gated = gated_target(&s1, &s2, 0.5);
        let max = |v: &[f64]| v.iter().copied().fold(0.0, f64::max);
        let min = |v: &[f64]| v.iter().copied().fold(1.0, f64::min);
        assert!(max(&gated) < max(&linear));
        assert!(min(&gated) > min(&linear));
    }

    #[test]
    fn test_floor_components_stay_valid() {
        let s1 = simplex(&[1.0, 0.0, 0.0]);
        let mut s2 = simplex(&[0.0, 1.0, 0.0]);
        for _ in 0..50 {
            gate_transport_step(&mut s2, &s1, 0.15, 0.85);
            assert!((s2.sum() - 1.0).abs() < 1e-9);
            assert!(s2.min() >= EPSILON);
        }
    }

    #[test]
    #[should_panic(expected = "differ in dimension")]
    fn test_target_rejects_dimension_mismatch() {
        let s1 = simplex(&[0.2, 0.3, 0.5]);
        let s2 = simplex(&[0.5, 0.5]);
        gated_target(&s1, &s2, 0.85);
    }

    #[test]
    #[should_panic(expected = "differ in dimension")]
    fn test_step_rejects_dimension_mismatch() {
        let s1 = simplex(&[0.2, 0.3, 0.5]);
        let mut s2 = simplex(&[0.6, 0.4]);
        gate_transport_step(&mut s2, &s1, 0.15, 0.85);
    }
}
