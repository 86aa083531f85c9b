//! Probability vectors on the open simplex.
//!
//! A [`SimplexVector`] is the only state representation in the crate. Both S1
//! and S2 are simplex vectors, and every transform that touches one ends with
//! [`SimplexVector::renormalize`].
//!
//! # Invariants
//!
//! - Every component is at least [`EPSILON`], so logarithms and square roots
//!   never see zero or a negative value.
//! - Components sum to 1 within floating-point tolerance after every transform.
//! - The dimension is fixed at construction and never changes.

use alloc::vec;
use alloc::vec::Vec;

use rand::Rng;
use rand_distr::{Distribution, Exp1};

use crate::error::ConfigError;

/// Positivity floor applied to every component after a transform.
pub const EPSILON: f64 = 1e-12;

/// Allowed deviation of the component sum from 1.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// An ordered vector of `N ≥ 1` positive reals summing to 1.
///
/// Mutation is only possible inside the crate; every mutating path finishes
/// with the clip-then-renormalise step so the invariant is observable at all
/// times from outside.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<f64>", into = "Vec<f64>"))]
pub struct SimplexVector {
    components: Vec<f64>,
}

impl SimplexVector {
    /// The uniform distribution `[1/n; n]`.
    pub fn uniform(n: usize) -> Result<Self, ConfigError> {
        if n == 0 {
            return Err(ConfigError::EmptyDimension(n));
        }
        Ok(Self { components: vec![1.0 / n as f64; n] })
    }

    /// Build a simplex vector from non-negative weights.
    ///
    /// The weights are floored at [`EPSILON`] and divided by their sum, so
    /// `[2.0, 1.0, 1.0]` becomes `[0.5, 0.25, 0.25]`. Input that already lies
    /// on the simplex (floor respected, sum within [`SUM_TOLERANCE`] of 1) is
    /// kept bit for bit.
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, ConfigError> {
        if weights.is_empty() {
            return Err(ConfigError::EmptyDimension(0));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(ConfigError::InvalidWeights("non-finite component"));
        }
        if weights.iter().any(|&w| w < 0.0) {
            return Err(ConfigError::InvalidWeights("negative component"));
        }
        let total: f64 = weights.iter().sum();
        if !total.is_finite() {
            return Err(ConfigError::InvalidWeights("weights sum is not finite"));
        }
        if total <= 0.0 {
            return Err(ConfigError::InvalidWeights("weights sum to zero"));
        }
        let mut v = Self { components: weights };
        if !v.is_normalized() {
            v.renormalize();
        }
        Ok(v)
    }

    /// `true` when every component respects the floor and the sum is within
    /// [`SUM_TOLERANCE`] of 1.
    pub fn is_normalized(&self) -> bool {
        let sum = self.sum();
        self.components.iter().all(|&x| x >= EPSILON)
            && sum > 1.0 - SUM_TOLERANCE
            && sum < 1.0 + SUM_TOLERANCE
    }

    /// Draw a point uniformly from the `n`-simplex (Dirichlet with every
    /// concentration equal to 1).
    ///
    /// Uses the normalised-exponential construction: `n` independent `Exp(1)`
    /// draws divided by their sum. This also covers `n == 1`, which a general
    /// Dirichlet sampler rejects.
    pub fn sample_dirichlet<R: Rng>(n: usize, rng: &mut R) -> Result<Self, ConfigError> {
        if n == 0 {
            return Err(ConfigError::EmptyDimension(n));
        }
        let components: Vec<f64> = (0..n)
            .map(|_| {
                let x: f64 = Exp1.sample(rng);
                x
            })
            .collect();
        let mut v = Self { components };
        v.renormalize();
        Ok(v)
    }

    /// Clip every component to at least [`EPSILON`], then divide by the sum.
    ///
    /// NaN components are treated as zero and land on the floor. Division can
    /// push a floored component a hair under [`EPSILON`], so the floor is
    /// applied once more afterwards; that moves the sum by at most `n·ε`.
    pub fn renormalize(&mut self) {
        for x in self.components.iter_mut() {
            *x = x.max(EPSILON);
        }
        let sum: f64 = self.components.iter().sum();
        let inv = 1.0 / sum;
        for x in self.components.iter_mut() {
            *x = (*x * inv).max(EPSILON);
        }
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always `false`; a simplex vector has at least one component.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Read-only view of the components.
    pub fn as_slice(&self) -> &[f64] {
        &self.components
    }

    /// Mutable access for the step functions. Callers must finish with
    /// [`renormalize`](Self::renormalize).
    pub(crate) fn components_mut(&mut self) -> &mut [f64] {
        &mut self.components
    }

    /// Shannon entropy in nats, `−Σ s ln s`. Lies in `[0, ln n]`.
    pub fn entropy(&self) -> f64 {
        -self
            .components
            .iter()
            .filter(|&&s| s > 0.0)
            .map(|&s| s * libm::log(s))
            .sum::<f64>()
    }

    /// Sum of the components. 1 up to rounding.
    pub fn sum(&self) -> f64 {
        self.components.iter().sum()
    }

    /// Arithmetic mean of the components (always `1/n` up to rounding).
    pub fn mean(&self) -> f64 {
        self.sum() / self.components.len() as f64
    }

    /// Smallest component.
    pub fn min(&self) -> f64 {
        self.components.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest component.
    pub fn max(&self) -> f64 {
        self.components.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Index of the largest component (first one on ties).
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, &x) in self.components.iter().enumerate() {
            if x > self.components[best] {
                best = i;
            }
        }
        best
    }
}

impl TryFrom<Vec<f64>> for SimplexVector {
    type Error = ConfigError;

    fn try_from(weights: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_weights(weights)
    }
}

impl From<SimplexVector> for Vec<f64> {
    fn from(v: SimplexVector) -> Self {
        v.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn assert_on_simplex(v: &SimplexVector) {
        assert!((v.sum() - 1.0).abs() < 1e-9, "sum = {}", v.sum());
        for &x in v.as_slice() {
            assert!(x >= EPSILON, "component {} below floor", x);
        }
    }

    #[test]
    fn test_uniform() {
        let v = SimplexVector::uniform(4).unwrap();
        assert_eq!(v.as_slice(), &[0.25; 4]);
        assert_on_simplex(&v);
    }

    #[test]
    fn test_uniform_rejects_zero_dimension() {
        assert_eq!(SimplexVector::uniform(0), Err(ConfigError::EmptyDimension(0)));
    }

    #[test]
    fn test_from_weights_normalises() {
        let v = SimplexVector::from_weights(vec![2.0, 1.0, 1.0]).unwrap();
        assert!((v.as_slice()[0] - 0.5).abs() < 1e-12);
        assert!((v.as_slice()[1] - 0.25).abs() < 1e-12);
        assert_on_simplex(&v);
    }

    #[test]
    fn test_from_weights_floors_zero_component() {
        let v = SimplexVector::from_weights(vec![1.0, 0.0]).unwrap();
        assert!(v.as_slice()[1] >= EPSILON);
        assert_on_simplex(&v);
    }

    #[test]
    fn test_from_weights_keeps_normalised_input_exactly() {
        let w = vec![0.2, 0.3, 0.5];
        let v = SimplexVector::from_weights(w.clone()).unwrap();
        assert_eq!(v.as_slice(), w.as_slice());
        assert!(v.is_normalized());
    }

    #[test]
    fn test_from_weights_rejects_bad_input() {
        assert!(SimplexVector::from_weights(vec![]).is_err());
        assert!(SimplexVector::from_weights(vec![1.0, -0.1]).is_err());
        assert!(SimplexVector::from_weights(vec![1.0, f64::NAN]).is_err());
        assert!(SimplexVector::from_weights(vec![0.0, 0.0]).is_err());
    }

    #[test]
    fn test_renormalize_repairs_negative_and_nan() {
        let mut v = SimplexVector::uniform(3).unwrap();
        v.components_mut()[0] = -0.4;
        v.components_mut()[1] = f64::NAN;
        v.renormalize();
        assert_on_simplex(&v);
        assert!(v.as_slice()[2] > 0.999);
    }

    #[test]
    fn test_entropy_bounds() {
        let u = SimplexVector::uniform(12).unwrap();
        assert!((u.entropy() - libm::log(12.0)).abs() < 1e-12);
        assert!((u.entropy() - 2.4849).abs() < 1e-4);

        let peaked = SimplexVector::from_weights(vec![1.0, 0.0, 0.0]).unwrap();
        assert!(peaked.entropy() >= 0.0);
        assert!(peaked.entropy() < 1e-9);
    }

    #[test]
    fn test_entropy_known_value() {
        let v = SimplexVector::from_weights(vec![0.2, 0.3, 0.5]).unwrap();
        assert!((v.entropy() - 1.0297).abs() < 1e-4, "H = {}", v.entropy());
    }

    #[test]
    fn test_moments() {
        let v = SimplexVector::from_weights(vec![0.6, 0.3, 0.1]).unwrap();
        assert!((v.mean() - 1.0 / 3.0).abs() < 1e-12);
        assert!((v.min() - 0.1).abs() < 1e-12);
        assert!((v.max() - 0.6).abs() < 1e-12);
        assert_eq!(v.argmax(), 0);
    }

    #[test]
    fn test_dirichlet_draw_is_on_simplex() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for n in [1usize, 2, 12, 64] {
            let v = SimplexVector::sample_dirichlet(n, &mut rng).unwrap();
            assert_eq!(v.len(), n);
            assert_on_simplex(&v);
        }
    }

    #[test]
    fn test_dirichlet_single_component_is_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let v = SimplexVector::sample_dirichlet(1, &mut rng).unwrap();
        assert_eq!(v.len(), 1);
        assert!((v.as_slice()[0] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_dirichlet_is_reproducible() {
        let a = SimplexVector::sample_dirichlet(12, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let b = SimplexVector::sample_dirichlet(12, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_weights_with_overflowing_sum_rejected() {
        assert_eq!(
            SimplexVector::from_weights(vec![f64::MAX, f64::MAX]),
            Err(ConfigError::InvalidWeights("weights sum is not finite"))
        );
        // large but summable weights still normalise
        let v = SimplexVector::from_weights(vec![f64::MAX / 4.0, f64::MAX / 4.0]).unwrap();
        assert!((v.sum() - 1.0).abs() < 1e-9);
        assert!((v.as_slice()[0] - 0.5).abs() < 1e-12);
    }
}
