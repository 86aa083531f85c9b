//! Poincaré disk layout for the latent point cloud.
//!
//! Each state component owns a fixed 2-D latent coordinate. A renderer scales
//! the cloud by an expansion factor that grows with the frame index and pushes
//! it through the exponential map at the origin of the curvature −1 disk:
//!
//! ```text
//! exp₀(v) = tanh(|v|) · v / (|v| + ε)
//! ```
//!
//! This is a layout transform only. Nothing here reads or writes S1 or S2.
//!
//! # Invariants
//!
//! - Every [`EmbeddedPoint`] has Euclidean norm strictly below 1, including
//!   inputs large enough for `tanh` to round to exactly 1.0 and scaled vectors
//!   that overflow to infinity.
//! - Direction is preserved: the output is a non-negative multiple of the
//!   scaled input.

use alloc::vec::Vec;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Denominator guard in the exponential map.
pub const EMBED_EPSILON: f64 = 1e-15;

/// Largest radius an embedded point may have. Stays strictly inside the disk
/// where `tanh` saturates in floating point.
pub const MAX_DISK_RADIUS: f64 = 1.0 - 1e-15;

/// A point of the fixed latent cloud in Euclidean 2-space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatentCoordinate {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl LatentCoordinate {
    /// Construct a latent coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        libm::hypot(self.x, self.y)
    }

    /// Draw `n` points with independent `N(0, 1) · scale` coordinates.
    pub fn sample_cloud<R: Rng>(n: usize, scale: f64, rng: &mut R) -> Vec<Self> {
        (0..n)
            .map(|_| {
                let x: f64 = StandardNormal.sample(rng);
                let y: f64 = StandardNormal.sample(rng);
                Self::new(x * scale, y * scale)
            })
            .collect()
    }
}

/// A latent coordinate mapped into the open unit disk.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmbeddedPoint {
    /// Horizontal coordinate in the disk.
    pub x: f64,
    /// Vertical coordinate in the disk.
    pub y: f64,
}

impl EmbeddedPoint {
    /// The disk origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Euclidean norm, always `< 1`.
    pub fn norm(&self) -> f64 {
        libm::hypot(self.x, self.y)
    }
}

/// Expansion factor for a rendered frame: `1 + frame / total_frames`.
///
/// Returns 1 when `total_frames == 0`.
pub fn expansion_factor(frame: usize, total_frames: usize) -> f64 {
    if total_frames == 0 {
        return 1.0;
    }
    1.0 + frame as f64 / total_frames as f64
}

/// Exponential map at the origin of `v × expansion`.
///
/// The radius is computed from `|v|·|expansion|` so that scaling never
/// overflows the intermediate vector; the direction comes from `v` itself.
pub fn embed(v: &LatentCoordinate, expansion: f64) -> EmbeddedPoint {
    let norm_v = v.norm();
    let r = norm_v * libm::fabs(expansion);
    if norm_v == 0.0 || expansion == 0.0 || r.is_nan() {
        return EmbeddedPoint::ORIGIN;
    }
    // tanh(r) · r / (r + ε) is the radius of tanh(r) · scaled / (r + ε)
    let shrink = if r.is_finite() { r / (r + EMBED_EPSILON) } else { 1.0 };
    let radius = (libm::tanh(r) * shrink).min(MAX_DISK_RADIUS);
    let sign = if expansion < 0.0 { -1.0 } else { 1.0 };
    let (ux, uy) = unit_direction(v);
    EmbeddedPoint {
        x: sign * radius * ux,
        y: sign * radius * uy,
    }
}

/// Unit vector along a non-zero `v`, safe when `|v|` overflows.
fn unit_direction(v: &LatentCoordinate) -> (f64, f64) {
    let (x, y) = if v.x.is_infinite() || v.y.is_infinite() {
        (infinite_sign(v.x), infinite_sign(v.y))
    } else {
        let m = libm::fmax(libm::fabs(v.x), libm::fabs(v.y));
        (v.x / m, v.y / m)
    };
    let n = libm::hypot(x, y);
    (x / n, y / n)
}

fn infinite_sign(c: f64) -> f64 {
    if !c.is_infinite() {
        0.0
    } else if c > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Embed a whole cloud with one expansion factor.
pub fn embed_all(coords: &[LatentCoordinate], expansion: f64) -> Vec<EmbeddedPoint> {
    coords.iter().map(|c| embed(c, expansion)).collect()
}
