//! Whole-run statistics derived from a trajectory.
//!
//! These are the numbers a report would print; producing the report itself is
//! left to the caller.

use crate::engine::MeasurementRecord;

/// Aggregate view of a trajectory.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Number of records summarised.
    pub iterations: usize,
    /// S1 entropy recorded at the first iteration (0 when empty).
    pub initial_entropy: f64,
    /// S1 entropy recorded at the last iteration (0 when empty).
    pub final_entropy: f64,
    /// `final_entropy / initial_entropy`. `None` for an empty trajectory or a
    /// zero initial entropy.
    pub consolidation_ratio: Option<f64>,
    /// Mean over iterations of the per-step S2 mean.
    pub substrate_stability: f64,
    /// Largest S1 component seen in any iteration.
    pub peak_activation: f64,
    /// Opportunity windows opened during the run.
    pub windows_triggered: u64,
}

impl RunSummary {
    /// Summarise `trajectory`, carrying the engine's window count through.
    pub fn from_trajectory(trajectory: &[MeasurementRecord], windows_triggered: u64) -> Self {
        let (first, last) = match (trajectory.first(), trajectory.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => {
                return Self {
                    iterations: 0,
                    initial_entropy: 0.0,
                    final_entropy: 0.0,
                    consolidation_ratio: None,
                    substrate_stability: 0.0,
                    peak_activation: 0.0,
                    windows_triggered,
                }
            }
        };
        let n = trajectory.len();
        let consolidation_ratio = if first.s1_entropy > 0.0 {
            Some(last.s1_entropy / first.s1_entropy)
        } else {
            None
        };
        Self {
            iterations: n,
            initial_entropy: first.s1_entropy,
            final_entropy: last.s1_entropy,
            consolidation_ratio,
            substrate_stability: trajectory.iter().map(|r| r.s2_mean).sum::<f64>() / n as f64,
            peak_activation: trajectory.iter().map(|r| r.max_activation).fold(0.0, f64::max),
            windows_triggered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(iteration: usize, s1_entropy: f64, max_activation: f64) -> MeasurementRecord {
        MeasurementRecord {
            iteration,
            s1_entropy,
            s2_mean: 0.25,
            s2_min: 0.1,
            max_activation,
            window_opened: false,
        }
    }

    #[test]
    fn test_empty_trajectory() {
        let s = RunSummary::from_trajectory(&[], 4);
        assert_eq!(s.iterations, 0);
        assert_eq!(s.consolidation_ratio, None);
        assert_eq!(s.windows_triggered, 4);
    }

    #[test]
    fn test_ratio_and_peak() {
        let t = [record(0, 2.0, 0.3), record(1, 2.2, 0.5), record(2, 2.4, 0.2)];
        let s = RunSummary::from_trajectory(&t, 1);
        assert_eq!(s.iterations, 3);
        assert!((s.consolidation_ratio.unwrap() - 1.2).abs() < 1e-12);
        assert_eq!(s.peak_activation, 0.5);
        assert!((s.substrate_stability - 0.25).abs() < 1e-12);
        assert_eq!(s.initial_entropy, 2.0);
        assert_eq!(s.final_entropy, 2.4);
    }

    #[test]
    fn test_zero_initial_entropy_has_no_ratio() {
        let t = [record(0, 0.0, 1.0), record(1, 0.5, 0.9)];
        assert_eq!(RunSummary::from_trajectory(&t, 0).consolidation_ratio, None);
    }
}
