//! Frontier sampling: repeated solves across a parameter sweep.
//!
//! A sweep drives one of the targeted solves over an ordered parameter
//! grid and collects the realized points. Individual infeasible points
//! are expected at the frontier extremes and are skipped rather than
//! aborting the sweep.

use tracing::warn;

use crate::error::{FrontierError, Result};
use crate::frontier::EfficientFrontier;
use crate::portfolio::FrontierCurve;

/// Default number of points in a frontier sweep.
pub const DEFAULT_FRONTIER_POINTS: usize = 20;

/// Offset above the minimum volatility where the risk sweep starts, so
/// the first point does not sit exactly on the infeasible boundary.
pub const RISK_GRID_EPSILON: f64 = 1e-6;

/// Which solve a sweep parameter drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SweepMode {
    /// Parameters are target volatilities (`efficient_risk`).
    Risk,
    /// Parameters are target returns (`efficient_return`).
    Return,
    /// Parameters are risk-aversion coefficients
    /// (`max_quadratic_utility`).
    Utility,
}

/// Sample the efficient frontier over `parameter_values`.
///
/// The output preserves parameter order and may be shorter than the
/// input: infeasible parameters are skipped silently, numerical
/// failures are logged with the offending value and skipped. Invalid
/// parameters (the only caller-fixable failure) abort the sweep.
pub fn sample_frontier(
    frontier: &EfficientFrontier,
    mode: SweepMode,
    parameter_values: &[f64],
) -> Result<FrontierCurve> {
    let mut curve = FrontierCurve::with_capacity(parameter_values.len());

    for &value in parameter_values {
        let solved = match mode {
            SweepMode::Risk => frontier.efficient_risk(value),
            SweepMode::Return => frontier.efficient_return(value),
            SweepMode::Utility => frontier.max_quadratic_utility(value),
        };

        match solved {
            Ok(weights) => curve.push(frontier.performance(&weights, None)),
            Err(FrontierError::Infeasible(_)) => continue,
            Err(FrontierError::Numerical(reason)) => {
                warn!(parameter = value, "skipping frontier point: {}", reason);
                continue;
            }
            Err(fatal) => return Err(fatal),
        }
    }

    Ok(curve)
}

/// Log-spaced target-volatility grid from just above `min_volatility`
/// to `max_volatility`.
///
/// The frontier's curvature concentrates near the minimum-volatility
/// point; natural-log spacing resolves it where a linear grid would
/// not.
pub fn risk_grid(min_volatility: f64, max_volatility: f64, points: usize) -> Vec<f64> {
    if points == 0 {
        return Vec::new();
    }

    let start = (min_volatility + RISK_GRID_EPSILON).max(RISK_GRID_EPSILON);
    if points == 1 || max_volatility <= start {
        return vec![start];
    }

    let log_start = start.ln();
    let log_end = max_volatility.ln();
    let step = (log_end - log_start) / (points - 1) as f64;

    (0..points)
        .map(|i| (log_start + step * i as f64).exp())
        .collect()
}
