//! Derived portfolios and the full per-universe report.
//!
//! Thin, pure wrappers over `EfficientFrontier` for the portfolios the
//! presentation layer plots, plus `analyze`, which runs the whole
//! pipeline for one universe: asset scatter, frontier sweep, tangency
//! and minimum-volatility portfolios, and the capital-allocation
//! optimum with its realized utility.

use crate::cal::{CalAllocation, CapitalAllocationLine};
use crate::error::Result;
use crate::frontier::EfficientFrontier;
use crate::market::{MarketInputs, WeightBounds};
use crate::portfolio::{FrontierCurve, PortfolioPoint, WeightVector};
use crate::sampler::{risk_grid, sample_frontier, SweepMode};

/// The tangency (maximum Sharpe ratio) portfolio and its realized
/// point, Sharpe included.
pub fn tangency_portfolio(
    frontier: &EfficientFrontier,
    risk_free_rate: f64,
) -> Result<(WeightVector, PortfolioPoint)> {
    let weights = frontier.max_sharpe(risk_free_rate)?;
    let point = frontier.performance(&weights, Some(risk_free_rate));
    Ok((weights, point))
}

/// The minimum-volatility portfolio and its realized point.
pub fn min_volatility_portfolio(
    frontier: &EfficientFrontier,
) -> Result<(WeightVector, PortfolioPoint)> {
    let weights = frontier.min_volatility()?;
    let point = frontier.performance(&weights, None);
    Ok((weights, point))
}

/// Quadratic utility `return - 0.5 * risk_aversion * volatility^2`.
pub fn quadratic_utility(expected_return: f64, volatility: f64, risk_aversion: f64) -> f64 {
    expected_return - 0.5 * risk_aversion * volatility * volatility
}

/// Per-asset (return, volatility) scatter points, in universe order.
pub fn asset_points(inputs: &MarketInputs) -> Vec<PortfolioPoint> {
    inputs
        .expected_returns()
        .iter()
        .zip(inputs.asset_volatilities())
        .map(|(&ret, vol)| PortfolioPoint::new(ret, vol))
        .collect()
}

/// Everything one optimization run hands to the presentation layer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrontierReport {
    /// Risk-free rate used for the tangency portfolio and the line.
    pub risk_free_rate: f64,
    /// Per-asset scatter points, in universe order.
    pub assets: Vec<PortfolioPoint>,
    /// Sampled efficient frontier.
    pub frontier: FrontierCurve,
    /// Minimum-volatility portfolio's realized point.
    pub min_volatility: PortfolioPoint,
    /// Tangency portfolio weights.
    pub tangency_weights: WeightVector,
    /// Tangency portfolio's realized point, Sharpe included.
    pub tangency: PortfolioPoint,
    /// Utility-optimal risk-free/tangency mix.
    pub optimum: CalAllocation,
    /// Quadratic utility realized by the optimum.
    pub utility: f64,
}

/// Run the full pipeline for one universe.
///
/// `bounds` is the per-asset weight box for the risky solves;
/// `leverage` is the box on the risk-free/tangency mix. The frontier is
/// sampled at `points` log-spaced target volatilities between the
/// minimum-volatility portfolio and the riskiest single asset.
pub fn analyze(
    inputs: MarketInputs,
    bounds: WeightBounds,
    risk_free_rate: f64,
    risk_aversion: f64,
    leverage: WeightBounds,
    points: usize,
) -> Result<FrontierReport> {
    let assets = asset_points(&inputs);
    let max_volatility = inputs.max_asset_volatility();
    let frontier = EfficientFrontier::new(inputs, bounds)?;

    let (_, min_volatility) = min_volatility_portfolio(&frontier)?;
    let (tangency_weights, tangency) = tangency_portfolio(&frontier, risk_free_rate)?;

    let grid = risk_grid(min_volatility.volatility, max_volatility, points);
    let curve = sample_frontier(&frontier, SweepMode::Risk, &grid)?;

    let line = CapitalAllocationLine::new(risk_free_rate, tangency)?;
    let optimum = line.optimal_allocation(risk_aversion, leverage)?;
    let utility = quadratic_utility(
        optimum.point.expected_return,
        optimum.point.volatility,
        risk_aversion,
    );

    Ok(FrontierReport {
        risk_free_rate,
        assets,
        frontier: curve,
        min_volatility,
        tangency_weights,
        tangency,
        optimum,
        utility,
    })
}

/// Utility forgone by narrowing the baseline universe to a thematic
/// subset: baseline utility minus thematic utility.
pub fn utility_loss(baseline: &FrontierReport, thematic: &FrontierReport) -> f64 {
    baseline.utility - thematic.utility
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_utility() {
        let utility = quadratic_utility(0.15, 0.20, 2.0);
        assert!((utility - 0.11).abs() < 1e-15);
    }

    #[test]
    fn test_utility_decreases_with_aversion() {
        let low = quadratic_utility(0.15, 0.20, 1.0);
        let high = quadratic_utility(0.15, 0.20, 5.0);
        assert!(high < low);
    }
}
