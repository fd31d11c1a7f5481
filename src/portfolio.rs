//! Portfolio values: weights, realized points, frontier curves.

use nalgebra::{DMatrix, DVector};

use crate::market::AssetUniverse;

/// Portfolio weights aligned with an asset universe.
///
/// Full portfolios sum to 1; the two-asset capital-allocation
/// sub-allocation need not.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightVector {
    values: Vec<f64>,
}

impl WeightVector {
    /// Wrap raw weights in universe order.
    pub fn new(values: Vec<f64>) -> Self {
        WeightVector { values }
    }

    /// Number of weights.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no weights.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The weights in universe order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Pair each weight with its asset symbol.
    pub fn labeled<'a>(&self, universe: &'a AssetUniverse) -> Vec<(&'a str, f64)> {
        universe
            .symbols()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
            .collect()
    }

    pub(crate) fn as_dvector(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.values)
    }
}

/// A realized (expected return, volatility) pair, with the Sharpe ratio
/// when a risk-free rate is known.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioPoint {
    /// Annualized expected return.
    pub expected_return: f64,
    /// Annualized volatility.
    pub volatility: f64,
    /// Sharpe ratio, when computed against a risk-free rate.
    pub sharpe: Option<f64>,
}

impl PortfolioPoint {
    /// Point without a Sharpe ratio.
    pub fn new(expected_return: f64, volatility: f64) -> Self {
        PortfolioPoint {
            expected_return,
            volatility,
            sharpe: None,
        }
    }

    /// Point with the Sharpe ratio against `risk_free_rate`.
    ///
    /// A zero-volatility point gets no Sharpe ratio.
    pub fn with_sharpe(expected_return: f64, volatility: f64, risk_free_rate: f64) -> Self {
        let sharpe = if volatility > 0.0 {
            Some((expected_return - risk_free_rate) / volatility)
        } else {
            None
        };
        PortfolioPoint {
            expected_return,
            volatility,
            sharpe,
        }
    }
}

/// Ordered sequence of frontier points, by increasing sweep parameter.
///
/// May be shorter than the parameter grid when infeasible points were
/// skipped.
pub type FrontierCurve = Vec<PortfolioPoint>;

/// Evaluate a weight vector against the estimates.
///
/// `return = w . mu`, `volatility = sqrt(w' Sigma w)`.
pub fn evaluate(
    weights: &WeightVector,
    mu: &DVector<f64>,
    sigma: &DMatrix<f64>,
    risk_free_rate: Option<f64>,
) -> PortfolioPoint {
    let w = weights.as_dvector();
    let expected_return = mu.dot(&w);
    let variance = (sigma * &w).dot(&w).max(0.0);
    let volatility = variance.sqrt();

    match risk_free_rate {
        Some(rf) => PortfolioPoint::with_sharpe(expected_return, volatility, rf),
        None => PortfolioPoint::new(expected_return, volatility),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_sum() {
        let w = WeightVector::new(vec![0.25, 0.75]);
        assert!((w.sum() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_labeled() {
        let universe = AssetUniverse::new(["AAA", "BBB"]).unwrap();
        let w = WeightVector::new(vec![0.4, 0.6]);
        let labeled = w.labeled(&universe);
        assert_eq!(labeled, vec![("AAA", 0.4), ("BBB", 0.6)]);
    }

    #[test]
    fn test_evaluate() {
        let mu = DVector::from_vec(vec![0.10, 0.20]);
        let sigma = DMatrix::from_row_slice(2, 2, &[0.04, 0.0, 0.0, 0.09]);
        let w = WeightVector::new(vec![0.5, 0.5]);

        let point = evaluate(&w, &mu, &sigma, Some(0.02));
        assert!((point.expected_return - 0.15).abs() < 1e-12);
        assert!((point.volatility - 0.0325_f64.sqrt()).abs() < 1e-12);
        let sharpe = point.sharpe.unwrap();
        assert!((sharpe - 0.13 / 0.0325_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_zero_volatility_has_no_sharpe() {
        let point = PortfolioPoint::with_sharpe(0.05, 0.0, 0.02);
        assert!(point.sharpe.is_none());
    }
}
