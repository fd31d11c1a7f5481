//! Estimation inputs: asset universe, expected returns, covariance.
//!
//! `MarketInputs` validates and repairs the estimates handed in by the
//! data layer: the covariance is symmetrized within tolerance and tiny
//! negative eigenvalues from estimation noise are clamped to zero, so
//! downstream solves always see a positive-semidefinite matrix.

use nalgebra::{DMatrix, DVector};

use crate::error::{FrontierError, Result};

/// Maximum absolute asymmetry accepted before the covariance is rejected.
const SYMMETRY_TOL: f64 = 1e-6;

/// Most negative eigenvalue still attributed to estimation noise.
const NEG_EIGENVALUE_TOL: f64 = 1e-6;

/// Ordered, duplicate-free set of asset identifiers.
///
/// Immutable once constructed; all vectors and matrices in an
/// optimization run are indexed in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetUniverse {
    symbols: Vec<String>,
}

impl AssetUniverse {
    /// Create a universe from asset symbols.
    ///
    /// Fails on an empty list or duplicate symbols.
    pub fn new<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();

        if symbols.is_empty() {
            return Err(FrontierError::InvalidInput("empty asset universe".into()));
        }

        let mut seen = std::collections::HashSet::new();
        for s in &symbols {
            if !seen.insert(s.as_str()) {
                return Err(FrontierError::InvalidInput(format!(
                    "duplicate asset symbol: {}",
                    s
                )));
            }
        }

        Ok(AssetUniverse { symbols })
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the universe is empty (never true for a constructed universe).
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols in universe order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Index of a symbol, if present.
    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

/// Shared per-asset weight box `[lower, upper]`.
///
/// This is the single scalar leverage/shorting bound: `lower < 0`
/// permits shorting, `upper > 1` permits leverage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightBounds {
    /// Lower bound on each weight.
    pub lower: f64,
    /// Upper bound on each weight.
    pub upper: f64,
}

impl WeightBounds {
    /// Create a weight box, validating `lower <= upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(FrontierError::InvalidInput(format!(
                "weight bounds must be finite, got ({}, {})",
                lower, upper
            )));
        }
        if lower > upper {
            return Err(FrontierError::InvalidInput(format!(
                "lower weight bound {} exceeds upper bound {}",
                lower, upper
            )));
        }
        Ok(WeightBounds { lower, upper })
    }

    /// No shorting, no leverage: each weight in `[0, 1]`.
    pub fn long_only() -> Self {
        WeightBounds {
            lower: 0.0,
            upper: 1.0,
        }
    }
}

impl Default for WeightBounds {
    fn default() -> Self {
        WeightBounds::long_only()
    }
}

/// Validated estimation inputs for one optimization run.
///
/// Holds the universe, annualized expected returns, and the repaired
/// positive-semidefinite covariance plus its square-root factor.
#[derive(Debug, Clone)]
pub struct MarketInputs {
    universe: AssetUniverse,
    mu: DVector<f64>,
    sigma: DMatrix<f64>,
    /// Factor C with C' C = sigma, used for volatility cone constraints.
    factor: DMatrix<f64>,
}

impl MarketInputs {
    /// Validate and repair estimation inputs.
    ///
    /// The covariance must be square with matching dimension, symmetric
    /// within tolerance, with nonnegative variances on the diagonal.
    /// Asymmetry within tolerance is averaged away and eigenvalues in
    /// `[-1e-6, 0)` are clamped to zero.
    pub fn new(
        universe: AssetUniverse,
        expected_returns: Vec<f64>,
        covariance: DMatrix<f64>,
    ) -> Result<Self> {
        let n = universe.len();

        if expected_returns.len() != n {
            return Err(FrontierError::InvalidInput(format!(
                "expected {} returns for {} assets, got {}",
                n,
                n,
                expected_returns.len()
            )));
        }
        if covariance.nrows() != n || covariance.ncols() != n {
            return Err(FrontierError::InvalidInput(format!(
                "covariance must be {}x{}, got {}x{}",
                n,
                n,
                covariance.nrows(),
                covariance.ncols()
            )));
        }
        if expected_returns.iter().any(|r| !r.is_finite()) {
            return Err(FrontierError::InvalidInput(
                "expected returns contain non-finite entries".into(),
            ));
        }
        if covariance.iter().any(|v| !v.is_finite()) {
            return Err(FrontierError::InvalidInput(
                "covariance contains non-finite entries".into(),
            ));
        }

        let asymmetry = (&covariance - covariance.transpose()).abs().max();
        if asymmetry > SYMMETRY_TOL {
            return Err(FrontierError::InvalidInput(format!(
                "covariance is not symmetric (max asymmetry {:.3e})",
                asymmetry
            )));
        }
        for i in 0..n {
            if covariance[(i, i)] < -NEG_EIGENVALUE_TOL {
                return Err(FrontierError::InvalidInput(format!(
                    "negative variance {:.3e} for asset {}",
                    covariance[(i, i)],
                    universe.symbols()[i]
                )));
            }
        }

        let symmetrized = (&covariance + covariance.transpose()) * 0.5;
        let (sigma, factor) = repair_and_factor(symmetrized)?;

        Ok(MarketInputs {
            universe,
            mu: DVector::from_vec(expected_returns),
            sigma,
            factor,
        })
    }

    /// The asset universe.
    pub fn universe(&self) -> &AssetUniverse {
        &self.universe
    }

    /// Number of assets.
    pub fn num_assets(&self) -> usize {
        self.universe.len()
    }

    /// Annualized expected returns, in universe order.
    pub fn expected_returns(&self) -> &DVector<f64> {
        &self.mu
    }

    /// Repaired annualized covariance matrix.
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.sigma
    }

    /// Factor C with `C' C == covariance`.
    pub(crate) fn covariance_factor(&self) -> &DMatrix<f64> {
        &self.factor
    }

    /// Per-asset volatilities (square roots of the diagonal).
    pub fn asset_volatilities(&self) -> Vec<f64> {
        (0..self.num_assets())
            .map(|i| self.sigma[(i, i)].max(0.0).sqrt())
            .collect()
    }

    /// Volatility of the riskiest single asset.
    ///
    /// Callers use this as the upper end of the frontier risk sweep.
    pub fn max_asset_volatility(&self) -> f64 {
        self.asset_volatilities()
            .into_iter()
            .fold(0.0, f64::max)
    }
}

/// Clamp estimation-noise eigenvalues and build the square-root factor.
fn repair_and_factor(sigma: DMatrix<f64>) -> Result<(DMatrix<f64>, DMatrix<f64>)> {
    let eigen = sigma.symmetric_eigen();
    let min_eigenvalue = eigen.eigenvalues.min();

    if min_eigenvalue < -NEG_EIGENVALUE_TOL {
        return Err(FrontierError::InvalidInput(format!(
            "covariance is not positive semidefinite (eigenvalue {:.3e})",
            min_eigenvalue
        )));
    }

    let clamped = eigen.eigenvalues.map(|l| l.max(0.0));
    let v = eigen.eigenvectors;
    let repaired = &v * DMatrix::from_diagonal(&clamped) * v.transpose();
    let factor = DMatrix::from_diagonal(&clamped.map(f64::sqrt)) * v.transpose();

    Ok((repaired, factor))
}
