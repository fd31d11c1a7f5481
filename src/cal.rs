//! Capital allocation line: mixing the risk-free asset with the
//! tangency portfolio.
//!
//! The tangency portfolio is treated as a single synthetic asset with
//! its already-realized risk and zero covariance against the risk-free
//! asset. The optimal mix for a risk-aversion coefficient is found by
//! running `max_quadratic_utility` on that synthetic two-asset problem
//! through the same solver as every other utility maximization, rather
//! than through a bespoke closed form.

use nalgebra::DMatrix;

use crate::error::{FrontierError, Result};
use crate::frontier::EfficientFrontier;
use crate::market::{AssetUniverse, MarketInputs, WeightBounds};
use crate::portfolio::PortfolioPoint;

/// The optimal point on a capital allocation line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalAllocation {
    /// Weight on the tangency portfolio; the remainder sits in the
    /// risk-free asset. Above 1 means borrowing at the risk-free rate.
    pub risky_weight: f64,
    /// Realized (return, volatility) of the combined portfolio.
    pub point: PortfolioPoint,
}

/// The efficient set formed by the risk-free asset and the tangency
/// portfolio.
#[derive(Debug, Clone)]
pub struct CapitalAllocationLine {
    risk_free_rate: f64,
    tangency: PortfolioPoint,
}

impl CapitalAllocationLine {
    /// Build a line from the risk-free rate and the tangency point.
    ///
    /// The tangency point must carry a Sharpe ratio and positive
    /// volatility.
    pub fn new(risk_free_rate: f64, tangency: PortfolioPoint) -> Result<Self> {
        if !risk_free_rate.is_finite() {
            return Err(FrontierError::InvalidInput(format!(
                "risk-free rate must be finite, got {}",
                risk_free_rate
            )));
        }
        if tangency.sharpe.is_none() {
            return Err(FrontierError::InvalidInput(
                "tangency point carries no Sharpe ratio".into(),
            ));
        }
        if !(tangency.volatility > 0.0) {
            return Err(FrontierError::InvalidInput(format!(
                "tangency volatility must be positive, got {}",
                tangency.volatility
            )));
        }
        Ok(CapitalAllocationLine {
            risk_free_rate,
            tangency,
        })
    }

    /// The risk-free rate the line starts from.
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// The tangency point the line passes through.
    pub fn tangency(&self) -> &PortfolioPoint {
        &self.tangency
    }

    /// The point on the line at a given tangency weight.
    ///
    /// `return = rf + x * (tangency_return - rf)`,
    /// `volatility = x * tangency_volatility`.
    pub fn point_at(&self, risky_weight: f64) -> PortfolioPoint {
        PortfolioPoint::new(
            self.risk_free_rate + risky_weight * (self.tangency.expected_return - self.risk_free_rate),
            risky_weight * self.tangency.volatility,
        )
    }

    /// The utility-optimal mix for a risk-aversion coefficient under a
    /// leverage box on the weights.
    ///
    /// Solves `max_quadratic_utility` over the synthetic pair
    /// (risk-free asset, tangency-as-asset) and reads off the tangency
    /// weight. Unconstrained, the optimum is the Merton ratio
    /// `sharpe / (risk_aversion * volatility)`; the box clips it.
    pub fn optimal_allocation(
        &self,
        risk_aversion: f64,
        leverage: WeightBounds,
    ) -> Result<CalAllocation> {
        let universe = AssetUniverse::new(["CASH", "TANGENCY"])?;
        let variance = self.tangency.volatility * self.tangency.volatility;
        let covariance = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 0.0, variance]);
        let inputs = MarketInputs::new(
            universe,
            vec![self.risk_free_rate, self.tangency.expected_return],
            covariance,
        )?;

        let solver = EfficientFrontier::new(inputs, leverage)?;
        let weights = solver.max_quadratic_utility(risk_aversion)?;
        let risky_weight = weights.values()[1];

        Ok(CalAllocation {
            risky_weight,
            point: self.point_at(risky_weight),
        })
    }
}
