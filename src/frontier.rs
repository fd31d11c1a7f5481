//! Constrained mean-variance optimization over one asset universe.
//!
//! `EfficientFrontier` owns validated estimates and a weight box and
//! exposes the five solves the engine is built from:
//!
//! - `min_volatility`         minimize `w' Sigma w`
//! - `max_sharpe`             maximize `(w.mu - rf) / sqrt(w' Sigma w)`
//! - `max_quadratic_utility`  maximize `w.mu - 0.5 A w' Sigma w`
//! - `efficient_risk`         maximize `w.mu` at bounded volatility
//! - `efficient_return`       minimize `w' Sigma w` at a floor return
//!
//! all subject to the budget constraint `sum(w) == 1` and the shared
//! weight box. Every operation is a pure function of the inputs; no
//! state is shared between calls.

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::{FrontierError, Result};
use crate::market::{MarketInputs, WeightBounds};
use crate::portfolio::{evaluate, PortfolioPoint, WeightVector};
use crate::solver::{solve, QpBuilder, QpProblem, Settings, SolveStatus};

/// Scaling variables below this magnitude mean the Sharpe
/// transformation collapsed and no portfolio can be recovered.
const MIN_SCALING: f64 = 1e-12;

/// Mean-variance solver for one universe, bounds pair, and settings.
#[derive(Debug, Clone)]
pub struct EfficientFrontier {
    inputs: MarketInputs,
    bounds: WeightBounds,
    settings: Settings,
}

impl EfficientFrontier {
    /// Create a solver over validated inputs and a weight box.
    ///
    /// Fails when the box cannot satisfy the budget constraint at all
    /// (`n * upper < 1` or `n * lower > 1`), which would make every
    /// operation infeasible.
    pub fn new(inputs: MarketInputs, bounds: WeightBounds) -> Result<Self> {
        let n = inputs.num_assets() as f64;
        if n * bounds.upper < 1.0 || n * bounds.lower > 1.0 {
            return Err(FrontierError::InvalidInput(format!(
                "weight box ({}, {}) cannot hold a fully invested portfolio of {} assets",
                bounds.lower,
                bounds.upper,
                inputs.num_assets()
            )));
        }
        Ok(EfficientFrontier {
            inputs,
            bounds,
            settings: Settings::default(),
        })
    }

    /// Replace the solver settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// The estimation inputs.
    pub fn inputs(&self) -> &MarketInputs {
        &self.inputs
    }

    /// The shared weight box.
    pub fn bounds(&self) -> &WeightBounds {
        &self.bounds
    }

    /// Weights minimizing portfolio variance.
    pub fn min_volatility(&self) -> Result<WeightVector> {
        let mut builder = self.budget_qp();
        builder.quadratic_cost(self.inputs.covariance() * 2.0);
        let x = self.run(builder.build(), "min_volatility")?;
        Ok(WeightVector::new(x))
    }

    /// Weights minimizing variance subject to `w.mu >= target_return`.
    pub fn efficient_return(&self, target_return: f64) -> Result<WeightVector> {
        if !target_return.is_finite() {
            return Err(FrontierError::InvalidInput(format!(
                "target return must be finite, got {}",
                target_return
            )));
        }

        let mu = self.inputs.expected_returns();
        let floor: Vec<(usize, f64)> = (0..mu.len()).map(|i| (i, -mu[i])).collect();

        let mut builder = self.budget_qp();
        builder.quadratic_cost(self.inputs.covariance() * 2.0);
        builder.less_equal(&floor, -target_return);
        let x = self.run(
            builder.build(),
            &format!("efficient_return(target={})", target_return),
        )?;
        Ok(WeightVector::new(x))
    }

    /// Weights maximizing return subject to
    /// `sqrt(w' Sigma w) <= target_volatility`.
    ///
    /// Targets below the minimum-volatility portfolio's volatility are
    /// infeasible; targets above the riskiest feasible portfolio leave
    /// the cone slack and the solution saturates at the weight bounds.
    pub fn efficient_risk(&self, target_volatility: f64) -> Result<WeightVector> {
        if !target_volatility.is_finite() {
            return Err(FrontierError::InvalidInput(format!(
                "target volatility must be finite, got {}",
                target_volatility
            )));
        }
        if target_volatility < 0.0 {
            return Err(FrontierError::Infeasible(format!(
                "target volatility {} is negative",
                target_volatility
            )));
        }

        let mu = self.inputs.expected_returns();
        let neg_mu: Vec<f64> = mu.iter().map(|r| -r).collect();

        // ||C w|| <= target with C' C = Sigma bounds the volatility.
        let factor = self.inputs.covariance_factor();
        let rows: Vec<Vec<(usize, f64)>> = (0..factor.nrows())
            .map(|k| {
                (0..factor.ncols())
                    .filter(|&j| factor[(k, j)].abs() > 1e-15)
                    .map(|j| (j, factor[(k, j)]))
                    .collect()
            })
            .collect();

        let mut builder = self.budget_qp();
        builder.linear_cost(&neg_mu);
        builder.second_order(target_volatility, rows);
        let x = self.run(
            builder.build(),
            &format!("efficient_risk(target={})", target_volatility),
        )?;
        Ok(WeightVector::new(x))
    }

    /// Weights maximizing `w.mu - 0.5 * risk_aversion * w' Sigma w`.
    pub fn max_quadratic_utility(&self, risk_aversion: f64) -> Result<WeightVector> {
        if !risk_aversion.is_finite() || risk_aversion <= 0.0 {
            return Err(FrontierError::InvalidInput(format!(
                "risk aversion must be positive, got {}",
                risk_aversion
            )));
        }

        let mu = self.inputs.expected_returns();
        let neg_mu: Vec<f64> = mu.iter().map(|r| -r).collect();

        let mut builder = self.budget_qp();
        builder.quadratic_cost(self.inputs.covariance() * risk_aversion);
        builder.linear_cost(&neg_mu);
        let x = self.run(
            builder.build(),
            &format!("max_quadratic_utility(risk_aversion={})", risk_aversion),
        )?;
        Ok(WeightVector::new(x))
    }

    /// Weights maximizing the Sharpe ratio against `risk_free_rate`.
    ///
    /// The ratio objective is not itself a QP; it is solved through the
    /// Charnes-Cooper transformation: minimize `y' Sigma y` over
    /// `(y, kappa)` subject to `(mu - rf) . y == 1`, `sum(y) == kappa`,
    /// `kappa >= 0`, and the box scaled by `kappa`, then recover
    /// `w = y / kappa`. Infeasible when no portfolio earns an excess
    /// return, i.e. the risk-free rate sits above the frontier.
    pub fn max_sharpe(&self, risk_free_rate: f64) -> Result<WeightVector> {
        if !risk_free_rate.is_finite() {
            return Err(FrontierError::InvalidInput(format!(
                "risk-free rate must be finite, got {}",
                risk_free_rate
            )));
        }

        let n = self.inputs.num_assets();
        let mu = self.inputs.expected_returns();
        let operation = format!("max_sharpe(risk_free_rate={})", risk_free_rate);

        let mut p = DMatrix::zeros(n + 1, n + 1);
        p.view_mut((0, 0), (n, n))
            .copy_from(&(self.inputs.covariance() * 2.0));

        let excess: Vec<(usize, f64)> = (0..n).map(|i| (i, mu[i] - risk_free_rate)).collect();
        let mut budget: Vec<(usize, f64)> = (0..n).map(|i| (i, 1.0)).collect();
        budget.push((n, -1.0));

        let mut builder = QpBuilder::new(n + 1);
        builder.quadratic_cost(p);
        builder.equality(&excess, 1.0);
        builder.equality(&budget, 0.0);
        builder.less_equal(&[(n, -1.0)], 0.0);
        for i in 0..n {
            builder.less_equal(&[(i, -1.0), (n, self.bounds.lower)], 0.0);
            builder.less_equal(&[(i, 1.0), (n, -self.bounds.upper)], 0.0);
        }

        let x = self.run(builder.build(), &operation)?;
        let kappa = x[n];
        if kappa.abs() < MIN_SCALING {
            return Err(FrontierError::Numerical(format!(
                "{}: scaling variable collapsed to {}",
                operation, kappa
            )));
        }

        let mut weights: Vec<f64> = x[..n].iter().map(|y| y / kappa).collect();
        // sum(w) == 1 holds up to solver tolerance; remove the residual.
        let total: f64 = weights.iter().sum();
        if total.abs() > MIN_SCALING {
            for w in &mut weights {
                *w /= total;
            }
        }
        Ok(WeightVector::new(weights))
    }

    /// Evaluate weights against this solver's estimates.
    pub fn performance(
        &self,
        weights: &WeightVector,
        risk_free_rate: Option<f64>,
    ) -> PortfolioPoint {
        evaluate(
            weights,
            self.inputs.expected_returns(),
            self.inputs.covariance(),
            risk_free_rate,
        )
    }

    /// Budget equality plus the shared box, common to every solve over
    /// the plain weight vector.
    fn budget_qp(&self) -> QpBuilder {
        let n = self.inputs.num_assets();
        let ones: Vec<(usize, f64)> = (0..n).map(|i| (i, 1.0)).collect();

        let mut builder = QpBuilder::new(n);
        builder.equality(&ones, 1.0);
        builder.box_bounds(self.bounds.lower, self.bounds.upper);
        builder
    }

    /// Solve and map solver status onto the error taxonomy.
    fn run(&self, problem: QpProblem, operation: &str) -> Result<Vec<f64>> {
        let solution = solve(&problem, &self.settings);
        debug!(
            operation,
            status = ?solution.status,
            iterations = solution.iterations,
            solve_time = solution.solve_time,
            "solved"
        );

        match solution.status {
            SolveStatus::Optimal => solution.x.ok_or_else(|| {
                FrontierError::Numerical(format!("{}: solver returned no solution", operation))
            }),
            SolveStatus::Infeasible => Err(FrontierError::Infeasible(format!(
                "{}: constraints admit no portfolio",
                operation
            ))),
            other => Err(FrontierError::Numerical(format!(
                "{}: solver status {:?}",
                operation, other
            ))),
        }
    }
}
