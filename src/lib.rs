//! # efficient-frontier
//!
//! Mean-variance efficient frontiers, tangency portfolios, and capital
//! allocation lines, solved through the Clarabel conic solver.
//!
//! Given annualized expected returns and a covariance matrix for an
//! asset universe, the crate locates the minimum-variance and
//! maximum-Sharpe portfolios, samples the efficient frontier on a
//! log-spaced risk grid, and constructs the utility-optimal mix of the
//! risk-free asset and the tangency portfolio under a leverage bound.
//!
//! ## Quick Start
//!
//! ```ignore
//! use efficient_frontier::prelude::*;
//!
//! let universe = AssetUniverse::new(["AAA", "BBB", "CCC"])?;
//! let inputs = MarketInputs::new(universe, expected_returns, covariance)?;
//!
//! let report = analyze(
//!     inputs,
//!     WeightBounds::long_only(),
//!     0.02,                       // risk-free rate
//!     RiskProfile::Moderate.risk_aversion(),
//!     WeightBounds::long_only(),  // no leverage on the final mix
//!     DEFAULT_FRONTIER_POINTS,
//! )?;
//!
//! println!("tangency Sharpe: {:?}", report.tangency.sharpe);
//! println!("optimal risky weight: {}", report.optimum.risky_weight);
//! ```
//!
//! ## Architecture
//!
//! - **Validated inputs** (`market`): symmetrization and eigenvalue
//!   clamping repair estimation noise before any solve
//! - **Conic QP layer** (`solver`): each operation is assembled as a
//!   Clarabel problem with zero / nonnegative / second-order cones
//! - **Five solves** (`frontier`): minimum volatility, maximum Sharpe
//!   (Charnes-Cooper transform), maximum quadratic utility, target
//!   risk, target return
//! - **Sweeps** (`sampler`): per-point infeasibility at the frontier
//!   extremes is skipped, never fatal
//! - **Reports** (`analytics`, `cal`): the scalars and point sequences
//!   a presentation layer plots

pub mod analytics;
pub mod cal;
pub mod config;
pub mod error;
pub mod frontier;
pub mod market;
pub mod portfolio;
pub mod sampler;
pub mod solver;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use efficient_frontier::prelude::*;
/// ```
pub mod prelude {
    // Inputs
    pub use crate::market::{AssetUniverse, MarketInputs, WeightBounds};

    // Portfolio values
    pub use crate::portfolio::{evaluate, FrontierCurve, PortfolioPoint, WeightVector};

    // Optimization
    pub use crate::frontier::EfficientFrontier;
    pub use crate::sampler::{
        risk_grid, sample_frontier, SweepMode, DEFAULT_FRONTIER_POINTS, RISK_GRID_EPSILON,
    };

    // Analytics
    pub use crate::analytics::{
        analyze, asset_points, min_volatility_portfolio, quadratic_utility, tangency_portfolio,
        utility_loss, FrontierReport,
    };
    pub use crate::cal::{CalAllocation, CapitalAllocationLine};

    // Configuration
    pub use crate::config::{AssetProfile, RiskProfile, Theme};

    // Solver
    pub use crate::solver::Settings;

    // Errors
    pub use crate::error::{FrontierError, Result};
}

// Re-export main types at crate root
pub use error::{FrontierError, Result};
pub use frontier::EfficientFrontier;
pub use market::{AssetUniverse, MarketInputs, WeightBounds};
pub use portfolio::{FrontierCurve, PortfolioPoint, WeightVector};
