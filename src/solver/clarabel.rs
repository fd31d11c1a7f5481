//! Clarabel solver integration.
//!
//! This module provides the interface to the Clarabel conic solver.

use clarabel::algebra::CscMatrix as ClarabelCsc;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};

use super::qp::{ConeLayout, QpProblem};

/// Solution status from the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Maximum iterations reached.
    MaxIterations,
    /// Numerical difficulties.
    NumericalError,
    /// Unknown status.
    Unknown,
}

impl From<SolverStatus> for SolveStatus {
    fn from(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Solved => SolveStatus::Optimal,
            SolverStatus::PrimalInfeasible => SolveStatus::Infeasible,
            SolverStatus::DualInfeasible => SolveStatus::Unbounded,
            SolverStatus::MaxIterations => SolveStatus::MaxIterations,
            SolverStatus::MaxTime => SolveStatus::MaxIterations,
            SolverStatus::NumericalError => SolveStatus::NumericalError,
            SolverStatus::InsufficientProgress => SolveStatus::NumericalError,
            _ => SolveStatus::Unknown,
        }
    }
}

/// Solver settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Print solver output.
    pub verbose: bool,
    /// Maximum iterations.
    pub max_iter: u32,
    /// Time limit in seconds.
    pub time_limit: f64,
    /// Absolute tolerance.
    pub tol_gap_abs: f64,
    /// Relative tolerance.
    pub tol_gap_rel: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            verbose: false,
            max_iter: 200,
            time_limit: f64::INFINITY,
            tol_gap_abs: 1e-8,
            tol_gap_rel: 1e-8,
        }
    }
}

/// Solution from the solver.
#[derive(Debug, Clone)]
pub struct QpSolution {
    /// Solution status.
    pub status: SolveStatus,
    /// Optimal value (if solved).
    pub value: Option<f64>,
    /// Primal variable values (if solved).
    pub x: Option<Vec<f64>>,
    /// Solve time in seconds.
    pub solve_time: f64,
    /// Number of iterations.
    pub iterations: u32,
}

/// Solve the assembled problem using Clarabel.
pub fn solve(problem: &QpProblem, settings: &Settings) -> QpSolution {
    let p = to_clarabel_csc(&problem.p);
    let a = to_clarabel_csc(&problem.a);
    let cones = to_clarabel_cones(&problem.cones);

    let clarabel_settings = DefaultSettingsBuilder::default()
        .verbose(settings.verbose)
        .max_iter(settings.max_iter)
        .time_limit(settings.time_limit)
        .tol_gap_abs(settings.tol_gap_abs)
        .tol_gap_rel(settings.tol_gap_rel)
        .build()
        .unwrap();

    let mut solver = DefaultSolver::new(&p, &problem.q, &a, &problem.b, &cones, clarabel_settings);
    solver.solve();

    let status: SolveStatus = solver.solution.status.into();
    let solve_time = solver.solution.solve_time;
    let iterations = solver.info.iterations;

    if status == SolveStatus::Optimal {
        let x = solver.solution.x.clone();
        let value = compute_objective(&x, &problem.p, &problem.q);

        QpSolution {
            status,
            value: Some(value),
            x: Some(x),
            solve_time,
            iterations,
        }
    } else {
        QpSolution {
            status,
            value: None,
            x: None,
            solve_time,
            iterations,
        }
    }
}

/// Convert nalgebra CSC to Clarabel CSC.
fn to_clarabel_csc(m: &nalgebra_sparse::CscMatrix<f64>) -> ClarabelCsc<f64> {
    ClarabelCsc::new(
        m.nrows(),
        m.ncols(),
        m.col_offsets().to_vec(),
        m.row_indices().to_vec(),
        m.values().to_vec(),
    )
}

/// Convert the cone layout to Clarabel cones.
fn to_clarabel_cones(layout: &ConeLayout) -> Vec<SupportedConeT<f64>> {
    let mut cones = Vec::new();

    if layout.zero > 0 {
        cones.push(SupportedConeT::ZeroConeT(layout.zero));
    }

    if layout.nonneg > 0 {
        cones.push(SupportedConeT::NonnegativeConeT(layout.nonneg));
    }

    for &soc_dim in &layout.soc {
        cones.push(SupportedConeT::SecondOrderConeT(soc_dim));
    }

    cones
}

/// Compute objective value: (1/2) x' P x + q' x.
fn compute_objective(x: &[f64], p: &nalgebra_sparse::CscMatrix<f64>, q: &[f64]) -> f64 {
    let linear: f64 = q.iter().zip(x.iter()).map(|(qi, xi)| qi * xi).sum();

    // P is stored as upper triangle; off-diagonal entries count twice.
    let mut quadratic = 0.0;
    for (row, col, val) in p.triplet_iter() {
        if row == col {
            quadratic += 0.5 * *val * x[row] * x[col];
        } else {
            quadratic += *val * x[row] * x[col];
        }
    }

    linear + quadratic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::qp::QpBuilder;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.verbose);
        assert_eq!(settings.max_iter, 200);
    }

    #[test]
    fn test_to_clarabel_cones() {
        let layout = ConeLayout {
            zero: 2,
            nonneg: 3,
            soc: vec![4],
        };
        let cones = to_clarabel_cones(&layout);
        assert_eq!(cones.len(), 3);
    }

    #[test]
    fn test_solve_simple_lp() {
        // minimize x0 + x1 s.t. x0 + x1 = 1, 0 <= x <= 1
        let mut builder = QpBuilder::new(2);
        builder.linear_cost(&[1.0, 1.0]);
        builder.equality(&[(0, 1.0), (1, 1.0)], 1.0);
        builder.box_bounds(0.0, 1.0);
        let solution = solve(&builder.build(), &Settings::default());

        assert_eq!(solution.status, SolveStatus::Optimal);
        let value = solution.value.expect("no value");
        assert!((value - 1.0).abs() < 1e-6, "expected ~1.0, got {}", value);
    }

    #[test]
    fn test_solve_infeasible() {
        // x = 2 conflicts with x <= 1.
        let mut builder = QpBuilder::new(1);
        builder.equality(&[(0, 1.0)], 2.0);
        builder.box_bounds(0.0, 1.0);
        let solution = solve(&builder.build(), &Settings::default());

        assert_eq!(solution.status, SolveStatus::Infeasible);
        assert!(solution.x.is_none());
    }

    #[test]
    fn test_solve_soc() {
        // maximize x0 s.t. ||x|| <= 1 -> x = (1, 0)
        let mut builder = QpBuilder::new(2);
        builder.linear_cost(&[-1.0, 0.0]);
        builder.second_order(1.0, vec![vec![(0, 1.0)], vec![(1, 1.0)]]);
        let solution = solve(&builder.build(), &Settings::default());

        assert_eq!(solution.status, SolveStatus::Optimal);
        let x = solution.x.expect("no primal");
        assert!((x[0] - 1.0).abs() < 1e-6);
        assert!(x[1].abs() < 1e-6);
    }
}
