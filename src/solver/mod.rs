//! Solver interface for the frontier engine.
//!
//! This module provides:
//! - QP assembly into the matrices and cone layout Clarabel expects
//! - Clarabel solver integration

pub mod clarabel;
pub mod qp;

pub use self::clarabel::{solve, QpSolution, Settings, SolveStatus};
pub use qp::{ConeLayout, QpBuilder, QpProblem};
