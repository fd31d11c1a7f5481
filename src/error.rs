//! Error types for the frontier engine.

use thiserror::Error;

/// Error type for portfolio optimization operations.
#[derive(Debug, Error)]
pub enum FrontierError {
    /// No portfolio satisfies the requested constraints.
    #[error("Infeasible: {0}")]
    Infeasible(String),

    /// The convex solve did not converge.
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Malformed estimation inputs or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for portfolio optimization operations.
pub type Result<T> = std::result::Result<T, FrontierError>;
