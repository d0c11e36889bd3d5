//! Module for reducing, normalizing, and solving per-cell optimization problems

pub mod constraint;
pub mod objective;
pub mod partition;
pub mod problem;
pub mod solvers;
pub mod variable;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of one grid cell's constrained optimization
///
/// Created fresh per cell by the backend adapter and never mutated after
/// creation; the sweep engine copies its contents into the result tensors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCellResult {
    /// Final (scaled) objective value reported by the backend
    pub objective: f64,
    /// Final constraint values, one per constraint in declaration order
    pub constraints: Vec<f64>,
    /// Optimized free-variable values (scaled), one per free variable in
    /// declaration order
    pub free_variables: Vec<f64>,
    /// Whether the backend converged for this cell
    pub status: CellStatus,
}

impl GridCellResult {
    /// True unless the backend converged to a finite optimum
    pub fn failed(&self) -> bool {
        self.status != CellStatus::Optimal
    }
}

/// Status of one grid cell's optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    /// Backend satisfied its convergence criteria
    Optimal,
    /// Backend terminated without satisfying its convergence criteria
    NotConverged,
    /// The final objective or a final constraint value is non-finite
    EvaluationFailure,
}

/// Setup-time errors, all fatal and raised before any grid work starts
///
/// Per-cell evaluation failure and backend non-convergence are not errors;
/// they are recorded in [`CellStatus`] and the sweep continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    /// Swept/fixed variable indices are equal or out of range
    #[error("swept variable indices must be distinct and in range: got {index_0} and {index_1} for {len} variables")]
    InvalidIndex {
        index_0: usize,
        index_1: usize,
        len: usize,
    },
    /// A variable, constraint, or objective scale factor is zero
    #[error("scale factor for '{name}' must be nonzero")]
    InvalidScale { name: String },
    /// Backend identifier does not name a known optimizer
    #[error("unknown optimizer backend '{0}'")]
    UnsupportedBackend(String),
    /// Grid resolution below the two points needed to span an axis
    #[error("grid resolution must be at least 2, got {0}")]
    InvalidResolution(usize),
    /// A swept variable's bounds cannot span a monotonic axis
    #[error("swept variable '{name}' must have lower_bound < upper_bound")]
    DegenerateAxis { name: String },
    /// Parallel finite differencing requested without a process group
    #[error("parallel evaluation mode requires an initialized process group")]
    ProcessGroupRequired,
}
