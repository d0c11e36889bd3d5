//! Sweep-wide tuning knobs and their defaults

use serde::{Deserialize, Serialize};

use crate::optimize::solvers::BackendId;

/// Settings shared by every cell of a sweep
///
/// Passed explicitly to [`crate::sweep::GridSweepEngine::new`]; read once at
/// setup, never consulted mid-sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    /// Which optimizer backend solves each grid cell
    pub backend: BackendId,
    /// Finite-difference step size handed to gradient-based backends
    pub sense_step: f64,
    /// Request the backend's non-derivative line-search option
    ///
    /// Only meaningful for gradient-based backends; ignored otherwise.
    pub nonderivative_line_search: bool,
    /// How the backend should evaluate finite-difference sensitivities
    pub evaluation_mode: EvaluationMode,
    /// Number of samples per sweep axis, must be at least 2
    pub grid_points: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            backend: BackendId::Snopt,
            sense_step: 1.0e-6,
            nonderivative_line_search: false,
            evaluation_mode: EvaluationMode::Serial,
            grid_points: 10,
        }
    }
}

/// How function evaluations for sensitivities are dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationMode {
    /// One evaluation in flight at a time
    Serial,
    /// Finite differences computed across the ranks of an already
    /// initialized process group
    Parallel,
}
