//! The grid-sweep controller: fixes two variables at swept values and runs
//! one constrained optimization per grid cell

pub mod aggregate;

use env_logger::{Builder, Env};
use log::{debug, info};
use ndarray::{Array1, Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::configuration::Configuration;
use crate::optimize::constraint::ConstraintSpec;
use crate::optimize::objective::ObjectiveSpec;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::adapter::BackendAdapter;
use crate::optimize::solvers::{ProcessGroup, SolverBackend};
use crate::optimize::variable::VariableSpec;
use crate::optimize::{partition, CellStatus, SweepError};

/// Environment variable controlling the sweep's log filter
pub const CARPET_LOG: &str = "CARPET_LOG";

/// One swept variable's axis: `grid_points` linearly spaced raw values
/// spanning the variable's bounds, both ends inclusive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepAxis {
    /// Name of the swept variable
    pub name: String,
    /// Index of the swept variable in the full variable list
    pub variable_index: usize,
    /// Sample values in raw units, strictly monotonic
    pub values: Array1<f64>,
}

impl SweepAxis {
    fn over(variable: &VariableSpec, variable_index: usize, points: usize) -> Self {
        SweepAxis {
            name: variable.name.clone(),
            variable_index,
            values: Array1::linspace(variable.lower_bound, variable.upper_bound, points),
        }
    }
}

/// Aggregate result of a full sweep
///
/// Populated once by [`GridSweepEngine::run`] and immutable thereafter.
/// Storage layout is `[slot, j, i]`: `i` indexes axis 0, `j` indexes axis 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResult {
    /// The two swept axes, in sweep-index order
    pub axes: [SweepAxis; 2],
    /// `N×N` objective grid in raw units (backend value times the objective
    /// scale)
    pub objective: Array2<f64>,
    /// `C×N×N` constraint value tensor, one slice per constraint in
    /// declaration order
    pub constraints: Array3<f64>,
    /// `F×N×N` free-variable optimum tensor (scaled), one slice per free
    /// variable in declaration order
    pub free_variables: Array3<f64>,
    /// Per-cell convergence status
    pub status: Array2<CellStatus>,
}

/// Controller that owns the sweep loop
///
/// All setup validation happens in [`Self::new`]; per-cell evaluation and
/// convergence failures are local to their cell and never abort the sweep.
pub struct GridSweepEngine {
    variables: Vec<VariableSpec>,
    constraints: Vec<ConstraintSpec>,
    objective: ObjectiveSpec,
    sweep_index_0: usize,
    sweep_index_1: usize,
    config: Configuration,
}

impl GridSweepEngine {
    /// Create an engine for one sweep, validating everything that is cheap
    /// to check now and expensive to discover mid-sweep
    pub fn new(
        variables: &[VariableSpec],
        constraints: &[ConstraintSpec],
        objective: ObjectiveSpec,
        sweep_index_0: usize,
        sweep_index_1: usize,
        config: Configuration,
    ) -> Result<Self, SweepError> {
        let env = Env::new().filter_or(CARPET_LOG, "info");
        let mut builder = Builder::from_env(env);
        builder.target(env_logger::Target::Stdout);
        builder.try_init().ok();

        partition::check_indices(variables.len(), sweep_index_0, sweep_index_1)?;
        for index in [sweep_index_0, sweep_index_1] {
            let var = &variables[index];
            if !(var.lower_bound < var.upper_bound) {
                return Err(SweepError::DegenerateAxis {
                    name: var.name.clone(),
                });
            }
        }
        if config.grid_points < 2 {
            return Err(SweepError::InvalidResolution(config.grid_points));
        }
        if objective.scale == 0.0 {
            return Err(SweepError::InvalidScale {
                name: objective.name.clone(),
            });
        }
        for var in variables {
            if var.scale == 0.0 {
                return Err(SweepError::InvalidScale {
                    name: var.name.clone(),
                });
            }
        }
        for con in constraints {
            con.scaled_bounds()?;
        }
        Ok(GridSweepEngine {
            variables: variables.to_vec(),
            constraints: constraints.to_vec(),
            objective,
            sweep_index_0,
            sweep_index_1,
            config,
        })
    }

    /// Run the sweep: one constrained optimization per grid cell
    ///
    /// `new_backend` supplies a fresh backend instance per cell;
    /// `process_group` must be provided when the configuration requests
    /// parallel finite differencing.
    pub fn run(
        &self,
        problem: &mut dyn Problem,
        new_backend: &mut dyn FnMut() -> Box<dyn SolverBackend>,
        process_group: Option<&dyn ProcessGroup>,
    ) -> Result<SweepResult, SweepError> {
        let rank = process_group.map(|group| group.rank());
        let adapter = BackendAdapter::new(
            &self.variables,
            &self.constraints,
            &self.objective.name,
            self.sweep_index_0,
            self.sweep_index_1,
            &self.config,
            rank,
        )?;

        let points = self.config.grid_points;
        let axes = [
            SweepAxis::over(&self.variables[self.sweep_index_0], self.sweep_index_0, points),
            SweepAxis::over(&self.variables[self.sweep_index_1], self.sweep_index_1, points),
        ];
        let scale_0 = self.variables[self.sweep_index_0].scale;
        let scale_1 = self.variables[self.sweep_index_1].scale;
        let n_constraints = self.constraints.len();
        let n_free = self.variables.len() - 2;

        let mut objective = Array2::zeros((points, points));
        let mut constraints = Array3::zeros((n_constraints, points, points));
        let mut free_variables = Array3::zeros((n_free, points, points));
        let mut status = Array2::from_elem((points, points), CellStatus::Optimal);

        info!(
            "sweeping {} x {} over '{}' and '{}' with {}",
            points, points, axes[0].name, axes[1].name, self.config.backend
        );
        for i in 0..points {
            for j in 0..points {
                let fixed_0 = axes[0].values[i] / scale_0;
                let fixed_1 = axes[1].values[j] / scale_1;
                let mut backend = new_backend();
                let cell = adapter.solve_cell(fixed_0, fixed_1, problem, backend.as_mut());
                if cell.failed() {
                    debug!("cell ({}, {}) failed with {:?}", i, j, cell.status);
                }
                objective[[j, i]] = cell.objective * self.objective.scale;
                for (c, value) in cell.constraints.iter().take(n_constraints).enumerate() {
                    constraints[[c, j, i]] = *value;
                }
                for (f, value) in cell.free_variables.iter().take(n_free).enumerate() {
                    free_variables[[f, j, i]] = *value;
                }
                // a backend reporting the wrong number of values broke its
                // contract; the cell's slots cannot be trusted
                let wrong_length = cell.constraints.len() != n_constraints
                    || cell.free_variables.len() != n_free;
                status[[j, i]] = if wrong_length {
                    debug!(
                        "cell ({}, {}) returned {} constraints and {} variables, expected {} and {}",
                        i,
                        j,
                        cell.constraints.len(),
                        cell.free_variables.len(),
                        n_constraints,
                        n_free
                    );
                    CellStatus::EvaluationFailure
                } else {
                    cell.status
                };
            }
        }
        info!("sweep completed");

        Ok(SweepResult {
            axes,
            objective,
            constraints,
            free_variables,
            status,
        })
    }
}
