//! Normalizes one reduced optimization problem into the calling convention
//! of the selected backend

use log::debug;

use crate::configuration::{Configuration, EvaluationMode};
use crate::optimize::constraint::{ConstraintBounds, ConstraintSpec};
use crate::optimize::problem::{CellEvaluator, Problem};
use crate::optimize::solvers::{BackendId, SensitivityStrategy, SolverBackend, OptionValue};
use crate::optimize::variable::{VariableKind, VariableSpec};
use crate::optimize::{partition, CellStatus, GridCellResult, SweepError};

/// One reduced variable, pre-scaled for backend declaration
#[derive(Debug, Clone)]
struct ReducedVariable {
    name: String,
    kind: VariableKind,
    lower: f64,
    upper: f64,
    initial: f64,
}

/// Adapter from the normalized problem description to a backend invocation
///
/// Constructed once per sweep: the reduced variable set, the scaled
/// constraint bound table, and the backend's option function do not change
/// between cells. Only the two fixed values vary, so [`Self::solve_cell`]
/// takes them per call.
pub struct BackendAdapter {
    id: BackendId,
    configure: fn(&mut dyn SolverBackend, f64),
    sense_step: f64,
    nonderivative_line_search: bool,
    evaluation_mode: EvaluationMode,
    rank: Option<usize>,
    objective_name: String,
    index_0: usize,
    index_1: usize,
    reduced: Vec<ReducedVariable>,
    constraint_table: Vec<(String, ConstraintBounds)>,
}

impl BackendAdapter {
    /// Build the adapter for one sweep
    ///
    /// Fails fast on equal/out-of-range fixed indices, zero variable or
    /// constraint scales, and parallel evaluation mode without a process
    /// rank.
    pub fn new(
        variables: &[VariableSpec],
        constraints: &[ConstraintSpec],
        objective_name: &str,
        index_0: usize,
        index_1: usize,
        config: &Configuration,
        rank: Option<usize>,
    ) -> Result<Self, SweepError> {
        if config.evaluation_mode == EvaluationMode::Parallel && rank.is_none() {
            return Err(SweepError::ProcessGroupRequired);
        }
        let reduced = partition::reduce(variables, index_0, index_1)?
            .into_iter()
            .map(|var| {
                if var.scale == 0.0 {
                    return Err(SweepError::InvalidScale {
                        name: var.name.clone(),
                    });
                }
                Ok(ReducedVariable {
                    name: var.name.clone(),
                    kind: var.kind,
                    lower: var.lower_bound / var.scale,
                    upper: var.upper_bound / var.scale,
                    initial: var.initial_value / var.scale,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let constraint_table = constraints
            .iter()
            .map(|con| Ok((con.name.clone(), con.scaled_bounds()?)))
            .collect::<Result<Vec<_>, SweepError>>()?;
        Ok(BackendAdapter {
            id: config.backend,
            configure: config.backend.configurator(),
            sense_step: config.sense_step,
            nonderivative_line_search: config.nonderivative_line_search,
            evaluation_mode: config.evaluation_mode,
            rank,
            objective_name: objective_name.to_string(),
            index_0,
            index_1,
            reduced,
            constraint_table,
        })
    }

    /// Solve one grid cell with the two fixed (pre-scaled) values
    ///
    /// Never returns a hard error: backend non-convergence and non-finite
    /// final values are reported through [`CellStatus`] so the sweep can
    /// move on to the next cell.
    pub fn solve_cell(
        &self,
        fixed_0: f64,
        fixed_1: f64,
        problem: &mut dyn Problem,
        backend: &mut dyn SolverBackend,
    ) -> GridCellResult {
        backend.declare_objective(&self.objective_name);
        for var in &self.reduced {
            backend.declare_variable(&var.name, var.kind, var.lower, var.upper, var.initial);
        }
        for (name, bounds) in &self.constraint_table {
            backend.declare_constraint(name, *bounds);
        }
        (self.configure)(backend, self.sense_step);
        if self.nonderivative_line_search && self.id.is_gradient_based() {
            backend.set_option("Nonderivative linesearch", OptionValue::Flag);
        }

        debug!(
            "solving cell with {} at fixed ({}, {})",
            self.id, fixed_0, fixed_1
        );
        let mut evaluator = CellEvaluator::new(
            problem,
            self.index_0,
            fixed_0,
            self.index_1,
            fixed_1,
            self.rank,
        );
        let mut evaluate = |free: &[f64]| match evaluator.evaluate(free) {
            Ok(eval) => (eval.objective, eval.constraints, eval.fail),
            // a candidate of the wrong length cannot be evaluated; report
            // it as a failed evaluation and let the backend react
            Err(_) => (f64::NAN, Vec::new(), true),
        };
        let outcome = backend.run(&mut evaluate, self.sensitivity());

        let non_finite = !outcome.objective.is_finite()
            || outcome.constraints.iter().any(|c| !c.is_finite());
        let status = if non_finite {
            CellStatus::EvaluationFailure
        } else if !outcome.converged {
            CellStatus::NotConverged
        } else {
            CellStatus::Optimal
        };
        GridCellResult {
            objective: outcome.objective,
            constraints: outcome.constraints,
            free_variables: outcome.variables,
            status,
        }
    }

    /// Sensitivity strategy for this sweep's invocations
    fn sensitivity(&self) -> SensitivityStrategy {
        if self.evaluation_mode == EvaluationMode::Parallel {
            SensitivityStrategy::ParallelFiniteDifference {
                step: self.sense_step,
            }
        } else if self.id.is_gradient_based() {
            SensitivityStrategy::FiniteDifference {
                step: self.sense_step,
            }
        } else {
            SensitivityStrategy::BackendDefault
        }
    }
}
