//! The external evaluator seam and the per-cell evaluation closure handed
//! to optimizer backends

use log::debug;

use crate::optimize::{partition, SweepError};

/// External collaborator that evaluates the objective and constraint set
///
/// Called with a full-length variable vector in original declared order, in
/// the optimizer's scaled space. Implementations are free to cache state,
/// but every result consumed by this core is an explicit return value.
pub trait Problem {
    /// Objective value at `x` (scaled)
    fn objective(&mut self, x: &[f64]) -> f64;
    /// Constraint values at `x` (scaled), in constraint declaration order
    fn constraints(&mut self, x: &[f64]) -> Vec<f64>;
}

/// One evaluation of the objective and constraints at a candidate point
#[derive(Debug, Clone)]
pub struct CellEvaluation {
    pub objective: f64,
    pub constraints: Vec<f64>,
    /// True iff the objective or any constraint is non-finite
    pub fail: bool,
}

/// Evaluation closure bound to one grid cell
///
/// Holds the cell's two fixed (pre-scaled) values and reinserts them into
/// every candidate vector the backend proposes before delegating to the
/// [`Problem`]. The backend calls this repeatedly during its search; no
/// assumption is made about how often or in what order.
pub struct CellEvaluator<'a, P: Problem + ?Sized> {
    problem: &'a mut P,
    index_0: usize,
    value_0: f64,
    index_1: usize,
    value_1: f64,
    rank: Option<usize>,
}

impl<'a, P: Problem + ?Sized> CellEvaluator<'a, P> {
    /// Bind a problem to one cell's fixed values
    ///
    /// `rank` is the caller's process rank when running under a process
    /// group; trace records are emitted only on rank 0.
    pub fn new(
        problem: &'a mut P,
        index_0: usize,
        value_0: f64,
        index_1: usize,
        value_1: f64,
        rank: Option<usize>,
    ) -> Self {
        CellEvaluator {
            problem,
            index_0,
            value_0,
            index_1,
            value_1,
            rank,
        }
    }

    /// Evaluate one candidate free-variable vector
    ///
    /// Reinserts the fixed values, delegates to the problem, and flags the
    /// evaluation failed if the objective or any constraint came back
    /// non-finite. The failure is data for the backend to react to, never a
    /// raised fault.
    pub fn evaluate(&mut self, free: &[f64]) -> Result<CellEvaluation, SweepError> {
        let full =
            partition::reinsert(free, self.index_0, self.value_0, self.index_1, self.value_1)?;
        let objective = self.problem.objective(&full);
        let constraints = self.problem.constraints(&full);
        let fail = !objective.is_finite() || constraints.iter().any(|c| !c.is_finite());
        if self.rank.map_or(true, |r| r == 0) {
            debug!(
                "eval x = {:?} obj = {} con = {:?} fail = {}",
                free, objective, constraints, fail
            );
        }
        Ok(CellEvaluation {
            objective,
            constraints,
            fail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Quadratic;

    impl Problem for Quadratic {
        fn objective(&mut self, x: &[f64]) -> f64 {
            x.iter().map(|v| v * v).sum()
        }
        fn constraints(&mut self, x: &[f64]) -> Vec<f64> {
            vec![x[0] + x[2]]
        }
    }

    #[test]
    fn fixed_values_land_at_their_indices() {
        let mut problem = Quadratic;
        let mut eval = CellEvaluator::new(&mut problem, 0, 3.0, 2, 4.0, None);
        // full vector is [3, 5, 4]
        let result = eval.evaluate(&[5.0]).unwrap();
        assert_eq!(result.objective, 9.0 + 25.0 + 16.0);
        assert_eq!(result.constraints, vec![7.0]);
        assert!(!result.fail);
    }

    struct NanObjective;

    impl Problem for NanObjective {
        fn objective(&mut self, _x: &[f64]) -> f64 {
            f64::NAN
        }
        fn constraints(&mut self, _x: &[f64]) -> Vec<f64> {
            vec![1.0]
        }
    }

    struct NanConstraint;

    impl Problem for NanConstraint {
        fn objective(&mut self, _x: &[f64]) -> f64 {
            1.0
        }
        fn constraints(&mut self, _x: &[f64]) -> Vec<f64> {
            vec![0.0, f64::INFINITY]
        }
    }

    #[test]
    fn non_finite_results_set_the_fail_flag() {
        let mut nan_obj = NanObjective;
        let mut eval = CellEvaluator::new(&mut nan_obj, 0, 0.0, 1, 0.0, None);
        assert!(eval.evaluate(&[1.0]).unwrap().fail);

        let mut nan_con = NanConstraint;
        let mut eval = CellEvaluator::new(&mut nan_con, 0, 0.0, 1, 0.0, None);
        assert!(eval.evaluate(&[1.0]).unwrap().fail);
    }
}
