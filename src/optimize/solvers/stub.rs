//! Recording stub backend used by adapter and engine tests
//!
//! Declares nothing of its own: it records every declaration and option it
//! receives, and its "search" is a single evaluation at the declared lower
//! bounds.

use crate::optimize::constraint::ConstraintBounds;
use crate::optimize::solvers::{
    BackendOutcome, EvalFn, OptionValue, SensitivityStrategy, SolverBackend,
};
use crate::optimize::variable::VariableKind;

#[derive(Debug, Clone)]
pub(crate) struct DeclaredVariable {
    pub name: String,
    pub kind: VariableKind,
    pub lower: f64,
    pub upper: f64,
    pub initial: f64,
}

#[derive(Default)]
pub(crate) struct StubBackend {
    pub variables: Vec<DeclaredVariable>,
    pub objective: Option<String>,
    pub constraints: Vec<(String, ConstraintBounds)>,
    pub options: Vec<(String, OptionValue)>,
    pub sensitivity: Option<SensitivityStrategy>,
    /// When set, report non-convergence regardless of the evaluation
    pub refuse_to_converge: bool,
}

impl SolverBackend for StubBackend {
    fn declare_variable(
        &mut self,
        name: &str,
        kind: VariableKind,
        lower: f64,
        upper: f64,
        initial: f64,
    ) {
        self.variables.push(DeclaredVariable {
            name: name.to_string(),
            kind,
            lower,
            upper,
            initial,
        });
    }

    fn declare_objective(&mut self, name: &str) {
        self.objective = Some(name.to_string());
    }

    fn declare_constraint(&mut self, name: &str, bounds: ConstraintBounds) {
        self.constraints.push((name.to_string(), bounds));
    }

    fn set_option(&mut self, key: &str, value: OptionValue) {
        self.options.push((key.to_string(), value));
    }

    fn run(&mut self, evaluate: &mut EvalFn, sensitivity: SensitivityStrategy) -> BackendOutcome {
        self.sensitivity = Some(sensitivity);
        let point: Vec<f64> = self.variables.iter().map(|v| v.lower).collect();
        let (objective, constraints, fail) = evaluate(&point);
        BackendOutcome {
            variables: point,
            objective,
            constraints,
            converged: !self.refuse_to_converge && !fail,
        }
    }
}
