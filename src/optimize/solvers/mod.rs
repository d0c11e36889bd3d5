//! Interfaces to external nonlinear-programming backends
//!
//! The backends themselves are external collaborators; this module only
//! defines the declaration API the adapter drives and the enumerated set of
//! supported backend identifiers with their configuration differences.

pub mod adapter;
#[cfg(test)]
pub(crate) mod stub;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::optimize::constraint::ConstraintBounds;
use crate::optimize::variable::VariableKind;
use crate::optimize::SweepError;

/// Evaluation closure handed to a backend: candidate free vector in,
/// (objective, constraints, fail) out
pub type EvalFn<'a> = dyn FnMut(&[f64]) -> (f64, Vec<f64>, bool) + 'a;

/// Declaration API exposed by an external optimizer backend
///
/// The adapter declares the normalized (reduced, scaled) problem through
/// this trait, then invokes the backend once per grid cell.
pub trait SolverBackend {
    /// Declare one bounded variable (scaled bounds and initial value)
    fn declare_variable(
        &mut self,
        name: &str,
        kind: VariableKind,
        lower: f64,
        upper: f64,
        initial: f64,
    );
    /// Declare the objective by name
    fn declare_objective(&mut self, name: &str);
    /// Declare one constraint with its scaled bound pair
    fn declare_constraint(&mut self, name: &str, bounds: ConstraintBounds);
    /// Set a backend-specific option
    fn set_option(&mut self, key: &str, value: OptionValue);
    /// Run the backend's search, calling `evaluate` with candidate free
    /// vectors, and report the outcome
    fn run(&mut self, evaluate: &mut EvalFn, sensitivity: SensitivityStrategy) -> BackendOutcome;
}

/// A backend-specific option value
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Float(f64),
    Int(i64),
    Text(String),
    /// A bare flag with no value
    Flag,
}

/// How the backend should obtain sensitivities for this invocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensitivityStrategy {
    /// Forward/central finite differences with the given step
    FiniteDifference { step: f64 },
    /// Finite differences evaluated across the ranks of a process group
    ParallelFiniteDifference { step: f64 },
    /// No explicit request; derivative-free and heuristic backends decide
    /// for themselves
    BackendDefault,
}

/// What the backend reports after one invocation
#[derive(Debug, Clone)]
pub struct BackendOutcome {
    /// Free-variable values at the backend's final point (scaled)
    pub variables: Vec<f64>,
    /// Objective at the final point
    pub objective: f64,
    /// Constraint values at the final point
    pub constraints: Vec<f64>,
    /// Whether the backend satisfied its convergence criteria
    pub converged: bool,
}

/// External process-group collaborator, queried for the current rank when
/// finite differences are evaluated in parallel
pub trait ProcessGroup {
    fn rank(&self) -> usize;
}

/// Enum identifying the supported optimizer backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendId {
    /// SNOPT gradient-based SQP
    Snopt,
    /// COBYLA derivative-free simplex
    Cobyla,
    /// SLSQP gradient-based SQP
    Slsqp,
    /// KSOPT penalty-based
    Ksopt,
    /// FSQP penalty-based
    Fsqp,
    /// PSQP penalty-based
    Psqp,
    /// NLPQL penalty-based
    Nlpql,
    /// ALHSO harmony-search heuristic
    Alhso,
    /// NSGA2 genetic heuristic, runs with a parallel-execution mode flag
    Nsga2,
    /// MIDACO ant-colony heuristic, runs with a parallel-execution mode flag
    Midaco,
    /// ALPSO particle-swarm heuristic
    Alpso,
}

impl BackendId {
    /// Every supported backend, in declaration order
    pub fn all() -> [BackendId; 11] {
        [
            BackendId::Snopt,
            BackendId::Cobyla,
            BackendId::Slsqp,
            BackendId::Ksopt,
            BackendId::Fsqp,
            BackendId::Psqp,
            BackendId::Nlpql,
            BackendId::Alhso,
            BackendId::Nsga2,
            BackendId::Midaco,
            BackendId::Alpso,
        ]
    }

    /// Whether the backend consumes gradients and therefore a
    /// finite-difference sensitivity request
    pub fn is_gradient_based(self) -> bool {
        matches!(self, BackendId::Snopt | BackendId::Slsqp)
    }

    /// Backend-specific option setup, resolved once per sweep
    ///
    /// Returns the function that applies this backend's options given the
    /// finite-difference step size.
    pub fn configurator(self) -> fn(&mut dyn SolverBackend, f64) {
        match self {
            BackendId::Snopt => configure_snopt,
            BackendId::Slsqp => configure_slsqp,
            BackendId::Nsga2 | BackendId::Midaco => configure_parallel_heuristic,
            BackendId::Cobyla
            | BackendId::Ksopt
            | BackendId::Fsqp
            | BackendId::Psqp
            | BackendId::Nlpql
            | BackendId::Alhso
            | BackendId::Alpso => configure_defaults,
        }
    }
}

/// SNOPT manual recommendations: precision from the step, central interval
/// as step^(2/3)
fn configure_snopt(backend: &mut dyn SolverBackend, step: f64) {
    backend.set_option("Function precision", OptionValue::Float(step * step));
    backend.set_option("Difference interval", OptionValue::Float(step));
    backend.set_option(
        "Central difference interval",
        OptionValue::Float((step * step).powf(1.0 / 3.0)),
    );
}

fn configure_slsqp(backend: &mut dyn SolverBackend, _step: f64) {
    backend.set_option("MAXIT", OptionValue::Int(200));
}

fn configure_parallel_heuristic(backend: &mut dyn SolverBackend, _step: f64) {
    backend.set_option("pll_type", OptionValue::Text("POA".into()));
}

fn configure_defaults(_backend: &mut dyn SolverBackend, _step: f64) {}

impl Display for BackendId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BackendId::Snopt => "SNOPT",
            BackendId::Cobyla => "COBYLA",
            BackendId::Slsqp => "SLSQP",
            BackendId::Ksopt => "KSOPT",
            BackendId::Fsqp => "FSQP",
            BackendId::Psqp => "PSQP",
            BackendId::Nlpql => "NLPQL",
            BackendId::Alhso => "ALHSO",
            BackendId::Nsga2 => "NSGA2",
            BackendId::Midaco => "MIDACO",
            BackendId::Alpso => "ALPSO",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for BackendId {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SNOPT" => Ok(BackendId::Snopt),
            "COBYLA" => Ok(BackendId::Cobyla),
            "SLSQP" => Ok(BackendId::Slsqp),
            "KSOPT" => Ok(BackendId::Ksopt),
            "FSQP" => Ok(BackendId::Fsqp),
            "PSQP" => Ok(BackendId::Psqp),
            "NLPQL" => Ok(BackendId::Nlpql),
            "ALHSO" => Ok(BackendId::Alhso),
            "NSGA2" => Ok(BackendId::Nsga2),
            "MIDACO" => Ok(BackendId::Midaco),
            "ALPSO" => Ok(BackendId::Alpso),
            other => Err(SweepError::UnsupportedBackend(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for id in BackendId::all() {
            let parsed: BackendId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn unknown_backend_is_rejected() {
        match "IPOPT".parse::<BackendId>() {
            Err(SweepError::UnsupportedBackend(name)) => assert_eq!(name, "IPOPT"),
            other => panic!("unknown backend not caught: {:?}", other),
        }
    }

    #[test]
    fn option_tables_match_the_backend() {
        let mut recorder = stub::StubBackend::default();
        let step = 1.0e-6;

        BackendId::Snopt.configurator()(&mut recorder, step);
        assert_eq!(
            recorder.options,
            vec![
                ("Function precision".to_string(), OptionValue::Float(step * step)),
                ("Difference interval".to_string(), OptionValue::Float(step)),
                (
                    "Central difference interval".to_string(),
                    OptionValue::Float((step * step).powf(1.0 / 3.0)),
                ),
            ]
        );

        let mut recorder = stub::StubBackend::default();
        BackendId::Slsqp.configurator()(&mut recorder, step);
        assert_eq!(
            recorder.options,
            vec![("MAXIT".to_string(), OptionValue::Int(200))]
        );

        let mut recorder = stub::StubBackend::default();
        BackendId::Nsga2.configurator()(&mut recorder, step);
        assert_eq!(
            recorder.options,
            vec![("pll_type".to_string(), OptionValue::Text("POA".into()))]
        );

        let mut recorder = stub::StubBackend::default();
        BackendId::Cobyla.configurator()(&mut recorder, step);
        assert!(recorder.options.is_empty());
    }
}
