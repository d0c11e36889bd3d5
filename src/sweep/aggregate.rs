//! Packages a sweep result into the named surfaces the visualization
//! collaborator consumes

use indexmap::IndexMap;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::optimize::constraint::ConstraintSpec;
use crate::optimize::objective::ObjectiveSpec;
use crate::optimize::variable::VariableSpec;
use crate::optimize::CellStatus;
use crate::sweep::{SweepAxis, SweepResult};

/// One named `N×N` grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surface {
    pub name: String,
    pub values: Array2<f64>,
}

/// Everything a contour or 3-axis surface plot needs: the two axes plus one
/// named grid per objective, constraint, and free variable
///
/// Pure reshaping/selection over [`SweepResult`]; no computation, no failure
/// modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceSet {
    /// The two swept axes, in sweep-index order
    pub axes: [SweepAxis; 2],
    /// The objective grid, in raw units
    pub objective: Surface,
    /// One grid per constraint, keyed by name in declaration order
    pub constraints: IndexMap<String, Array2<f64>>,
    /// One grid per free variable, keyed by name in declaration order
    pub free_variables: IndexMap<String, Array2<f64>>,
    /// Per-cell convergence status, so downstream analysis can tell failed
    /// cells from real optima
    pub status: Array2<CellStatus>,
}

impl SurfaceSet {
    /// Assemble the surfaces from a populated sweep result and the spec
    /// lists the sweep was run with
    pub fn assemble(
        result: &SweepResult,
        variables: &[VariableSpec],
        constraints: &[ConstraintSpec],
        objective: &ObjectiveSpec,
    ) -> SurfaceSet {
        let constraint_grids = constraints
            .iter()
            .zip(result.constraints.axis_iter(Axis(0)))
            .map(|(con, grid)| (con.name.clone(), grid.to_owned()))
            .collect();

        // free-variable labels: drop both swept indices from the full name
        // list, highest index first so the second removal does not shift
        let mut free_names: Vec<String> =
            variables.iter().map(|var| var.name.clone()).collect();
        let mut swept = [
            result.axes[0].variable_index,
            result.axes[1].variable_index,
        ];
        swept.sort_unstable();
        free_names.remove(swept[1]);
        free_names.remove(swept[0]);
        let free_grids = free_names
            .into_iter()
            .zip(result.free_variables.axis_iter(Axis(0)))
            .map(|(name, grid)| (name, grid.to_owned()))
            .collect();

        SurfaceSet {
            axes: result.axes.clone(),
            objective: Surface {
                name: objective.name.clone(),
                values: result.objective.clone(),
            },
            constraints: constraint_grids,
            free_variables: free_grids,
            status: result.status.clone(),
        }
    }
}
