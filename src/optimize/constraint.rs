//! Module providing constraint specifications and their scaled bounds

use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::optimize::SweepError;

/// Specification of one constraint on the optimization problem
///
/// The edge value is given in raw units; backends consume the scaled form
/// produced by [`ConstraintSpec::scaled_bounds`].
///
/// # Examples
/// ```rust
/// use carpet_sweep::optimize::constraint::{ConstraintOperator, ConstraintSpecBuilder};
/// // fuel_margin > 0, scaled by 1000
/// let margin = ConstraintSpecBuilder::default()
///     .name("fuel_margin")
///     .operator(ConstraintOperator::GreaterThan)
///     .edge_value(0.0)
///     .scale(1000.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct ConstraintSpec {
    /// Unique constraint name
    #[builder(setter(into))]
    pub name: String,
    /// Relation of the constraint value to the edge
    pub operator: ConstraintOperator,
    /// Raw (unscaled) right hand side of the relation
    pub edge_value: f64,
    /// Normalization factor; `raw = scaled * scale`, never zero
    #[builder(default = "1.0")]
    pub scale: f64,
}

impl ConstraintSpec {
    /// Scaled bound pair consumed by backend declaration
    ///
    /// `<` gives `(-inf, edge/scale)`, `>` gives `(edge/scale, +inf)`, and
    /// `=` gives the same scaled edge on both sides.
    pub fn scaled_bounds(&self) -> Result<ConstraintBounds, SweepError> {
        let edge = self.scaled_edge()?;
        Ok(match self.operator {
            ConstraintOperator::LessThan => ConstraintBounds {
                lower: f64::NEG_INFINITY,
                upper: edge,
            },
            ConstraintOperator::GreaterThan => ConstraintBounds {
                lower: edge,
                upper: f64::INFINITY,
            },
            ConstraintOperator::Equal => ConstraintBounds {
                lower: edge,
                upper: edge,
            },
        })
    }

    /// The single scaled edge value, for backends that want one number
    /// instead of a bound pair
    pub fn scaled_edge(&self) -> Result<f64, SweepError> {
        if self.scale == 0.0 {
            return Err(SweepError::InvalidScale {
                name: self.name.clone(),
            });
        }
        Ok(self.edge_value / self.scale)
    }
}

impl Display for ConstraintSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.name, self.operator, self.edge_value)
    }
}

/// Relation of a constraint value to its edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintOperator {
    /// Constraint value must stay below the edge
    LessThan,
    /// Constraint value must stay above the edge
    GreaterThan,
    /// Constraint value must equal the edge
    Equal,
}

impl Display for ConstraintOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintOperator::LessThan => write!(f, "<"),
            ConstraintOperator::GreaterThan => write!(f, ">"),
            ConstraintOperator::Equal => write!(f, "="),
        }
    }
}

/// Scaled lower/upper bound pair for one constraint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstraintBounds {
    pub lower: f64,
    pub upper: f64,
}
