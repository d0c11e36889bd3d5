//! Module providing the specification of one design variable

use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Specification of one design variable
///
/// Owned by the external problem; the sweep core only reads it.
///
/// # Examples
/// ```rust
/// use carpet_sweep::optimize::variable::VariableSpecBuilder;
/// let span = VariableSpecBuilder::default()
///     .name("wing_span")
///     .initial_value(30.0)
///     .lower_bound(20.0)
///     .upper_bound(40.0)
///     .scale(10.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct VariableSpec {
    /// Unique variable name
    #[builder(setter(into))]
    pub name: String,
    /// Starting value handed to the backend (raw units)
    pub initial_value: f64,
    /// Lowest allowed value (raw units)
    pub lower_bound: f64,
    /// Highest allowed value (raw units)
    pub upper_bound: f64,
    /// Normalization factor; `raw = scaled * scale`, never zero
    #[builder(default = "1.0")]
    pub scale: f64,
    /// Kind of variable, see [`VariableKind`]
    #[builder(default)]
    pub kind: VariableKind,
}

/// Represents the kind of a design variable
///
/// # Notes:
/// Only continuous variables are currently active; the backends this core
/// targets treat every declared variable as continuous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableKind {
    /// Continuous variable
    #[default]
    Continuous,
}

impl Display for VariableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableKind::Continuous => write!(f, "CONTINUOUS"),
        }
    }
}

impl Display for VariableSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} in [{}, {}]",
            self.name, self.kind, self.lower_bound, self.upper_bound
        )
    }
}
