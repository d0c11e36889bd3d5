//! Module providing the specification of the swept objective

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Specification of the objective being swept
///
/// The backend reports the objective in scaled space; the engine multiplies
/// stored grid values by `scale` to recover raw units.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct ObjectiveSpec {
    /// Objective name, used for surface labeling
    #[builder(setter(into))]
    pub name: String,
    /// Normalization factor; `raw = scaled * scale`, never zero
    #[builder(default = "1.0")]
    pub scale: f64,
}
