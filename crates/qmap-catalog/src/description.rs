//! Gatemap description format.
//!
//! A gatemap is a JSON object from gate identifier to description. Each
//! description is either a shorthand string naming a gate type, optionally
//! prefixed with `c-` once per control qubit, or an explicit object:
//!
//! ```json
//! {
//!     "x90": "rx_90",
//!     "cnot": "c-x",
//!     "toffoli": "C-C-X",
//!     "measz": "measure",
//!     "measx": { "type": "measure", "basis": "x", "parallel": true },
//!     "sq": { "type": "unitary", "matrix": [[1,0],[0,0],[0,0],[0,1]] }
//! }
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogError, CatalogResult};

/// Marker prepended once per control qubit in shorthand descriptions.
pub const CONTROL_PREFIX: &str = "c-";

/// A single gatemap entry as written in the description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GateDescription {
    /// Type name, optionally control-prefixed.
    Shorthand(String),
    /// Explicit object form.
    Explicit(ExplicitDescription),
}

/// Explicit object form of a gatemap entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplicitDescription {
    /// Gate type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Row-major matrix entries as `[re, im]` pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Complex64>>,
    /// Measurement or prep basis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<String>,
    /// Number of control qubits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controlled: Option<usize>,
    /// Expand multi-qubit uses into one gate per qubit.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub parallel: bool,
}

impl GateDescription {
    /// Parse one entry, naming it in any error.
    pub fn from_value(name: &str, value: &Value) -> CatalogResult<Self> {
        match value {
            Value::String(text) => Ok(GateDescription::Shorthand(text.clone())),
            Value::Object(_) => serde_json::from_value(value.clone())
                .map(GateDescription::Explicit)
                .map_err(|e| CatalogError::validation(name, e.to_string())),
            _ => Err(CatalogError::validation(
                name,
                "entry must be a string or an object",
            )),
        }
    }

    /// Desugar shorthand into the explicit form.
    ///
    /// The type name is lowercased and `c-` prefixes are counted into
    /// `controlled`.
    pub fn desugar(self) -> ExplicitDescription {
        match self {
            GateDescription::Shorthand(text) => {
                let mut rest = text.trim().to_ascii_lowercase();
                let mut controls = 0;
                while let Some(stripped) = rest.strip_prefix(CONTROL_PREFIX) {
                    rest = stripped.to_string();
                    controls += 1;
                }
                ExplicitDescription {
                    kind: rest,
                    matrix: None,
                    basis: None,
                    controlled: (controls > 0).then_some(controls),
                    parallel: false,
                }
            }
            GateDescription::Explicit(mut explicit) => {
                explicit.kind = explicit.kind.trim().to_ascii_lowercase();
                explicit
            }
        }
    }
}

impl From<&str> for GateDescription {
    fn from(text: &str) -> Self {
        GateDescription::Shorthand(text.to_string())
    }
}
