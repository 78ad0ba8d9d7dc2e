//! Error types for the gate catalog.

use thiserror::Error;

/// Errors that can occur while building or querying a gate catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    /// A gate could not be translated in the requested direction.
    #[error("unknown gate: {0}")]
    UnknownGate(String),

    /// A catalog entry is malformed or its matrix is not unitary.
    #[error("while parsing gatemap entry for {name}: {reason}")]
    Validation {
        /// Identifier of the offending entry.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The catalog description is not a JSON object.
    #[error("gatemap description must be a JSON object")]
    NotAnObject,

    /// A descriptor's angle does not match its family.
    #[error("gate {name} {}", if *.expected { "requires an angle" } else { "does not take an angle" })]
    AngleMismatch {
        /// Identifier of the gate.
        name: String,
        /// Whether the family expects an angle.
        expected: bool,
    },

    /// A descriptor's qubits do not fit the registered gate.
    #[error("failed to construct gate {name}: {source}")]
    InvalidOperands {
        /// Identifier of the gate.
        name: String,
        /// Underlying IR error.
        #[source]
        source: qmap_ir::IrError,
    },

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// File could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub(crate) fn validation(name: &str, reason: impl Into<String>) -> Self {
        CatalogError::Validation {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
