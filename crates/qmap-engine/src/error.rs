//! Error types for the mapping engine.

use qmap_catalog::CatalogError;
use std::fmt;
use thiserror::Error;

/// Identity space in which a lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QubitSpace {
    /// Upstream qubit indices.
    Upstream,
    /// Virtual qubit indices.
    Virtual,
    /// Physical qubit indices.
    Physical,
}

impl fmt::Display for QubitSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QubitSpace::Upstream => write!(f, "upstream"),
            QubitSpace::Virtual => write!(f, "virtual"),
            QubitSpace::Physical => write!(f, "physical"),
        }
    }
}

/// Errors that can occur while mapping.
///
/// All of them are fatal to the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// No catalog entry matches the gate, or the identifier is unknown.
    #[error("Unknown gate: {0}")]
    UnknownGate(String),

    /// A qubit index has no mapping to the next identity space.
    #[error("Missing mapping from {space} qubit {index}")]
    UnmappedResource {
        /// Space of the index that could not be translated.
        space: QubitSpace,
        /// The index.
        index: u32,
    },

    /// More live qubits were requested than the platform provides.
    #[error("Too many live qubits: the platform has {capacity}")]
    CapacityExceeded {
        /// Number of physical qubits.
        capacity: u32,
    },

    /// The gatemap could not be built or a descriptor could not be constructed.
    #[error("Gatemap error: {0}")]
    Catalog(#[source] CatalogError),

    /// A required startup parameter is absent.
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// Configuration value is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Platform description is invalid.
    #[error("Platform error: {0}")]
    Platform(String),

    /// The routing oracle failed or returned an invalid assignment.
    #[error("Routing error: {0}")]
    Routing(String),

    /// The downstream consumer rejected a request.
    #[error("Downstream error: {0}")]
    Downstream(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// File could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CatalogError> for EngineError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownGate(gate) => EngineError::UnknownGate(gate),
            other => EngineError::Catalog(other),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
