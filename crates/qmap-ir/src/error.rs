//! Error types for the IR crate.

use crate::qubit::QubitRef;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Matrix entry count is not a power of four (at least one qubit).
    #[error("matrix has invalid size: {len} entries is not 4^n for n >= 1")]
    InvalidMatrixSize {
        /// Number of entries supplied.
        len: usize,
    },

    /// A matrix column has zero norm and cannot be normalized.
    #[error("matrix column {column} has zero norm")]
    ZeroNormColumn {
        /// Index of the offending column.
        column: usize,
    },

    /// Matrix is not unitary within the requested tolerance.
    #[error("matrix is not unitary")]
    NotUnitary,

    /// Gate operand count does not match the matrix.
    #[error("gate requires {expected} target qubit(s), got {got}")]
    QubitCountMismatch {
        /// Qubits implied by the matrix.
        expected: usize,
        /// Qubits actually supplied.
        got: usize,
    },

    /// The same qubit appears more than once in a gate.
    #[error("duplicate qubit {0} in gate operands")]
    DuplicateQubit(QubitRef),

    /// A gate was constructed without any operand.
    #[error("gate has no operands")]
    EmptyOperands,
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
