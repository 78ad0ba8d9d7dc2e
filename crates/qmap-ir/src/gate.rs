//! Canonical gate representation.
//!
//! A canonical gate is described by what it does (a matrix or a measurement
//! basis) rather than by a name. Operands are split the same way on both
//! sides of the operator: control qubits, target qubits, and qubits whose
//! measurement the gate requests.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;

use crate::error::{IrError, IrResult};
use crate::matrix::Matrix;
use crate::qubit::QubitRef;

/// Pauli basis used by measurement and prep gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PauliBasis {
    /// X basis.
    X,
    /// Y basis.
    Y,
    /// Z (computational) basis.
    Z,
}

impl PauliBasis {
    /// Parse a basis name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "x" => Some(PauliBasis::X),
            "y" => Some(PauliBasis::Y),
            "z" => Some(PauliBasis::Z),
            _ => None,
        }
    }

    /// Basis-change matrix whose columns are the basis eigenvectors.
    pub fn matrix(self) -> Matrix {
        let s = FRAC_1_SQRT_2;
        match self {
            PauliBasis::X => Matrix::h(),
            PauliBasis::Y => Matrix::from_array([
                Complex64::new(s, 0.0),
                Complex64::new(s, 0.0),
                Complex64::new(0.0, s),
                Complex64::new(0.0, -s),
            ]),
            PauliBasis::Z => Matrix::identity(1),
        }
    }
}

/// What a canonical gate does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    /// Unitary on the target qubits, controlled by the control qubits.
    Unitary {
        /// Matrix acting on the targets only.
        matrix: Matrix,
    },
    /// Measurement of the measured qubits in the given basis.
    Measurement {
        /// Single-qubit basis-change matrix.
        basis: Matrix,
    },
    /// State preparation of the target qubits in the given basis.
    Prep {
        /// Single-qubit basis-change matrix.
        basis: Matrix,
    },
}

impl GateKind {
    /// Short name of the kind, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Unitary { .. } => "unitary",
            GateKind::Measurement { .. } => "measurement",
            GateKind::Prep { .. } => "prep",
        }
    }

    /// The matrix or basis carried by this kind.
    pub fn matrix(&self) -> &Matrix {
        match self {
            GateKind::Unitary { matrix } => matrix,
            GateKind::Measurement { basis } | GateKind::Prep { basis } => basis,
        }
    }
}

/// A canonical gate with its operands.
///
/// Deserialization applies the same checks as the constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGate")]
pub struct Gate {
    /// What the gate does.
    pub kind: GateKind,
    /// Target qubits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<QubitRef>,
    /// Control qubits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<QubitRef>,
    /// Qubits whose measurement result is requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measures: Vec<QubitRef>,
}

impl Gate {
    /// Create a (possibly controlled) unitary gate.
    pub fn unitary(
        targets: impl IntoIterator<Item = QubitRef>,
        controls: impl IntoIterator<Item = QubitRef>,
        matrix: Matrix,
    ) -> IrResult<Self> {
        let gate = Self {
            kind: GateKind::Unitary { matrix },
            targets: targets.into_iter().collect(),
            controls: controls.into_iter().collect(),
            measures: vec![],
        };
        gate.validate()?;
        Ok(gate)
    }

    /// Create a measurement gate.
    pub fn measure(qubits: impl IntoIterator<Item = QubitRef>, basis: Matrix) -> IrResult<Self> {
        Self::single_qubit_basis(basis, vec![], qubits.into_iter().collect(), |basis| {
            GateKind::Measurement { basis }
        })
    }

    /// Create a prep gate.
    pub fn prep(qubits: impl IntoIterator<Item = QubitRef>, basis: Matrix) -> IrResult<Self> {
        Self::single_qubit_basis(basis, qubits.into_iter().collect(), vec![], |basis| {
            GateKind::Prep { basis }
        })
    }

    fn single_qubit_basis(
        basis: Matrix,
        targets: Vec<QubitRef>,
        measures: Vec<QubitRef>,
        kind: impl FnOnce(Matrix) -> GateKind,
    ) -> IrResult<Self> {
        let gate = Self {
            kind: kind(basis),
            targets,
            controls: vec![],
            measures,
        };
        gate.validate()?;
        Ok(gate)
    }

    /// Check that the matrix fits the operands, then [`Gate::check_operands`].
    ///
    /// A unitary needs one target per matrix qubit; measurement and prep
    /// bases are single-qubit.
    pub fn validate(&self) -> IrResult<()> {
        let (expected, got) = match &self.kind {
            GateKind::Unitary { matrix } => (matrix.num_qubits(), self.targets.len()),
            GateKind::Measurement { basis } | GateKind::Prep { basis } => (1, basis.num_qubits()),
        };
        if expected != got {
            return Err(IrError::QubitCountMismatch { expected, got });
        }
        self.check_operands()
    }

    /// Reject empty operand lists and qubits appearing twice.
    pub fn check_operands(&self) -> IrResult<()> {
        let mut seen = rustc_hash::FxHashSet::default();
        let mut any = false;
        for qubit in self.operands() {
            any = true;
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit(qubit));
            }
        }
        if any { Ok(()) } else { Err(IrError::EmptyOperands) }
    }

    /// All operands in canonical order: controls, targets, then measures.
    pub fn operands(&self) -> impl Iterator<Item = QubitRef> + '_ {
        self.controls
            .iter()
            .chain(&self.targets)
            .chain(&self.measures)
            .copied()
    }

    /// Whether the gate requests measurement results.
    #[inline]
    pub fn has_measures(&self) -> bool {
        !self.measures.is_empty()
    }

    /// Number of control qubits.
    #[inline]
    pub fn num_controls(&self) -> usize {
        self.controls.len()
    }
}

/// Unchecked wire form of [`Gate`].
#[derive(Deserialize)]
struct RawGate {
    kind: GateKind,
    #[serde(default)]
    targets: Vec<QubitRef>,
    #[serde(default)]
    controls: Vec<QubitRef>,
    #[serde(default)]
    measures: Vec<QubitRef>,
}

impl TryFrom<RawGate> for Gate {
    type Error = IrError;

    fn try_from(raw: RawGate) -> IrResult<Self> {
        let gate = Gate {
            kind: raw.kind,
            targets: raw.targets,
            controls: raw.controls,
            measures: raw.measures,
        };
        gate.validate()?;
        Ok(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unitary_operand_count() {
        let err = Gate::unitary([QubitRef(1), QubitRef(2)], [], Matrix::x()).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 1,
                got: 2
            }
        ));
    }

    #[test]
    fn test_duplicate_operand() {
        let err = Gate::unitary([QubitRef(1)], [QubitRef(1)], Matrix::x()).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit(QubitRef(1))));
    }

    #[test]
    fn test_measure_gate() {
        let gate = Gate::measure([QubitRef(3), QubitRef(4)], PauliBasis::Z.matrix()).unwrap();
        assert!(gate.has_measures());
        assert!(gate.targets.is_empty());
        assert_eq!(
            gate.operands().collect::<Vec<_>>(),
            vec![QubitRef(3), QubitRef(4)]
        );
        assert!(Gate::measure([], PauliBasis::Z.matrix()).is_err());
    }

    #[test]
    fn test_basis_matrices_unitary() {
        for basis in [PauliBasis::X, PauliBasis::Y, PauliBasis::Z] {
            assert!(basis.matrix().is_unitary(1e-9));
        }
        assert_eq!(PauliBasis::from_name("Y"), Some(PauliBasis::Y));
        assert_eq!(PauliBasis::from_name("w"), None);
    }

    #[test]
    fn test_gate_json() {
        let gate = Gate::unitary([QubitRef(2)], [QubitRef(1)], Matrix::x()).unwrap();
        let json = serde_json::to_value(&gate).unwrap();
        assert_eq!(json["controls"], serde_json::json!([1]));
        assert!(json.get("measures").is_none());
        let back: Gate = serde_json::from_value(json).unwrap();
        assert_eq!(back, gate);
    }

    #[test]
    fn test_gate_json_is_validated() {
        let x = serde_json::json!({ "unitary": { "matrix": [[0, 0], [1, 0], [1, 0], [0, 0]] } });
        let z_basis = serde_json::json!({ "measurement": { "basis": [[1, 0], [0, 0], [0, 0], [1, 0]] } });

        let err = serde_json::from_value::<Gate>(serde_json::json!({ "kind": x })).unwrap_err();
        assert!(err.to_string().contains("no operands"), "{err}");

        let err = serde_json::from_value::<Gate>(
            serde_json::json!({ "kind": x, "targets": [1, 2] }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("requires 1"), "{err}");

        assert!(
            serde_json::from_value::<Gate>(
                serde_json::json!({ "kind": x, "targets": [3], "controls": [3] }),
            )
            .is_err()
        );
        assert!(
            serde_json::from_value::<Gate>(
                serde_json::json!({ "kind": z_basis, "measures": [4, 4] }),
            )
            .is_err()
        );
        assert!(
            serde_json::from_value::<Gate>(
                serde_json::json!({ "kind": z_basis, "measures": [4, 5] }),
            )
            .is_ok()
        );
    }
}
