//! Well-known gates that catalog entries may refer to by name.

use qmap_ir::Matrix;
use std::f64::consts::{FRAC_PI_2, PI};

/// A fixed gate with a known matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    SDag,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    TDag,

    // Fixed-angle rotations
    /// Rx(pi/2).
    Rx90,
    /// Rx(-pi/2).
    RxM90,
    /// Rx(pi).
    Rx180,
    /// Ry(pi/2).
    Ry90,
    /// Ry(-pi/2).
    RyM90,
    /// Ry(pi).
    Ry180,
    /// Rz(pi/2).
    Rz90,
    /// Rz(-pi/2).
    RzM90,
    /// Rz(pi).
    Rz180,

    /// Phase flip `diag(1, -1)`.
    Phase,

    // Two-qubit gates
    /// SWAP gate.
    Swap,
    /// Square root of SWAP.
    SqSwap,
}

impl PredefinedGate {
    /// All predefined gates, in declaration order.
    pub const ALL: [PredefinedGate; 21] = [
        PredefinedGate::I,
        PredefinedGate::X,
        PredefinedGate::Y,
        PredefinedGate::Z,
        PredefinedGate::H,
        PredefinedGate::S,
        PredefinedGate::SDag,
        PredefinedGate::T,
        PredefinedGate::TDag,
        PredefinedGate::Rx90,
        PredefinedGate::RxM90,
        PredefinedGate::Rx180,
        PredefinedGate::Ry90,
        PredefinedGate::RyM90,
        PredefinedGate::Ry180,
        PredefinedGate::Rz90,
        PredefinedGate::RzM90,
        PredefinedGate::Rz180,
        PredefinedGate::Phase,
        PredefinedGate::Swap,
        PredefinedGate::SqSwap,
    ];

    /// Get the type name used in catalog descriptions.
    pub fn name(&self) -> &'static str {
        match self {
            PredefinedGate::I => "i",
            PredefinedGate::X => "x",
            PredefinedGate::Y => "y",
            PredefinedGate::Z => "z",
            PredefinedGate::H => "h",
            PredefinedGate::S => "s",
            PredefinedGate::SDag => "s_dag",
            PredefinedGate::T => "t",
            PredefinedGate::TDag => "t_dag",
            PredefinedGate::Rx90 => "rx_90",
            PredefinedGate::RxM90 => "rx_m90",
            PredefinedGate::Rx180 => "rx_180",
            PredefinedGate::Ry90 => "ry_90",
            PredefinedGate::RyM90 => "ry_m90",
            PredefinedGate::Ry180 => "ry_180",
            PredefinedGate::Rz90 => "rz_90",
            PredefinedGate::RzM90 => "rz_m90",
            PredefinedGate::Rz180 => "rz_180",
            PredefinedGate::Phase => "phase",
            PredefinedGate::Swap => "swap",
            PredefinedGate::SqSwap => "sqswap",
        }
    }

    /// Look up a predefined gate by type name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|gate| gate.name() == name)
    }

    /// Get the number of target qubits.
    pub fn num_qubits(&self) -> usize {
        match self {
            PredefinedGate::Swap | PredefinedGate::SqSwap => 2,
            _ => 1,
        }
    }

    /// Get the gate's matrix.
    pub fn matrix(&self) -> Matrix {
        match self {
            PredefinedGate::I => Matrix::identity(1),
            PredefinedGate::X => Matrix::x(),
            PredefinedGate::Y => Matrix::y(),
            PredefinedGate::Z => Matrix::z(),
            PredefinedGate::H => Matrix::h(),
            PredefinedGate::S => Matrix::s(),
            PredefinedGate::SDag => Matrix::sdg(),
            PredefinedGate::T => Matrix::t(),
            PredefinedGate::TDag => Matrix::tdg(),
            PredefinedGate::Rx90 => Matrix::rx(FRAC_PI_2),
            PredefinedGate::RxM90 => Matrix::rx(-FRAC_PI_2),
            PredefinedGate::Rx180 => Matrix::rx(PI),
            PredefinedGate::Ry90 => Matrix::ry(FRAC_PI_2),
            PredefinedGate::RyM90 => Matrix::ry(-FRAC_PI_2),
            PredefinedGate::Ry180 => Matrix::ry(PI),
            PredefinedGate::Rz90 => Matrix::rz(FRAC_PI_2),
            PredefinedGate::RzM90 => Matrix::rz(-FRAC_PI_2),
            PredefinedGate::Rz180 => Matrix::rz(PI),
            PredefinedGate::Phase => Matrix::phase(PI),
            PredefinedGate::Swap => Matrix::swap(),
            PredefinedGate::SqSwap => Matrix::sqswap(),
        }
    }
}

/// Rotation axis of a parameterized gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationAxis {
    /// Rx(theta).
    X,
    /// Ry(theta).
    Y,
    /// Rz(theta).
    Z,
}

impl RotationAxis {
    /// Look up the axis for a parameterized type name (`rx`, `ry`, `rz`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rx" => Some(RotationAxis::X),
            "ry" => Some(RotationAxis::Y),
            "rz" => Some(RotationAxis::Z),
            _ => None,
        }
    }

    /// Get the type name.
    pub fn name(&self) -> &'static str {
        match self {
            RotationAxis::X => "rx",
            RotationAxis::Y => "ry",
            RotationAxis::Z => "rz",
        }
    }

    /// Rotation matrix for the given angle.
    pub fn matrix(&self, theta: f64) -> Matrix {
        match self {
            RotationAxis::X => Matrix::rx(theta),
            RotationAxis::Y => Matrix::ry(theta),
            RotationAxis::Z => Matrix::rz(theta),
        }
    }

    /// Recover the rotation angle from a single-qubit matrix.
    ///
    /// With `ignore_global_phase` the matrix may differ from the rotation by
    /// a global phase and the angle is returned in `(-pi, pi]`. Without it
    /// the match is exact; since `R(theta + 2pi) = -R(theta)` the angle then
    /// lies in `(-2pi, 2pi]`. Either way the angle is only returned if
    /// rebuilding the rotation reproduces the matrix within `epsilon`.
    pub fn extract_angle(
        &self,
        matrix: &Matrix,
        epsilon: f64,
        ignore_global_phase: bool,
    ) -> Option<f64> {
        if matrix.num_qubits() != 1 {
            return None;
        }
        let candidate = match self {
            RotationAxis::X | RotationAxis::Y => {
                2.0 * matrix.get(1, 0).norm().atan2(matrix.get(0, 0).norm())
            }
            RotationAxis::Z => {
                let m00 = matrix.get(0, 0);
                if m00.norm() <= epsilon {
                    return None;
                }
                (matrix.get(1, 1) / m00).arg()
            }
        };
        let candidates = [candidate, -candidate].map(normalize_angle);
        if ignore_global_phase {
            return candidates
                .into_iter()
                .find(|&theta| self.matrix(theta).approx_eq(matrix, epsilon, true));
        }
        candidates
            .into_iter()
            .flat_map(|theta| [theta, if theta > 0.0 { theta - 2.0 * PI } else { theta + 2.0 * PI }])
            .find(|&theta| self.matrix(theta).approx_eq(matrix, epsilon, false))
    }
}

/// Wrap an angle into `(-pi, pi]`.
pub(crate) fn normalize_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(2.0 * PI);
    if wrapped > PI { wrapped - 2.0 * PI } else { wrapped }
}
