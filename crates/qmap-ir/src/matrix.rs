//! Dense complex matrices for gate descriptions.
//!
//! Matrices are square with side `2^n`, stored row-major. Construction only
//! validates the shape; normalization and the unitarity check are explicit
//! steps so that callers can report which one failed.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use crate::error::{IrError, IrResult};

/// A `2^n x 2^n` complex matrix in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Complex64>", into = "Vec<Complex64>")]
pub struct Matrix {
    num_qubits: usize,
    data: Vec<Complex64>,
}

#[inline]
fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

impl Matrix {
    /// Create a matrix from row-major entries.
    ///
    /// The entry count must be `4^n` for some `n >= 1`.
    pub fn new(data: Vec<Complex64>) -> IrResult<Self> {
        let mut len = data.len();
        let mut num_qubits = 0;
        while len > 1 {
            if len & 3 != 0 {
                return Err(IrError::InvalidMatrixSize { len: data.len() });
            }
            len >>= 2;
            num_qubits += 1;
        }
        if num_qubits == 0 {
            return Err(IrError::InvalidMatrixSize { len: data.len() });
        }
        Ok(Self { num_qubits, data })
    }

    pub(crate) fn from_array<const N: usize>(entries: [Complex64; N]) -> Self {
        let num_qubits = (N.trailing_zeros() / 2) as usize;
        Self {
            num_qubits,
            data: entries.to_vec(),
        }
    }

    /// Number of qubits the matrix acts on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Side length of the matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        1 << self.num_qubits
    }

    /// Row-major entries.
    #[inline]
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim() + col]
    }

    /// Scale every column to unit norm.
    pub fn normalize_columns(&mut self) -> IrResult<()> {
        let dim = self.dim();
        for col in 0..dim {
            let norm = (0..dim)
                .map(|row| self.data[row * dim + col].norm_sqr())
                .sum::<f64>()
                .sqrt();
            if norm <= f64::EPSILON {
                return Err(IrError::ZeroNormColumn { column: col });
            }
            for row in 0..dim {
                self.data[row * dim + col] /= norm;
            }
        }
        Ok(())
    }

    /// Check `M^dagger M = I` entry-wise within `epsilon`.
    pub fn is_unitary(&self, epsilon: f64) -> bool {
        let dim = self.dim();
        for i in 0..dim {
            for j in 0..dim {
                let dot: Complex64 = (0..dim).map(|r| self.get(r, i).conj() * self.get(r, j)).sum();
                let expected = if i == j { c(1.0, 0.0) } else { c(0.0, 0.0) };
                if (dot - expected).norm() > epsilon {
                    return false;
                }
            }
        }
        true
    }

    /// Validate unitarity, returning an error when it does not hold.
    pub fn ensure_unitary(&self, epsilon: f64) -> IrResult<()> {
        if self.is_unitary(epsilon) {
            Ok(())
        } else {
            Err(IrError::NotUnitary)
        }
    }

    /// Compare two matrices entry-wise within `epsilon`.
    ///
    /// With `ignore_global_phase`, `other` is first rotated by the phase
    /// that aligns its largest-magnitude entry with the same entry of `self`.
    pub fn approx_eq(&self, other: &Self, epsilon: f64, ignore_global_phase: bool) -> bool {
        if self.num_qubits != other.num_qubits {
            return false;
        }
        let phase = if ignore_global_phase {
            match self.relative_phase(other, epsilon) {
                Some(phase) => phase,
                None => return false,
            }
        } else {
            c(1.0, 0.0)
        };
        self.data
            .iter()
            .zip(&other.data)
            .all(|(a, b)| (a - b * phase).norm() <= epsilon)
    }

    /// Compare two basis-change matrices column by column within `epsilon`.
    ///
    /// Each column is a basis vector defined up to its own phase, so every
    /// column of `other` is aligned separately before comparing.
    pub fn basis_eq(&self, other: &Self, epsilon: f64) -> bool {
        if self.num_qubits != other.num_qubits {
            return false;
        }
        let dim = self.dim();
        (0..dim).all(|col| {
            let Some(pivot_row) = (0..dim)
                .max_by(|&a, &b| other.get(a, col).norm().total_cmp(&other.get(b, col).norm()))
            else {
                return false;
            };
            let pivot = other.get(pivot_row, col);
            let phase = if pivot.norm() <= epsilon {
                c(1.0, 0.0)
            } else {
                let ratio = self.get(pivot_row, col) / pivot;
                if (ratio.norm() - 1.0).abs() > epsilon {
                    return false;
                }
                ratio / ratio.norm()
            };
            (0..dim).all(|row| (self.get(row, col) - other.get(row, col) * phase).norm() <= epsilon)
        })
    }

    /// Unit phase `p` such that `self ≈ p * other`, if the magnitudes agree.
    fn relative_phase(&self, other: &Self, epsilon: f64) -> Option<Complex64> {
        let (index, pivot) = other
            .data
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))?;
        if pivot.norm() <= epsilon {
            return Some(c(1.0, 0.0));
        }
        let ratio = self.data[index] / pivot;
        if (ratio.norm() - 1.0).abs() > epsilon {
            return None;
        }
        Some(ratio / ratio.norm())
    }

    /// Identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        let dim = 1usize << num_qubits;
        let mut data = vec![c(0.0, 0.0); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = c(1.0, 0.0);
        }
        Self { num_qubits, data }
    }

    /// Pauli-X.
    pub fn x() -> Self {
        Self::from_array([c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)])
    }

    /// Pauli-Y.
    pub fn y() -> Self {
        Self::from_array([c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)])
    }

    /// Pauli-Z.
    pub fn z() -> Self {
        Self::from_array([c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(-1.0, 0.0)])
    }

    /// Hadamard.
    pub fn h() -> Self {
        let s = FRAC_1_SQRT_2;
        Self::from_array([c(s, 0.0), c(s, 0.0), c(s, 0.0), c(-s, 0.0)])
    }

    /// S gate (sqrt(Z)).
    pub fn s() -> Self {
        Self::phase(FRAC_PI_2)
    }

    /// S-dagger gate.
    pub fn sdg() -> Self {
        Self::phase(-FRAC_PI_2)
    }

    /// T gate (fourth root of Z).
    pub fn t() -> Self {
        Self::phase(FRAC_PI_4)
    }

    /// T-dagger gate.
    pub fn tdg() -> Self {
        Self::phase(-FRAC_PI_4)
    }

    /// Rotation around X.
    pub fn rx(theta: f64) -> Self {
        let (s, co) = (theta / 2.0).sin_cos();
        Self::from_array([c(co, 0.0), c(0.0, -s), c(0.0, -s), c(co, 0.0)])
    }

    /// Rotation around Y.
    pub fn ry(theta: f64) -> Self {
        let (s, co) = (theta / 2.0).sin_cos();
        Self::from_array([c(co, 0.0), c(-s, 0.0), c(s, 0.0), c(co, 0.0)])
    }

    /// Rotation around Z.
    pub fn rz(theta: f64) -> Self {
        Self::from_array([
            Complex64::from_polar(1.0, -theta / 2.0),
            c(0.0, 0.0),
            c(0.0, 0.0),
            Complex64::from_polar(1.0, theta / 2.0),
        ])
    }

    /// Phase gate `diag(1, e^(i*lambda))`.
    pub fn phase(lambda: f64) -> Self {
        Self::from_array([
            c(1.0, 0.0),
            c(0.0, 0.0),
            c(0.0, 0.0),
            Complex64::from_polar(1.0, lambda),
        ])
    }

    /// Two-qubit SWAP.
    pub fn swap() -> Self {
        let o = c(0.0, 0.0);
        let l = c(1.0, 0.0);
        Self::from_array([l, o, o, o, o, o, l, o, o, l, o, o, o, o, o, l])
    }

    /// Square root of SWAP.
    pub fn sqswap() -> Self {
        let o = c(0.0, 0.0);
        let l = c(1.0, 0.0);
        let p = c(0.5, 0.5);
        let m = c(0.5, -0.5);
        Self::from_array([l, o, o, o, o, p, m, o, o, m, p, o, o, o, o, l])
    }
}

impl TryFrom<Vec<Complex64>> for Matrix {
    type Error = IrError;

    fn try_from(data: Vec<Complex64>) -> IrResult<Self> {
        Matrix::new(data)
    }
}

impl From<Matrix> for Vec<Complex64> {
    fn from(matrix: Matrix) -> Self {
        matrix.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_size_validation() {
        assert!(Matrix::new(vec![c(1.0, 0.0); 4]).is_ok());
        assert!(Matrix::new(vec![c(1.0, 0.0); 16]).is_ok());
        assert!(matches!(
            Matrix::new(vec![c(1.0, 0.0); 8]),
            Err(IrError::InvalidMatrixSize { len: 8 })
        ));
        assert!(matches!(
            Matrix::new(vec![c(1.0, 0.0)]),
            Err(IrError::InvalidMatrixSize { len: 1 })
        ));
        assert_eq!(Matrix::new(vec![c(0.0, 0.0); 64]).unwrap().num_qubits(), 3);
    }

    #[test]
    fn test_predefined_are_unitary() {
        for m in [
            Matrix::identity(2),
            Matrix::x(),
            Matrix::y(),
            Matrix::z(),
            Matrix::h(),
            Matrix::s(),
            Matrix::tdg(),
            Matrix::rx(0.3),
            Matrix::ry(-1.2),
            Matrix::rz(2.5),
            Matrix::swap(),
            Matrix::sqswap(),
        ] {
            assert!(m.is_unitary(EPS), "{m:?} should be unitary");
        }
    }

    #[test]
    fn test_normalize_columns() {
        let mut m = Matrix::new(vec![c(2.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 3.0)]).unwrap();
        assert!(!m.is_unitary(EPS));
        m.normalize_columns().unwrap();
        assert!(m.is_unitary(EPS));
        assert!((m.get(1, 1) - c(0.0, 1.0)).norm() < EPS);
    }

    #[test]
    fn test_zero_norm_column() {
        let mut m = Matrix::new(vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)]).unwrap();
        assert!(matches!(
            m.normalize_columns(),
            Err(IrError::ZeroNormColumn { column: 1 })
        ));
    }

    #[test]
    fn test_not_unitary_after_normalization() {
        let mut m = Matrix::new(vec![c(1.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(1.0, 0.0)]).unwrap();
        m.normalize_columns().unwrap();
        assert!(matches!(m.ensure_unitary(1e-6), Err(IrError::NotUnitary)));
    }

    #[test]
    fn test_global_phase_comparison() {
        // Rx(pi) = -iX
        let rx_pi = Matrix::rx(PI);
        assert!(!rx_pi.approx_eq(&Matrix::x(), EPS, false));
        assert!(rx_pi.approx_eq(&Matrix::x(), EPS, true));
        assert!(!Matrix::x().approx_eq(&Matrix::y(), EPS, true));
        assert!(!Matrix::x().approx_eq(&Matrix::swap(), EPS, true));
    }

    #[test]
    fn test_basis_comparison_per_column() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        // Z basis with the |1> column negated.
        assert!(Matrix::identity(1).basis_eq(&Matrix::z(), EPS));
        assert!(!Matrix::identity(1).approx_eq(&Matrix::z(), EPS, true));

        // X basis with independently phased columns.
        let phased = Matrix::new(vec![c(0.0, s), c(-s, 0.0), c(0.0, s), c(s, 0.0)]).unwrap();
        assert!(Matrix::h().basis_eq(&phased, EPS));

        // Swapped columns are a different basis ordering.
        assert!(!Matrix::identity(1).basis_eq(&Matrix::x(), EPS));
        assert!(!Matrix::identity(1).basis_eq(&Matrix::h(), EPS));
        assert!(!Matrix::identity(1).basis_eq(&Matrix::identity(2), EPS));
    }

    #[test]
    fn test_s_is_quarter_phase() {
        let s2 = Matrix::s();
        assert!((s2.get(1, 1) - c(0.0, 1.0)).norm() < EPS);
        assert!(Matrix::rz(PI / 2.0).approx_eq(&s2, EPS, true));
    }

    #[test]
    fn test_serde_pairs() {
        let json = serde_json::to_string(&Matrix::x()).unwrap();
        assert_eq!(json, "[[0.0,0.0],[1.0,0.0],[1.0,0.0],[0.0,0.0]]");
        let back: Matrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Matrix::x());
        assert!(serde_json::from_str::<Matrix>("[[1.0,0.0],[0.0,0.0]]").is_err());
    }
}
