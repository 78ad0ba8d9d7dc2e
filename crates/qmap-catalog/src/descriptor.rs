//! Named gate descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A gate expressed by catalog identifier, qubit indices and an optional angle.
///
/// Qubits are plain indices so the same descriptor can travel through every
/// identity space. For unitaries they are listed controls first, then
/// targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDescriptor {
    /// Catalog identifier.
    pub name: String,
    /// Ordered qubit indices.
    pub qubits: Vec<u32>,
    /// Rotation angle, present exactly for parameterized gates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

impl GateDescriptor {
    /// Create a descriptor without an angle.
    pub fn new(name: impl Into<String>, qubits: impl IntoIterator<Item = u32>) -> Self {
        Self {
            name: name.into(),
            qubits: qubits.into_iter().collect(),
            angle: None,
        }
    }

    /// Attach an angle.
    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = Some(angle);
        self
    }

    /// Rewrite every qubit index through `f`, failing on the first miss.
    pub fn try_map_qubits<E>(&self, mut f: impl FnMut(u32) -> Result<u32, E>) -> Result<Self, E> {
        let qubits = self
            .qubits
            .iter()
            .map(|&q| f(q))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self {
            name: self.name.clone(),
            qubits,
            angle: self.angle,
        })
    }

    /// Split into one single-qubit descriptor per qubit, in order.
    pub fn split_per_qubit(self) -> impl Iterator<Item = GateDescriptor> {
        let Self {
            name,
            qubits,
            angle,
        } = self;
        qubits.into_iter().map(move |q| GateDescriptor {
            name: name.clone(),
            qubits: vec![q],
            angle,
        })
    }
}

impl fmt::Display for GateDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(angle) = self.angle {
            write!(f, "({angle})")?;
        }
        for (i, q) in self.qubits.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{q}")?;
        }
        Ok(())
    }
}
