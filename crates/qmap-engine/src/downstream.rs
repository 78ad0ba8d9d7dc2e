//! Downstream consumer contract.

use qmap_ir::{DownstreamQubit, Gate, Measurement, MeasurementValue, QubitRef};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// The consumer of mapped gates.
///
/// Qubit references passed in and out are downstream indices, i.e.
/// physical indices shifted by [`qmap_ir::DOWNSTREAM_OFFSET`].
pub trait Downstream {
    /// Allocate the physical qubits, once, at startup.
    fn allocate(&mut self, num_qubits: u32) -> EngineResult<()>;

    /// Called before the gates of a flushed block are sent.
    fn begin_batch(&mut self, _name: &str) {}

    /// Accept one gate.
    fn gate(&mut self, gate: Gate) -> EngineResult<()>;

    /// Most recent measurement outcome for a qubit.
    fn get_measurement(&self, qubit: QubitRef) -> EngineResult<Measurement>;
}

/// A batch of gates sent together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    /// Name of the flushed block.
    pub name: String,
    /// Gates in emission order.
    pub gates: Vec<Gate>,
}

/// A downstream that records everything it receives.
///
/// Measurement outcomes are answered from a table primed with
/// [`RecordingDownstream::set_measurement`]; unknown qubits read as
/// [`MeasurementValue::Undefined`].
#[derive(Debug, Clone, Default)]
pub struct RecordingDownstream {
    num_qubits: Option<u32>,
    batches: Vec<Batch>,
    measurements: FxHashMap<QubitRef, MeasurementValue>,
}

impl RecordingDownstream {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prime the outcome reported for a downstream qubit.
    pub fn set_measurement(&mut self, qubit: QubitRef, value: MeasurementValue) {
        self.measurements.insert(qubit, value);
    }

    /// Number of allocated qubits, if allocated.
    pub fn num_qubits(&self) -> Option<u32> {
        self.num_qubits
    }

    /// Batches in emission order.
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Every gate received, in order.
    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.batches.iter().flat_map(|b| b.gates.iter())
    }

    fn check_qubit(&self, num_qubits: u32, qubit: QubitRef) -> EngineResult<()> {
        match DownstreamQubit::from(qubit).to_physical() {
            Some(phys) if phys.0 < num_qubits => Ok(()),
            _ => Err(EngineError::Downstream(format!(
                "qubit {qubit} is outside the {num_qubits} allocated qubits"
            ))),
        }
    }
}

impl Downstream for RecordingDownstream {
    fn allocate(&mut self, num_qubits: u32) -> EngineResult<()> {
        if self.num_qubits.is_some() {
            return Err(EngineError::Downstream("qubits already allocated".into()));
        }
        debug!("Allocating {num_qubits} downstream qubits");
        self.num_qubits = Some(num_qubits);
        Ok(())
    }

    fn begin_batch(&mut self, name: &str) {
        self.batches.push(Batch {
            name: name.to_string(),
            gates: Vec::new(),
        });
    }

    fn gate(&mut self, gate: Gate) -> EngineResult<()> {
        let num_qubits = self
            .num_qubits
            .ok_or_else(|| EngineError::Downstream("gate before allocation".into()))?;
        for qubit in gate.operands() {
            self.check_qubit(num_qubits, qubit)?;
        }
        if self.batches.is_empty() {
            self.batches.push(Batch::default());
        }
        if let Some(batch) = self.batches.last_mut() {
            batch.gates.push(gate);
        }
        Ok(())
    }

    fn get_measurement(&self, qubit: QubitRef) -> EngineResult<Measurement> {
        let value = self
            .measurements
            .get(&qubit)
            .copied()
            .unwrap_or(MeasurementValue::Undefined);
        Ok(Measurement::new(qubit, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmap_ir::Matrix;

    #[test]
    fn test_gate_requires_allocation() {
        let mut down = RecordingDownstream::new();
        let gate = Gate::unitary([QubitRef(1)], [], Matrix::x()).unwrap();
        assert!(matches!(
            down.gate(gate.clone()),
            Err(EngineError::Downstream(_))
        ));

        down.allocate(2).unwrap();
        assert!(down.allocate(2).is_err());
        down.gate(gate).unwrap();
        assert_eq!(down.gates().count(), 1);
    }

    #[test]
    fn test_qubit_range() {
        let mut down = RecordingDownstream::new();
        down.allocate(2).unwrap();
        // Downstream indices are 1 and 2.
        let zero = Gate::unitary([QubitRef(0)], [], Matrix::x()).unwrap();
        let three = Gate::unitary([QubitRef(3)], [], Matrix::x()).unwrap();
        let two = Gate::unitary([QubitRef(2)], [], Matrix::x()).unwrap();
        assert!(down.gate(zero).is_err());
        assert!(down.gate(three).is_err());
        assert!(down.gate(two).is_ok());
    }

    #[test]
    fn test_batches() {
        let mut down = RecordingDownstream::new();
        down.allocate(3).unwrap();
        down.begin_batch("block_0");
        down.gate(Gate::unitary([QubitRef(1)], [], Matrix::x()).unwrap())
            .unwrap();
        down.begin_batch("block_1");
        down.gate(Gate::unitary([QubitRef(2)], [], Matrix::h()).unwrap())
            .unwrap();
        down.gate(Gate::unitary([QubitRef(3)], [], Matrix::h()).unwrap())
            .unwrap();

        let batches = down.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].name, "block_0");
        assert_eq!(batches[1].gates.len(), 2);
    }

    #[test]
    fn test_measurements() {
        let mut down = RecordingDownstream::new();
        down.set_measurement(QubitRef(2), MeasurementValue::One);
        assert_eq!(
            down.get_measurement(QubitRef(2)).unwrap().value,
            MeasurementValue::One
        );
        assert_eq!(
            down.get_measurement(QubitRef(1)).unwrap().value,
            MeasurementValue::Undefined
        );
    }
}
