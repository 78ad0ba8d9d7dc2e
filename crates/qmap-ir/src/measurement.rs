//! Measurement results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::qubit::QubitRef;

/// Outcome of a single-qubit measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementValue {
    /// Measured |0⟩.
    Zero,
    /// Measured |1⟩.
    One,
    /// No meaningful result is available.
    Undefined,
}

impl fmt::Display for MeasurementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementValue::Zero => write!(f, "0"),
            MeasurementValue::One => write!(f, "1"),
            MeasurementValue::Undefined => write!(f, "?"),
        }
    }
}

/// A measurement result keyed by the qubit it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// The measured qubit.
    pub qubit: QubitRef,
    /// The outcome.
    pub value: MeasurementValue,
}

impl Measurement {
    /// Create a new measurement.
    pub fn new(qubit: QubitRef, value: MeasurementValue) -> Self {
        Self { qubit, value }
    }

    /// The same outcome, re-keyed to another qubit.
    #[must_use]
    pub fn with_qubit(self, qubit: QubitRef) -> Self {
        Self { qubit, ..self }
    }
}

/// A set of measurements with at most one entry per qubit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementSet {
    measurements: BTreeMap<QubitRef, MeasurementValue>,
}

impl MeasurementSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a measurement, replacing any previous result for its qubit.
    pub fn set(&mut self, measurement: Measurement) {
        self.measurements
            .insert(measurement.qubit, measurement.value);
    }

    /// Get the result for a qubit.
    pub fn get(&self, qubit: QubitRef) -> Option<Measurement> {
        self.measurements
            .get(&qubit)
            .map(|&value| Measurement::new(qubit, value))
    }

    /// Number of measured qubits.
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Iterate over measurements in qubit order.
    pub fn iter(&self) -> impl Iterator<Item = Measurement> + '_ {
        self.measurements
            .iter()
            .map(|(&qubit, &value)| Measurement::new(qubit, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces() {
        let mut set = MeasurementSet::new();
        set.set(Measurement::new(QubitRef(1), MeasurementValue::Zero));
        set.set(Measurement::new(QubitRef(1), MeasurementValue::One));
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get(QubitRef(1)).map(|m| m.value),
            Some(MeasurementValue::One)
        );
    }

    #[test]
    fn test_rekey() {
        let m = Measurement::new(QubitRef(5), MeasurementValue::One).with_qubit(QubitRef(2));
        assert_eq!(m.qubit, QubitRef(2));
        assert_eq!(m.value, MeasurementValue::One);
    }
}
