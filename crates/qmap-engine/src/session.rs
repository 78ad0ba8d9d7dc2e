//! Replaying upstream event streams.

use qmap_ir::{Gate, MeasurementSet, UpstreamQubit};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::downstream::Downstream;
use crate::engine::Engine;
use crate::error::EngineResult;
use crate::oracle::RoutingOracle;

/// One event from the upstream producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Allocate qubits.
    Allocate {
        /// Upstream qubit indices.
        qubits: Vec<UpstreamQubit>,
        /// Extra allocation data.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<Value>,
    },
    /// Free qubits.
    Free {
        /// Upstream qubit indices.
        qubits: Vec<UpstreamQubit>,
    },
    /// Apply a gate.
    Gate {
        /// The gate, over upstream qubit indices.
        gate: Gate,
    },
    /// Advance time.
    Advance {
        /// Number of cycles.
        cycles: u64,
    },
    /// End of the stream.
    Drop,
}

/// Read a JSON array of events.
pub fn load_trace(path: impl AsRef<Path>) -> EngineResult<Vec<Event>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Drives an [`Engine`] from a stream of events.
#[derive(Debug)]
pub struct Session<O, D> {
    engine: Engine<O, D>,
    measurements: Vec<MeasurementSet>,
}

impl<O: RoutingOracle, D: Downstream> Session<O, D> {
    /// Create a session around an initialized engine.
    pub fn new(engine: Engine<O, D>) -> Self {
        Self {
            engine,
            measurements: Vec::new(),
        }
    }

    /// Apply one event.
    ///
    /// Non-empty measurement results are also kept for
    /// [`Session::measurements`].
    pub fn apply(&mut self, event: &Event) -> EngineResult<MeasurementSet> {
        let results = match event {
            Event::Allocate { qubits, args } => {
                self.engine.allocate(qubits, args)?;
                MeasurementSet::new()
            }
            Event::Free { qubits } => {
                self.engine.free(qubits);
                MeasurementSet::new()
            }
            Event::Gate { gate } => self.engine.gate(gate)?,
            Event::Advance { cycles } => {
                self.engine.advance(*cycles);
                MeasurementSet::new()
            }
            Event::Drop => {
                self.engine.finish()?;
                MeasurementSet::new()
            }
        };
        if !results.is_empty() {
            self.measurements.push(results.clone());
        }
        Ok(results)
    }

    /// Apply every event in order, stopping at the first error.
    pub fn replay<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) -> EngineResult<()> {
        for event in events {
            self.apply(event)?;
        }
        Ok(())
    }

    /// Measurement results collected so far.
    pub fn measurements(&self) -> &[MeasurementSet] {
        &self.measurements
    }

    /// Get the engine.
    pub fn engine(&self) -> &Engine<O, D> {
        &self.engine
    }

    /// Get the engine mutably.
    pub fn engine_mut(&mut self) -> &mut Engine<O, D> {
        &mut self.engine
    }

    /// Consume the session, returning the engine.
    pub fn into_engine(self) -> Engine<O, D> {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_json() {
        let events: Vec<Event> = serde_json::from_value(json!([
            { "event": "allocate", "qubits": [1, 2] },
            { "event": "free", "qubits": [2] },
            { "event": "advance", "cycles": 5 },
            { "event": "drop" }
        ]))
        .unwrap();
        assert_eq!(
            events[0],
            Event::Allocate {
                qubits: vec![UpstreamQubit(1), UpstreamQubit(2)],
                args: vec![]
            }
        );
        assert_eq!(events[2], Event::Advance { cycles: 5 });
        assert_eq!(events[3], Event::Drop);
    }

    #[test]
    fn test_gate_event_json() {
        let event: Event = serde_json::from_value(json!({
            "event": "gate",
            "gate": {
                "kind": { "unitary": { "matrix": [[0, 0], [1, 0], [1, 0], [0, 0]] } },
                "targets": [3]
            }
        }))
        .unwrap();
        let Event::Gate { gate } = event else {
            panic!("expected a gate event");
        };
        assert_eq!(gate.targets, vec![qmap_ir::QubitRef(3)]);
        assert!(gate.controls.is_empty());
    }

    #[test]
    fn test_malformed_gate_event_rejected() {
        let x = json!({ "unitary": { "matrix": [[0, 0], [1, 0], [1, 0], [0, 0]] } });
        for gate in [
            json!({ "kind": x }),
            json!({ "kind": x, "targets": [0, 1] }),
            json!({ "kind": x, "targets": [2], "controls": [2] }),
        ] {
            let event = json!({ "event": "gate", "gate": gate });
            assert!(serde_json::from_value::<Event>(event).is_err());
        }
    }
}
