//! Platform descriptions.
//!
//! Only the parts needed for mapping are read: the number of physical qubits
//! and the names of the instructions the platform defines, either directly
//! or through gate decompositions.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::info;

use crate::error::{EngineError, EngineResult};

/// A target platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    num_qubits: u32,
    instructions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlatform {
    hardware_settings: Option<RawHardwareSettings>,
    #[serde(default)]
    instructions: Map<String, Value>,
    #[serde(default)]
    gate_decomposition: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawHardwareSettings {
    qubit_number: Option<u32>,
}

/// First whitespace-separated token of an instruction key.
fn instruction_name(key: &str) -> Option<&str> {
    key.split_whitespace().next()
}

impl Platform {
    /// Parse a platform from JSON text.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let raw: RawPlatform = serde_json::from_str(json)?;

        let num_qubits = raw
            .hardware_settings
            .and_then(|hw| hw.qubit_number)
            .ok_or_else(|| EngineError::Platform("missing hardware_settings.qubit_number".into()))?;

        let mut names: Vec<&str> = raw.instructions.keys().filter_map(|k| instruction_name(k)).collect();
        for (key, decomposition) in &raw.gate_decomposition {
            names.extend(instruction_name(key));
            let steps = decomposition.as_array().ok_or_else(|| {
                EngineError::Platform(format!("gate_decomposition entry {key} is not a list"))
            })?;
            for step in steps {
                let step = step.as_str().ok_or_else(|| {
                    EngineError::Platform(format!(
                        "gate_decomposition entry {key} contains a non-string step"
                    ))
                })?;
                names.extend(instruction_name(step));
            }
        }

        let mut instructions: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if !instructions.iter().any(|seen| seen == name) {
                instructions.push(name.to_string());
            }
        }

        Ok(Self {
            num_qubits,
            instructions,
        })
    }

    /// Load a platform from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Platform(format!("failed to read {}: {e}", path.display()))
        })?;
        let platform = Self::from_json(&json)?;
        info!(
            "Loaded platform from {} ({} qubits, {} instructions)",
            path.display(),
            platform.num_qubits,
            platform.instructions.len()
        );
        Ok(platform)
    }

    /// Number of physical qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Instruction names, unique, in first-seen order.
    pub fn instruction_names(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATFORM: &str = r#"{
        "eqasm_compiler": "none",
        "hardware_settings": { "qubit_number": 7, "cycle_time": 20 },
        "instructions": {
            "x q0": {},
            "x q1": {},
            "cz q0,q2": {},
            "measure": {}
        },
        "gate_decomposition": {
            "cnot %0,%1": ["ym90 %1", "cz %0,%1", "y90 %1"],
            "swap %0,%1": ["cnot %0,%1", "cnot %1,%0", "cnot %0,%1"]
        }
    }"#;

    #[test]
    fn test_parse_platform() {
        let platform = Platform::from_json(PLATFORM).unwrap();
        assert_eq!(platform.num_qubits(), 7);
        let names: Vec<_> = platform.instruction_names().collect();
        assert_eq!(names, vec!["x", "cz", "measure", "cnot", "ym90", "y90", "swap"]);
    }

    #[test]
    fn test_missing_qubit_number() {
        let err = Platform::from_json(r#"{ "hardware_settings": {} }"#).unwrap_err();
        assert!(matches!(err, EngineError::Platform(_)));
        let err = Platform::from_json(r#"{ "instructions": {} }"#).unwrap_err();
        assert!(err.to_string().contains("qubit_number"));
    }

    #[test]
    fn test_bad_decomposition() {
        let json = r#"{
            "hardware_settings": { "qubit_number": 2 },
            "gate_decomposition": { "foo": "bar" }
        }"#;
        assert!(matches!(
            Platform::from_json(json),
            Err(EngineError::Platform(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platform.json");
        std::fs::write(&path, PLATFORM).unwrap();
        assert_eq!(Platform::from_file(&path).unwrap().num_qubits(), 7);
        assert!(Platform::from_file(dir.path().join("missing.json")).is_err());
    }
}
