//! Heuristic gatemap generation from a platform's instruction names.

use serde_json::{Map, Value, json};
use std::collections::BTreeSet;

/// A generated gatemap and the instruction names it could not recognize.
#[derive(Debug, Clone, PartialEq)]
pub struct GatemapSuggestion {
    /// Gatemap description, in instruction order.
    ///
    /// Unrecognized instructions map to `null` and must be filled in before
    /// the description can be loaded.
    pub gatemap: Map<String, Value>,
    /// Unrecognized instruction names, sorted.
    pub unknown: Vec<String>,
}

impl GatemapSuggestion {
    /// Whether every instruction was recognized.
    pub fn is_complete(&self) -> bool {
        self.unknown.is_empty()
    }
}

/// Normalize an instruction name for alias lookup.
fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
        .replace(['_', '-'], "")
        .replace("measure", "meas")
}

fn basis_entry(kind: &str, basis: &str) -> Value {
    json!({ "type": kind, "basis": basis })
}

/// Gatemap description for a normalized instruction name.
fn lookup(normalized: &str) -> Option<Value> {
    let shorthand = match normalized {
        "i" => "I",
        "x" => "X",
        "y" => "Y",
        "z" => "Z",
        "h" => "H",
        "s" => "S",
        "sdag" => "S_DAG",
        "t" => "T",
        "tdag" => "T_DAG",
        "x90" | "rx90" => "RX_90",
        "xm90" | "mx90" | "rxm90" => "RX_M90",
        "x180" | "rx180" => "RX_180",
        "rx" => "RX",
        "y90" | "ry90" => "RY_90",
        "ym90" | "my90" | "rym90" => "RY_M90",
        "y180" | "ry180" => "RY_180",
        "ry" => "RY",
        "z90" | "rz90" => "RZ_90",
        "zm90" | "mz90" | "rzm90" => "RZ_M90",
        "z180" | "rz180" => "RZ_180",
        "rz" => "RZ",
        "swap" => "SWAP",
        "sqswap" | "sqrtswap" => "SQSWAP",
        "cx" | "cnot" => "C-X",
        "ccx" | "ccnot" | "toffoli" => "C-C-X",
        "cy" => "C-Y",
        "ccy" => "C-C-Y",
        "cz" => "C-Z",
        "ccz" => "C-C-Z",
        "cphase" => "C-PHASE",
        "ccphase" => "C-C-PHASE",
        "cswap" | "fredkin" => "C-SWAP",
        "meas" | "measz" => "measure",
        "prep" | "prepz" => "prep",
        "measx" => return Some(basis_entry("measure", "x")),
        "measy" => return Some(basis_entry("measure", "y")),
        "prepx" => return Some(basis_entry("prep", "x")),
        "prepy" => return Some(basis_entry("prep", "y")),
        _ => return None,
    };
    Some(Value::String(shorthand.to_string()))
}

/// Suggest a gatemap for the given platform instruction names.
///
/// Names are matched after lowercasing, dropping `_` and `-`, and
/// abbreviating `measure` to `meas`. Duplicate names are kept once, at
/// their first position.
pub fn suggest_gatemap<'a>(instructions: impl IntoIterator<Item = &'a str>) -> GatemapSuggestion {
    let mut gatemap = Map::new();
    let mut unknown = BTreeSet::new();
    for name in instructions {
        if gatemap.contains_key(name) {
            continue;
        }
        let entry = lookup(&normalize(name)).unwrap_or_else(|| {
            unknown.insert(name.to_string());
            Value::Null
        });
        gatemap.insert(name.to_string(), entry);
    }
    GatemapSuggestion {
        gatemap,
        unknown: unknown.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_EPSILON, GateCatalog};

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Measure_X"), "measx");
        assert_eq!(normalize("rx-90"), "rx90");
        assert_eq!(normalize("CNOT"), "cnot");
    }

    #[test]
    fn test_suggestion_order_and_unknowns() {
        let suggestion = suggest_gatemap(["x90", "cnot", "measure", "x90", "wait", "ym90"]);
        let keys: Vec<_> = suggestion.gatemap.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x90", "cnot", "measure", "wait", "ym90"]);
        assert_eq!(suggestion.gatemap["cnot"], json!("C-X"));
        assert_eq!(suggestion.gatemap["wait"], Value::Null);
        assert_eq!(suggestion.unknown, vec!["wait".to_string()]);
        assert!(!suggestion.is_complete());
    }

    #[test]
    fn test_recognized_suggestion_loads() {
        let suggestion = suggest_gatemap([
            "i", "x", "y", "h", "s_dag", "t", "mx90", "ry180", "rz", "swap", "sqrt_swap", "cz",
            "toffoli", "fredkin", "cphase", "measure", "measure_x", "prep_y", "prepz",
        ]);
        assert!(suggestion.is_complete());
        let catalog =
            GateCatalog::from_description(&suggestion.gatemap, DEFAULT_EPSILON).unwrap();
        assert_eq!(catalog.len(), 19);
        assert!(catalog.has_angle("rz"));
        assert_eq!(catalog.entry("toffoli").unwrap().num_controls(), 2);
    }
}
