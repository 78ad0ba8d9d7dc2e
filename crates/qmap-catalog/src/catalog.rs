//! The gate catalog.

use qmap_ir::{Gate, GateKind, Matrix, PauliBasis, QubitRef};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::description::{ExplicitDescription, GateDescription};
use crate::descriptor::GateDescriptor;
use crate::error::{CatalogError, CatalogResult};
use crate::predefined::{PredefinedGate, RotationAxis};

/// Default numeric tolerance for matrix comparisons.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Family of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateFamily {
    /// A unitary with a fixed matrix.
    Fixed,
    /// A rotation carrying one angle.
    Parameterized,
    /// A measurement in some basis.
    Measurement,
    /// A state preparation in some basis.
    Prep,
}

impl fmt::Display for GateFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateFamily::Fixed => write!(f, "fixed"),
            GateFamily::Parameterized => write!(f, "parameterized"),
            GateFamily::Measurement => write!(f, "measurement"),
            GateFamily::Prep => write!(f, "prep"),
        }
    }
}

#[derive(Debug, Clone)]
enum EntryKind {
    Fixed(Matrix),
    Parameterized(RotationAxis),
    Measurement(Matrix),
    Prep(Matrix),
}

/// A registered gate.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    name: String,
    kind: EntryKind,
    num_controls: usize,
    parallel: bool,
}

impl CatalogEntry {
    /// Get the identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the family.
    pub fn family(&self) -> GateFamily {
        match self.kind {
            EntryKind::Fixed(_) => GateFamily::Fixed,
            EntryKind::Parameterized(_) => GateFamily::Parameterized,
            EntryKind::Measurement(_) => GateFamily::Measurement,
            EntryKind::Prep(_) => GateFamily::Prep,
        }
    }

    /// Number of control qubits.
    pub fn num_controls(&self) -> usize {
        self.num_controls
    }

    /// Whether multi-qubit uses are expanded into one gate per qubit.
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Matrix (or basis) for the given angle.
    ///
    /// Returns `None` when the angle does not fit the family.
    pub fn matrix(&self, angle: Option<f64>) -> Option<Matrix> {
        match (&self.kind, angle) {
            (EntryKind::Parameterized(axis), Some(theta)) => Some(axis.matrix(theta)),
            (EntryKind::Parameterized(_), None) | (_, Some(_)) => None,
            (EntryKind::Fixed(m) | EntryKind::Measurement(m) | EntryKind::Prep(m), None) => {
                Some(m.clone())
            }
        }
    }

    /// Try to recognize `gate` as an instance of this entry.
    ///
    /// On success returns the extracted angle, if the family has one.
    /// Global phase is only ignored on uncontrolled unitaries; under a
    /// control it becomes a relative phase. Bases are compared per column.
    fn recognize(&self, gate: &Gate, epsilon: f64) -> Option<Option<f64>> {
        let ignore_phase = self.num_controls == 0;
        match (&self.kind, &gate.kind) {
            (EntryKind::Fixed(expected), GateKind::Unitary { matrix })
                if self.fits_unitary(gate) =>
            {
                expected
                    .approx_eq(matrix, epsilon, ignore_phase)
                    .then_some(None)
            }
            (EntryKind::Parameterized(axis), GateKind::Unitary { matrix })
                if self.fits_unitary(gate) =>
            {
                axis.extract_angle(matrix, epsilon, ignore_phase).map(Some)
            }
            (EntryKind::Measurement(expected), GateKind::Measurement { basis })
                if gate.targets.is_empty() && gate.controls.is_empty() =>
            {
                expected.basis_eq(basis, epsilon).then_some(None)
            }
            (EntryKind::Prep(expected), GateKind::Prep { basis })
                if gate.measures.is_empty() && gate.controls.is_empty() =>
            {
                expected.basis_eq(basis, epsilon).then_some(None)
            }
            _ => None,
        }
    }

    fn fits_unitary(&self, gate: &Gate) -> bool {
        gate.controls.len() == self.num_controls && gate.measures.is_empty()
    }
}

/// Bidirectional registry between canonical gates and gate descriptors.
///
/// Built once from a gatemap description and immutable afterwards. Fixed
/// entries are always registered before parameterized ones, so detection
/// prefers a fixed identifier (e.g. `x90`) over a rotation with a matching
/// angle.
#[derive(Debug, Clone)]
pub struct GateCatalog {
    entries: Vec<CatalogEntry>,
    index: FxHashMap<String, usize>,
    has_angle: FxHashSet<String>,
    epsilon: f64,
}

impl GateCatalog {
    /// Build a catalog from a parsed gatemap object.
    pub fn from_description(description: &Map<String, Value>, epsilon: f64) -> CatalogResult<Self> {
        let mut fixed = Vec::new();
        let mut parameterized = Vec::new();
        for (name, value) in description {
            let desc = GateDescription::from_value(name, value)?.desugar();
            if RotationAxis::from_name(&desc.kind).is_some() {
                parameterized.push((name, desc));
            } else {
                fixed.push((name, desc));
            }
        }

        let mut catalog = Self {
            entries: Vec::with_capacity(fixed.len() + parameterized.len()),
            index: FxHashMap::default(),
            has_angle: FxHashSet::default(),
            epsilon,
        };
        for (name, desc) in fixed.into_iter().chain(parameterized) {
            let entry = build_entry(name, desc, epsilon)?;
            catalog.register(entry);
        }
        Ok(catalog)
    }

    /// Build a catalog from a JSON value, which must be an object.
    pub fn from_value(value: &Value, epsilon: f64) -> CatalogResult<Self> {
        match value {
            Value::Object(map) => Self::from_description(map, epsilon),
            _ => Err(CatalogError::NotAnObject),
        }
    }

    /// Build a catalog from JSON text.
    pub fn from_json(json: &str, epsilon: f64) -> CatalogResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value, epsilon)
    }

    /// Load a catalog from a JSON file.
    pub fn from_file(path: impl AsRef<Path>, epsilon: f64) -> CatalogResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json, epsilon)?;
        info!(
            "Loaded gatemap from {} ({} entries)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    fn register(&mut self, entry: CatalogEntry) {
        debug!(
            "Registered {} as {} gate with {} control(s)",
            entry.name,
            entry.family(),
            entry.num_controls
        );
        if entry.family() == GateFamily::Parameterized {
            self.has_angle.insert(entry.name.clone());
        }
        self.index.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
    }

    /// Translate a canonical gate into a descriptor.
    ///
    /// Entries are tried in registration order and the first match wins.
    pub fn detect(&self, gate: &Gate) -> CatalogResult<GateDescriptor> {
        for entry in &self.entries {
            if let Some(angle) = entry.recognize(gate, self.epsilon) {
                debug_assert_eq!(angle.is_some(), self.has_angle(&entry.name));
                return Ok(GateDescriptor {
                    name: entry.name.clone(),
                    qubits: gate.operands().map(|q| q.0).collect(),
                    angle,
                });
            }
        }
        Err(CatalogError::UnknownGate(format!(
            "{} on {} qubit(s) with {} control(s)",
            gate.kind.name(),
            gate.operands().count(),
            gate.num_controls()
        )))
    }

    /// Translate a descriptor back into a canonical gate.
    pub fn construct(&self, descriptor: &GateDescriptor) -> CatalogResult<Gate> {
        let entry = self
            .entry(&descriptor.name)
            .ok_or_else(|| CatalogError::UnknownGate(descriptor.name.clone()))?;
        let matrix = entry
            .matrix(descriptor.angle)
            .ok_or_else(|| CatalogError::AngleMismatch {
                name: descriptor.name.clone(),
                expected: self.has_angle(&descriptor.name),
            })?;

        let qubits: Vec<QubitRef> = descriptor.qubits.iter().map(|&q| QubitRef(q)).collect();
        let gate = match entry.family() {
            GateFamily::Fixed | GateFamily::Parameterized => {
                let (controls, targets) = qubits.split_at(entry.num_controls.min(qubits.len()));
                Gate::unitary(targets.iter().copied(), controls.iter().copied(), matrix)
            }
            GateFamily::Measurement => Gate::measure(qubits, matrix),
            GateFamily::Prep => Gate::prep(qubits, matrix),
        };
        gate.map_err(|source| CatalogError::InvalidOperands {
            name: descriptor.name.clone(),
            source,
        })
    }

    /// Look up an entry by identifier.
    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Iterate over entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Whether the identifier takes an angle.
    pub fn has_angle(&self, name: &str) -> bool {
        self.has_angle.contains(name)
    }

    /// Whether descriptors with this identifier are split per qubit.
    pub fn is_parallel(&self, name: &str) -> bool {
        self.entry(name).is_some_and(CatalogEntry::is_parallel)
    }

    /// Get the matching tolerance.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn build_entry(name: &str, desc: ExplicitDescription, epsilon: f64) -> CatalogResult<CatalogEntry> {
    let fail = |reason: String| CatalogError::validation(name, reason);

    let matrix = match desc.matrix {
        Some(data) => {
            let mut matrix = Matrix::new(data).map_err(|e| fail(format!("\"matrix\": {e}")))?;
            matrix
                .normalize_columns()
                .map_err(|e| fail(format!("\"matrix\": {e}")))?;
            matrix
                .ensure_unitary(epsilon)
                .map_err(|e| fail(format!("\"matrix\": {e}")))?;
            Some(matrix)
        }
        None => None,
    };
    let basis = match desc.basis.as_deref() {
        Some(_) if matrix.is_some() => {
            return Err(fail("\"basis\" and \"matrix\" are mutually exclusive".into()));
        }
        Some(text) => Some(
            PauliBasis::from_name(text)
                .ok_or_else(|| fail(format!("unknown basis \"{text}\", expected x, y or z")))?,
        ),
        None => None,
    };
    let num_controls = desc.controlled.unwrap_or(0);
    let kind = desc.kind.as_str();

    if matches!(kind, "measure" | "prep") {
        if num_controls > 0 {
            return Err(fail(format!("{kind} gates cannot be controlled")));
        }
        let basis = matrix
            .or_else(|| basis.map(PauliBasis::matrix))
            .unwrap_or_else(|| PauliBasis::Z.matrix());
        if basis.num_qubits() != 1 {
            return Err(fail(format!(
                "{kind} basis must be a single-qubit matrix, got {} qubits",
                basis.num_qubits()
            )));
        }
        let kind = if kind == "measure" {
            EntryKind::Measurement(basis)
        } else {
            EntryKind::Prep(basis)
        };
        return Ok(CatalogEntry {
            name: name.to_string(),
            kind,
            num_controls: 0,
            parallel: desc.parallel,
        });
    }

    if desc.parallel {
        return Err(fail("\"parallel\" is only allowed on measure and prep".into()));
    }
    if basis.is_some() {
        return Err(fail("\"basis\" is only allowed on measure and prep".into()));
    }

    let kind = if kind == "unitary" {
        EntryKind::Fixed(matrix.ok_or_else(|| fail("unitary gates require a \"matrix\"".into()))?)
    } else if matrix.is_some() {
        return Err(fail(format!(
            "\"matrix\" cannot be combined with type \"{kind}\""
        )));
    } else if let Some(axis) = RotationAxis::from_name(kind) {
        EntryKind::Parameterized(axis)
    } else if let Some(gate) = PredefinedGate::from_name(kind) {
        EntryKind::Fixed(gate.matrix())
    } else {
        return Err(fail(format!("unknown gate type \"{kind}\"")));
    };

    Ok(CatalogEntry {
        name: name.to_string(),
        kind,
        num_controls,
        parallel: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn catalog(value: Value) -> GateCatalog {
        GateCatalog::from_value(&value, DEFAULT_EPSILON).unwrap()
    }

    fn q(i: u32) -> QubitRef {
        QubitRef(i)
    }

    #[test]
    fn test_detect_fixed() {
        let cat = catalog(json!({ "x": "x", "cnot": "c-x", "h": "h" }));
        let gate = Gate::unitary([q(5)], [q(2)], Matrix::x()).unwrap();
        let desc = cat.detect(&gate).unwrap();
        assert_eq!(desc, GateDescriptor::new("cnot", [2, 5]));

        let gate = Gate::unitary([q(1)], [], Matrix::h()).unwrap();
        assert_eq!(cat.detect(&gate).unwrap().name, "h");
    }

    #[test]
    fn test_control_count_is_part_of_the_match() {
        let cat = catalog(json!({ "x": "x" }));
        let gate = Gate::unitary([q(1)], [q(0)], Matrix::x()).unwrap();
        assert!(matches!(cat.detect(&gate), Err(CatalogError::UnknownGate(_))));
    }

    #[test]
    fn test_fixed_before_parameterized() {
        // "rx" is declared first but rotations are registered last.
        let cat = catalog(json!({ "rx": "rx", "x90": "rx_90" }));
        let names: Vec<_> = cat.entries().map(CatalogEntry::name).collect();
        assert_eq!(names, vec!["x90", "rx"]);

        let gate = Gate::unitary([q(0)], [], Matrix::rx(FRAC_PI_2)).unwrap();
        assert_eq!(cat.detect(&gate).unwrap(), GateDescriptor::new("x90", [0]));

        let gate = Gate::unitary([q(0)], [], Matrix::rx(0.25)).unwrap();
        let desc = cat.detect(&gate).unwrap();
        assert_eq!(desc.name, "rx");
        assert!((desc.angle.unwrap() - 0.25).abs() < 1e-9);
        assert!(cat.has_angle("rx"));
        assert!(!cat.has_angle("x90"));
    }

    #[test]
    fn test_global_phase_is_ignored() {
        let cat = catalog(json!({ "x": "x" }));
        // Rx(pi) = -iX
        let gate = Gate::unitary([q(0)], [], Matrix::rx(PI)).unwrap();
        assert_eq!(cat.detect(&gate).unwrap().name, "x");
    }

    #[test]
    fn test_global_phase_under_control_is_relative() {
        let cat = catalog(json!({ "cnot": "c-x", "crx": "c-rx" }));
        // Controlled Rx(pi) is controlled(-iX), not a CNOT.
        let gate = Gate::unitary([q(1)], [q(0)], Matrix::rx(PI)).unwrap();
        let desc = cat.detect(&gate).unwrap();
        assert_eq!(desc.name, "crx");
        assert!((desc.angle.unwrap() - PI).abs() < 1e-9);

        let gate = Gate::unitary([q(1)], [q(0)], Matrix::rx(PI + 1.0)).unwrap();
        let angle = cat.detect(&gate).unwrap().angle.unwrap();
        assert!((angle - (PI + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_measurement_and_prep() {
        let cat = catalog(json!({
            "measure": "measure",
            "measure_x": { "type": "measure", "basis": "x" },
            "prep": "prep",
        }));
        let gate = Gate::measure([q(3)], PauliBasis::X.matrix()).unwrap();
        assert_eq!(cat.detect(&gate).unwrap(), GateDescriptor::new("measure_x", [3]));

        let gate = Gate::prep([q(1), q(2)], PauliBasis::Z.matrix()).unwrap();
        let desc = cat.detect(&gate).unwrap();
        assert_eq!(desc, GateDescriptor::new("prep", [1, 2]));
        let back = cat.construct(&desc).unwrap();
        assert_eq!(back, gate);
        assert_eq!(cat.entry("prep").unwrap().family(), GateFamily::Prep);
    }

    #[test]
    fn test_custom_matrix_is_normalized() {
        let cat = catalog(json!({
            "flip": { "type": "unitary", "matrix": [[0, 0], [2, 0], [3, 0], [0, 0]] }
        }));
        let gate = Gate::unitary([q(0)], [], Matrix::x()).unwrap();
        assert_eq!(cat.detect(&gate).unwrap().name, "flip");
    }

    #[test]
    fn test_construct_angle_mismatch() {
        let cat = catalog(json!({ "rz": "rz", "z": "z" }));
        let err = cat.construct(&GateDescriptor::new("rz", [0])).unwrap_err();
        assert!(matches!(err, CatalogError::AngleMismatch { expected: true, .. }));

        let err = cat
            .construct(&GateDescriptor::new("z", [0]).with_angle(1.0))
            .unwrap_err();
        assert!(matches!(err, CatalogError::AngleMismatch { expected: false, .. }));
    }

    #[test]
    fn test_construct_unknown_and_bad_operands() {
        let cat = catalog(json!({ "cz": "c-z" }));
        assert!(matches!(
            cat.construct(&GateDescriptor::new("cnot", [0, 1])),
            Err(CatalogError::UnknownGate(name)) if name == "cnot"
        ));
        assert!(matches!(
            cat.construct(&GateDescriptor::new("cz", [0])),
            Err(CatalogError::InvalidOperands { .. })
        ));
        let gate = cat.construct(&GateDescriptor::new("cz", [4, 1])).unwrap();
        assert_eq!(gate.controls, vec![q(4)]);
        assert_eq!(gate.targets, vec![q(1)]);
    }

    #[test]
    fn test_parallel_flag() {
        let cat = catalog(json!({
            "measure_all": { "type": "measure", "parallel": true },
            "x": "x",
        }));
        assert!(cat.is_parallel("measure_all"));
        assert!(!cat.is_parallel("x"));
        assert!(!cat.is_parallel("missing"));
    }

    fn validation_error(value: Value) -> String {
        match GateCatalog::from_value(&value, DEFAULT_EPSILON) {
            Err(CatalogError::Validation { name, reason }) => format!("{name}: {reason}"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_errors() {
        let msg = validation_error(json!({ "bad": { "type": "unitary", "matrix": [[1, 0], [0, 0], [0, 0]] } }));
        assert!(msg.starts_with("bad: \"matrix\""), "{msg}");

        let msg = validation_error(json!({ "zero": { "type": "unitary", "matrix": [[1, 0], [0, 0], [0, 0], [0, 0]] } }));
        assert!(msg.contains("zero norm"), "{msg}");

        let msg = validation_error(json!({ "skew": { "type": "unitary", "matrix": [[1, 0], [1, 0], [1, 0], [1, 0]] } }));
        assert!(msg.contains("not unitary"), "{msg}");

        let msg = validation_error(json!({ "cm": "c-measure" }));
        assert!(msg.contains("cannot be controlled"), "{msg}");

        let msg = validation_error(json!({ "px": { "type": "x", "parallel": true } }));
        assert!(msg.contains("parallel"), "{msg}");

        let msg = validation_error(json!({ "what": "frobnicate" }));
        assert!(msg.contains("unknown gate type"), "{msg}");

        let msg = validation_error(json!({ "mw": { "type": "measure", "basis": "w" } }));
        assert!(msg.contains("unknown basis"), "{msg}");

        let msg = validation_error(json!({ "u": { "type": "unitary" } }));
        assert!(msg.contains("require"), "{msg}");
    }

    #[test]
    fn test_not_an_object() {
        assert!(matches!(
            GateCatalog::from_json("[1, 2]", DEFAULT_EPSILON),
            Err(CatalogError::NotAnObject)
        ));
        assert!(matches!(
            GateCatalog::from_json("{", DEFAULT_EPSILON),
            Err(CatalogError::Parse(_))
        ));
    }
}
