//! Pending blocks of gates.

use qmap_catalog::GateDescriptor;
use std::collections::BTreeSet;

/// An ordered batch of gate descriptors over physical qubit indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    name: String,
    gates: Vec<GateDescriptor>,
}

impl Block {
    /// Create the empty block with the given sequence number.
    pub fn new(counter: u64) -> Self {
        Self {
            name: format!("block_{counter}"),
            gates: Vec::new(),
        }
    }

    /// Get the block name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a gate.
    pub fn push(&mut self, gate: GateDescriptor) {
        self.gates.push(gate);
    }

    /// Iterate over gates in program order.
    pub fn iter(&self) -> impl Iterator<Item = &GateDescriptor> {
        self.gates.iter()
    }

    /// Get the gates as a slice.
    pub fn gates(&self) -> &[GateDescriptor] {
        &self.gates
    }

    /// Physical qubits referenced by any gate, ascending.
    pub fn qubits(&self) -> BTreeSet<u32> {
        self.gates
            .iter()
            .flat_map(|g| g.qubits.iter().copied())
            .collect()
    }

    /// Get the number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Check if the block is empty.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

impl Extend<GateDescriptor> for Block {
    fn extend<I: IntoIterator<Item = GateDescriptor>>(&mut self, iter: I) {
        self.gates.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_basics() {
        let mut block = Block::new(3);
        assert_eq!(block.name(), "block_3");
        assert!(block.is_empty());

        block.push(GateDescriptor::new("cz", [0, 4]));
        block.extend([GateDescriptor::new("x", [2]), GateDescriptor::new("x", [4])]);
        assert_eq!(block.len(), 3);
        assert_eq!(block.qubits().into_iter().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(block.gates()[1].name, "x");
    }
}
