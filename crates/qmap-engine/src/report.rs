//! Qubit map report.

use qmap_ir::{BiMap, DownstreamQubit, PhysicalQubit, UpstreamQubit, VirtualQubit};
use serde::Serialize;
use std::fmt;

/// One row of the qubit map: a chain of identities, possibly broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QubitMapRow {
    /// Upstream qubit.
    pub upstream: Option<UpstreamQubit>,
    /// Virtual qubit.
    #[serde(rename = "virtual")]
    pub virt: Option<VirtualQubit>,
    /// Physical qubit.
    pub physical: Option<PhysicalQubit>,
    /// Downstream qubit.
    pub downstream: Option<DownstreamQubit>,
}

/// Snapshot of every identity chain known to the engine.
///
/// Live upstream qubits come first, ascending; then physical qubits not
/// reached through a live upstream qubit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QubitMapReport {
    rows: Vec<QubitMapRow>,
}

impl QubitMapReport {
    /// Build a report from the two index maps.
    pub fn new(
        upstream: &BiMap<UpstreamQubit, VirtualQubit>,
        placement: &BiMap<VirtualQubit, PhysicalQubit>,
        num_qubits: u32,
    ) -> Self {
        let mut rows = Vec::new();
        let mut reached = vec![false; num_qubits as usize];

        for (up, virt) in upstream.to_sorted_vec() {
            let physical = placement.forward(&virt);
            if let Some(slot) = physical.and_then(|p| reached.get_mut(p.0 as usize)) {
                *slot = true;
            }
            rows.push(QubitMapRow {
                upstream: Some(up),
                virt: Some(virt),
                physical,
                downstream: physical.map(PhysicalQubit::to_downstream),
            });
        }

        for (index, _) in reached.iter().enumerate().filter(|(_, seen)| !**seen) {
            let physical = PhysicalQubit(index as u32);
            rows.push(QubitMapRow {
                upstream: None,
                virt: placement.reverse(&physical),
                physical: Some(physical),
                downstream: Some(physical.to_downstream()),
            });
        }

        Self { rows }
    }

    /// Rows in report order.
    pub fn rows(&self) -> &[QubitMapRow] {
        &self.rows
    }
}

fn cell(f: &mut fmt::Formatter<'_>, value: Option<u32>, width: usize) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{v:>width$}"),
        None => write!(f, "{:>width$}", "-"),
    }
}

impl fmt::Display for QubitMapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "upstream | virtual | physical | downstream")?;
        write!(f, "---------+---------+----------+-----------")?;
        for row in &self.rows {
            writeln!(f)?;
            cell(f, row.upstream.map(|q| q.0), 8)?;
            write!(f, " | ")?;
            cell(f, row.virt.map(|q| q.0), 7)?;
            write!(f, " | ")?;
            cell(f, row.physical.map(|q| q.0), 8)?;
            write!(f, " | ")?;
            cell(f, row.downstream.map(|q| q.0), 10)?;
        }
        Ok(())
    }
}
