//! Qubit identity types.
//!
//! Each identity space gets its own newtype so that an upstream index can
//! never be handed to a lookup expecting a physical one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset between physical indices and the indices seen downstream.
///
/// Downstream qubit references start counting at one.
pub const DOWNSTREAM_OFFSET: u32 = 1;

/// A qubit reference as it appears on a canonical gate.
///
/// Whether this is an upstream or a downstream index depends on which side
/// of the operator the gate lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitRef(pub u32);

impl fmt::Display for QubitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitRef {
    fn from(index: u32) -> Self {
        QubitRef(index)
    }
}

/// Qubit index assigned by the upstream producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpstreamQubit(pub u32);

impl fmt::Display for UpstreamQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "up{}", self.0)
    }
}

impl From<QubitRef> for UpstreamQubit {
    fn from(qubit: QubitRef) -> Self {
        UpstreamQubit(qubit.0)
    }
}

impl From<UpstreamQubit> for QubitRef {
    fn from(qubit: UpstreamQubit) -> Self {
        QubitRef(qubit.0)
    }
}

/// Stable logical index assigned by the mapping engine at allocation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualQubit(pub u32);

impl fmt::Display for VirtualQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Placement chosen by the routing oracle. Valid until the next flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicalQubit(pub u32);

impl PhysicalQubit {
    /// The downstream index for this physical qubit.
    #[inline]
    pub fn to_downstream(self) -> DownstreamQubit {
        DownstreamQubit(self.0 + DOWNSTREAM_OFFSET)
    }
}

impl fmt::Display for PhysicalQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Externally visible index of a physical qubit on the downstream side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownstreamQubit(pub u32);

impl DownstreamQubit {
    /// The physical qubit behind this downstream index.
    ///
    /// Returns `None` for indices below the offset, which no physical qubit
    /// maps to.
    #[inline]
    pub fn to_physical(self) -> Option<PhysicalQubit> {
        self.0.checked_sub(DOWNSTREAM_OFFSET).map(PhysicalQubit)
    }
}

impl fmt::Display for DownstreamQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "down{}", self.0)
    }
}

impl From<DownstreamQubit> for QubitRef {
    fn from(qubit: DownstreamQubit) -> Self {
        QubitRef(qubit.0)
    }
}

impl From<QubitRef> for DownstreamQubit {
    fn from(qubit: QubitRef) -> Self {
        DownstreamQubit(qubit.0)
    }
}
