//! qmap Intermediate Representation
//!
//! This crate provides the data structures shared by every stage of the qmap
//! mapping operator: the qubit identity spaces, the bidirectional index map
//! that ties two of those spaces together, complex unitary matrices, and the
//! canonical (matrix/basis based) gate representation exchanged with the
//! upstream producer and the downstream consumer.
//!
//! # Identity Spaces
//!
//! | Type | Assigned by | Lifetime |
//! |------|-------------|----------|
//! | [`UpstreamQubit`] | upstream producer | one allocation |
//! | [`VirtualQubit`] | mapping engine | allocation until free |
//! | [`PhysicalQubit`] | routing oracle | until the next flush |
//! | [`DownstreamQubit`] | fixed offset of the physical index | forever |
//!
//! # Example: Tracking a Placement
//!
//! ```rust
//! use qmap_ir::{BiMap, UpstreamQubit, VirtualQubit};
//!
//! let mut map: BiMap<UpstreamQubit, VirtualQubit> = BiMap::new();
//! map.map(UpstreamQubit(10), VirtualQubit(0));
//!
//! assert_eq!(map.forward(&UpstreamQubit(10)), Some(VirtualQubit(0)));
//! assert_eq!(map.reverse(&VirtualQubit(0)), Some(UpstreamQubit(10)));
//!
//! // Re-mapping the value drops the stale pairing.
//! map.map(UpstreamQubit(11), VirtualQubit(0));
//! assert_eq!(map.forward(&UpstreamQubit(10)), None);
//! ```
//!
//! # Example: A Canonical Gate
//!
//! ```rust
//! use qmap_ir::{Gate, Matrix, QubitRef};
//!
//! // CNOT with control 1 and target 2.
//! let cnot = Gate::unitary([QubitRef(2)], [QubitRef(1)], Matrix::x()).unwrap();
//! assert_eq!(cnot.num_controls(), 1);
//! assert!(!cnot.has_measures());
//! ```

pub mod bimap;
pub mod error;
pub mod gate;
pub mod matrix;
pub mod measurement;
pub mod qubit;

pub use bimap::BiMap;
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind, PauliBasis};
pub use matrix::Matrix;
pub use measurement::{Measurement, MeasurementSet, MeasurementValue};
pub use qubit::{
    DOWNSTREAM_OFFSET, DownstreamQubit, PhysicalQubit, QubitRef, UpstreamQubit, VirtualQubit,
};
