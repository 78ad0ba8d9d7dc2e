//! qmap Mapping Engine
//!
//! Sits between an upstream producer of gates and a downstream consumer with
//! a fixed set of physical qubits. The engine tracks three chained identity
//! spaces, translates gates through the [`qmap_catalog::GateCatalog`], and
//! batches them into blocks that a [`RoutingOracle`] places before they are
//! sent downstream.
//!
//! ```text
//!   upstream ──allocate/free──→ virtual ──routing──→ physical ──+1──→ downstream
//! ```
//!
//! # Flush Policy
//!
//! Gates accumulate in a pending block over physical indices. The block is
//! flushed when a gate requests a measurement (before its results are read
//! back) and when the upstream drops. The first flush allows the oracle to
//! pick any initial placement; later flushes start from the current one.
//!
//! # Example
//!
//! ```rust
//! use qmap_catalog::{GateCatalog, DEFAULT_EPSILON};
//! use qmap_engine::{Engine, RecordingDownstream, RoutingOptions, TrivialOracle};
//! use qmap_ir::{Gate, Matrix, QubitRef, UpstreamQubit};
//!
//! let catalog = GateCatalog::from_json(r#"{ "x": "x" }"#, DEFAULT_EPSILON).unwrap();
//! let mut engine = Engine::new(
//!     catalog,
//!     TrivialOracle::new(2),
//!     RecordingDownstream::new(),
//!     &RoutingOptions::new(),
//!     0,
//! )
//! .unwrap();
//!
//! engine.allocate(&[UpstreamQubit(10), UpstreamQubit(11)], &[]).unwrap();
//! let x = Gate::unitary([QubitRef(10)], [], Matrix::x()).unwrap();
//! engine.gate(&x).unwrap();
//! engine.finish().unwrap();
//!
//! // Upstream 10 -> virtual 0 -> physical 0 -> downstream 1.
//! let sent: Vec<_> = engine.downstream().gates().collect();
//! assert_eq!(sent[0].targets, vec![QubitRef(1)]);
//! ```

pub mod block;
pub mod config;
pub mod downstream;
pub mod engine;
pub mod error;
pub mod oracle;
pub mod platform;
pub mod report;
pub mod session;

pub use block::Block;
pub use config::{EngineConfig, InitCommand, PlacementStrategy};
pub use downstream::{Batch, Downstream, RecordingDownstream};
pub use engine::Engine;
pub use error::{EngineError, EngineResult, QubitSpace};
pub use oracle::{
    RandomPlacementOracle, Routing, RoutingOptions, RoutingOracle, RoutingRequest, TrivialOracle,
};
pub use platform::Platform;
pub use report::{QubitMapReport, QubitMapRow};
pub use session::{Event, Session, load_trace};
