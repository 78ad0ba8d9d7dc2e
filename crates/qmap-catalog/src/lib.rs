//! qmap Gate Catalog
//!
//! Bidirectional translation between canonical gates (a matrix or basis plus
//! operands) and named gate descriptors (an identifier, a qubit list and an
//! optional angle).
//!
//! The catalog is built once from a gatemap description and is immutable
//! afterwards. Every identifier belongs to one [`GateFamily`]:
//!
//! | Family | Registered from | Angle |
//! |--------|-----------------|-------|
//! | Fixed | `unitary` matrix or a [`PredefinedGate`] | no |
//! | Parameterized | `rx`, `ry`, `rz` | yes |
//! | Measurement | `measure` with optional basis | no |
//! | Prep | `prep` with optional basis | no |
//!
//! # Example
//!
//! ```rust
//! use qmap_catalog::{GateCatalog, GateDescriptor, DEFAULT_EPSILON};
//! use qmap_ir::{Gate, Matrix, QubitRef};
//!
//! let catalog = GateCatalog::from_json(
//!     r#"{ "cnot": "c-x", "rz": "rz" }"#,
//!     DEFAULT_EPSILON,
//! )
//! .unwrap();
//!
//! let gate = Gate::unitary([QubitRef(1)], [QubitRef(0)], Matrix::x()).unwrap();
//! let desc = catalog.detect(&gate).unwrap();
//! assert_eq!(desc, GateDescriptor::new("cnot", [0, 1]));
//!
//! let rz = catalog
//!     .construct(&GateDescriptor::new("rz", [2]).with_angle(0.5))
//!     .unwrap();
//! assert_eq!(catalog.detect(&rz).unwrap().name, "rz");
//! ```

pub mod catalog;
pub mod description;
pub mod descriptor;
pub mod error;
pub mod predefined;
pub mod suggest;

pub use catalog::{CatalogEntry, DEFAULT_EPSILON, GateCatalog, GateFamily};
pub use description::{ExplicitDescription, GateDescription};
pub use descriptor::GateDescriptor;
pub use error::{CatalogError, CatalogResult};
pub use predefined::{PredefinedGate, RotationAxis};
pub use suggest::{GatemapSuggestion, suggest_gatemap};
