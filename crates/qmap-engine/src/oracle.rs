//! Routing oracle contract.
//!
//! The oracle decides physical placement. The engine hands it each pending
//! block, expressed over the current physical indices, and receives a new
//! physical index for every old one it kept. How the oracle decides is its
//! own business; the engine only checks that the answer is a partial
//! injection into `[0, N)`.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::block::Block;
use crate::error::{EngineError, EngineResult};

/// Free-form options forwarded to the oracle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingOptions {
    options: BTreeMap<String, String>,
}

impl RoutingOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Look up an option.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for RoutingOptions {
    fn from(options: BTreeMap<String, String>) -> Self {
        Self { options }
    }
}

/// A request to route one block.
#[derive(Debug, Clone, Copy)]
pub struct RoutingRequest<'a> {
    /// Gates over current physical indices, in program order.
    pub block: &'a Block,
    /// Number of physical qubits.
    pub num_qubits: u32,
    /// Whether the oracle may choose any initial placement. Only set for
    /// the first block; afterwards the current placement is authoritative.
    pub initial_placement: bool,
}

/// The oracle's answer: new physical index for each old physical index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routing {
    /// `assignment[old] = Some(new)`, or `None` if `old` is dropped.
    pub assignment: Vec<Option<u32>>,
}

impl Routing {
    /// Keep every physical index where it is.
    pub fn identity(num_qubits: u32) -> Self {
        Self {
            assignment: (0..num_qubits).map(Some).collect(),
        }
    }

    /// New physical index for `old`, if any.
    #[inline]
    pub fn get(&self, old: u32) -> Option<u32> {
        self.assignment.get(old as usize).copied().flatten()
    }

    /// Check that the assignment is a partial injection into `[0, num_qubits)`.
    pub fn validate(&self, num_qubits: u32) -> EngineResult<()> {
        if self.assignment.len() > num_qubits as usize {
            return Err(EngineError::Routing(format!(
                "assignment covers {} qubits but the platform has {num_qubits}",
                self.assignment.len()
            )));
        }
        let mut seen = FxHashSet::default();
        for (old, new) in self.assignment.iter().enumerate() {
            let Some(new) = *new else { continue };
            if new >= num_qubits {
                return Err(EngineError::Routing(format!(
                    "physical qubit {old} assigned to {new}, out of range"
                )));
            }
            if !seen.insert(new) {
                return Err(EngineError::Routing(format!(
                    "physical qubit {new} assigned more than once"
                )));
            }
        }
        Ok(())
    }
}

/// Trait for routing oracles.
pub trait RoutingOracle {
    /// Get the oracle name.
    fn name(&self) -> &str;

    /// Number of physical qubits the oracle places onto.
    fn num_qubits(&self) -> u32;

    /// Apply options once, before the first block.
    fn configure(&mut self, options: &RoutingOptions) -> EngineResult<()>;

    /// Reseed any internal randomness.
    fn reseed(&mut self, seed: u64);

    /// Route one block.
    fn route(&mut self, request: &RoutingRequest<'_>) -> EngineResult<Routing>;
}

impl<T: RoutingOracle + ?Sized> RoutingOracle for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn num_qubits(&self) -> u32 {
        (**self).num_qubits()
    }

    fn configure(&mut self, options: &RoutingOptions) -> EngineResult<()> {
        (**self).configure(options)
    }

    fn reseed(&mut self, seed: u64) {
        (**self).reseed(seed);
    }

    fn route(&mut self, request: &RoutingRequest<'_>) -> EngineResult<Routing> {
        (**self).route(request)
    }
}

/// Oracle that never moves a qubit.
#[derive(Debug, Clone)]
pub struct TrivialOracle {
    num_qubits: u32,
}

impl TrivialOracle {
    /// Create an oracle for `num_qubits` physical qubits.
    pub fn new(num_qubits: u32) -> Self {
        Self { num_qubits }
    }
}

impl RoutingOracle for TrivialOracle {
    fn name(&self) -> &str {
        "trivial"
    }

    fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    fn configure(&mut self, options: &RoutingOptions) -> EngineResult<()> {
        for (key, value) in options.iter() {
            warn!("Routing option {key}={value} is ignored by the trivial oracle");
        }
        Ok(())
    }

    fn reseed(&mut self, _seed: u64) {}

    fn route(&mut self, _request: &RoutingRequest<'_>) -> EngineResult<Routing> {
        Ok(Routing::identity(self.num_qubits))
    }
}

/// Oracle that picks a seeded random placement for the first block.
///
/// Later blocks keep the placement. The `initialplace` option (`yes` or
/// `no`, default `yes`) disables the random placement entirely.
#[derive(Debug, Clone)]
pub struct RandomPlacementOracle {
    num_qubits: u32,
    rng: StdRng,
    enabled: bool,
}

impl RandomPlacementOracle {
    /// Create an oracle for `num_qubits` physical qubits, seeded with 0.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            rng: StdRng::seed_from_u64(0),
            enabled: true,
        }
    }
}

impl RoutingOracle for RandomPlacementOracle {
    fn name(&self) -> &str {
        "random-placement"
    }

    fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    fn configure(&mut self, options: &RoutingOptions) -> EngineResult<()> {
        self.enabled = match options.get("initialplace") {
            Some("yes") | None => true,
            Some("no") => false,
            Some(other) => {
                return Err(EngineError::Config(format!(
                    "initialplace must be yes or no, got {other}"
                )));
            }
        };
        for (key, value) in options.iter().filter(|(key, _)| *key != "initialplace") {
            warn!("Routing option {key}={value} is ignored by the random-placement oracle");
        }
        Ok(())
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn route(&mut self, request: &RoutingRequest<'_>) -> EngineResult<Routing> {
        if !(request.initial_placement && self.enabled) {
            return Ok(Routing::identity(self.num_qubits));
        }
        let mut placement: Vec<u32> = (0..self.num_qubits).collect();
        placement.shuffle(&mut self.rng);
        debug!("Random initial placement: {placement:?}");
        Ok(Routing {
            assignment: placement.into_iter().map(Some).collect(),
        })
    }
}
