//! The translation and batching engine.

use qmap_catalog::{GateCatalog, GateDescriptor};
use qmap_ir::{
    BiMap, Gate, Measurement, MeasurementSet, PhysicalQubit, QubitRef, UpstreamQubit,
    VirtualQubit,
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::block::Block;
use crate::config::EngineConfig;
use crate::downstream::Downstream;
use crate::error::{EngineError, EngineResult, QubitSpace};
use crate::oracle::{RoutingOptions, RoutingOracle, RoutingRequest};
use crate::platform::Platform;
use crate::report::QubitMapReport;

/// Maps upstream qubits onto a fixed set of physical qubits and forwards
/// gates downstream in routed blocks.
///
/// Gates are collected into a pending block over physical indices. The
/// block is flushed through the routing oracle whenever a gate requests a
/// measurement, and on [`Engine::finish`].
pub struct Engine<O, D> {
    oracle: O,
    downstream: D,
    catalog: GateCatalog,
    num_qubits: u32,
    upstream: BiMap<UpstreamQubit, VirtualQubit>,
    placement: BiMap<VirtualQubit, PhysicalQubit>,
    block: Block,
    blocks_flushed: u64,
    warned_advance: bool,
    warned_allocation_args: bool,
}

impl<D: Downstream> Engine<Box<dyn RoutingOracle>, D> {
    /// Initialize from configuration: load the platform and gatemap, build
    /// the configured oracle and allocate the downstream qubits.
    pub fn initialize(config: &EngineConfig, downstream: D) -> EngineResult<Self> {
        config.validate()?;
        let (Some(platform_path), Some(gatemap_path)) = (&config.platform, &config.gatemap) else {
            return Err(EngineError::MissingConfiguration(
                "platform and gatemap are required".into(),
            ));
        };
        let platform = Platform::from_file(platform_path)?;
        let catalog = GateCatalog::from_file(gatemap_path, config.epsilon)?;
        let oracle = config.build_oracle(&platform);
        Self::new(catalog, oracle, downstream, &config.routing_options(), config.seed)
    }
}

impl<O: RoutingOracle, D: Downstream> Engine<O, D> {
    /// Create an engine around an already built catalog and oracle.
    ///
    /// The capacity is taken from the oracle. The placement starts as the
    /// identity and the downstream is asked to allocate every qubit.
    pub fn new(
        catalog: GateCatalog,
        mut oracle: O,
        mut downstream: D,
        options: &RoutingOptions,
        seed: u64,
    ) -> EngineResult<Self> {
        oracle.configure(options)?;
        oracle.reseed(seed);
        let num_qubits = oracle.num_qubits();
        downstream.allocate(num_qubits)?;

        info!(
            "Initialized mapper: {} qubits, {} gatemap entries, oracle {}",
            num_qubits,
            catalog.len(),
            oracle.name()
        );

        Ok(Self {
            oracle,
            downstream,
            catalog,
            num_qubits,
            upstream: BiMap::new(),
            placement: BiMap::identity(num_qubits),
            block: Block::new(0),
            blocks_flushed: 0,
            warned_advance: false,
            warned_allocation_args: false,
        })
    }

    /// Allocate upstream qubits.
    ///
    /// Each qubit receives the lowest free virtual index. Extra allocation
    /// arguments are discarded.
    pub fn allocate(&mut self, qubits: &[UpstreamQubit], args: &[Value]) -> EngineResult<()> {
        if !args.is_empty() && !self.warned_allocation_args {
            warn!("Allocation arguments are not supported and will be ignored");
            self.warned_allocation_args = true;
        }
        for &up in qubits {
            let virt = (0..self.num_qubits)
                .map(VirtualQubit)
                .find(|v| !self.upstream.contains_reverse(v))
                .ok_or(EngineError::CapacityExceeded {
                    capacity: self.num_qubits,
                })?;
            self.upstream.map(up, virt);
            debug!("Mapped upstream qubit {} to virtual qubit {}", up.0, virt.0);
        }
        Ok(())
    }

    /// Free upstream qubits. Qubits without a mapping are skipped.
    pub fn free(&mut self, qubits: &[UpstreamQubit]) {
        for up in qubits {
            match self.upstream.unmap_forward(up) {
                Some(virt) => debug!("Freed upstream qubit {} (virtual {})", up.0, virt.0),
                None => warn!("Free of upstream qubit {} which is not allocated", up.0),
            }
        }
    }

    /// Handle an upstream gate.
    ///
    /// Returns the measurement results the gate requested, keyed by upstream
    /// qubit. A gate that measures flushes the pending block first.
    pub fn gate(&mut self, gate: &Gate) -> EngineResult<MeasurementSet> {
        let descriptor = self.catalog.detect(gate)?;
        debug!("Received {descriptor}");
        let physical = descriptor.try_map_qubits(|q| {
            self.upstream_to_physical(UpstreamQubit(q)).map(|p| p.0)
        })?;

        if self.catalog.is_parallel(&physical.name) {
            self.block.extend(physical.split_per_qubit());
        } else {
            self.block.push(physical);
        }

        let mut results = MeasurementSet::new();
        if !gate.has_measures() {
            return Ok(results);
        }

        self.flush()?;
        for &qubit in &gate.measures {
            let physical = self.upstream_to_physical(UpstreamQubit::from(qubit))?;
            let measurement = self
                .downstream
                .get_measurement(physical.to_downstream().into())?;
            debug!(
                "Measured downstream {} = {} for upstream {}",
                measurement.qubit, measurement.value, qubit
            );
            results.set(measurement.with_qubit(qubit));
        }
        Ok(results)
    }

    /// Handle upstream time advancement. Timing is not modelled.
    pub fn advance(&mut self, cycles: u64) {
        if !self.warned_advance {
            warn!("Advancing time ({cycles} cycles) is not supported and will be ignored");
            self.warned_advance = true;
        }
    }

    /// Handle a measurement arriving from downstream.
    ///
    /// Results are only forwarded through [`Engine::gate`], so this always
    /// returns an empty set.
    pub fn modify_measurement(&mut self, measurement: Measurement) -> MeasurementSet {
        debug!(
            "Discarding downstream measurement {} = {}",
            measurement.qubit, measurement.value
        );
        MeasurementSet::new()
    }

    /// Handle the upstream drop: flush whatever is still pending.
    pub fn finish(&mut self) -> EngineResult<()> {
        self.flush()
    }

    /// Route the pending block and emit it downstream.
    ///
    /// Does nothing if the block is empty.
    #[instrument(skip_all, fields(block = %self.block.name()))]
    pub fn flush(&mut self) -> EngineResult<()> {
        if self.block.is_empty() {
            return Ok(());
        }

        let initial_placement = self.blocks_flushed == 0;
        debug!(
            "Routing {} gate(s) over {} physical qubit(s)",
            self.block.len(),
            self.block.qubits().len()
        );
        debug!("Qubit map before routing:\n{}", self.qubit_map_report());
        let routing = self.oracle.route(&RoutingRequest {
            block: &self.block,
            num_qubits: self.num_qubits,
            initial_placement,
        })?;
        routing.validate(self.num_qubits)?;

        let mut placement = BiMap::new();
        for (old, new) in routing.assignment.iter().enumerate() {
            let Some(new) = *new else { continue };
            if let Some(virt) = self.placement.reverse(&PhysicalQubit(old as u32)) {
                placement.map(virt, PhysicalQubit(new));
            }
        }
        self.placement = placement;
        debug!("Qubit map after routing:\n{}", self.qubit_map_report());

        let catalog = &self.catalog;
        let gates = self
            .block
            .iter()
            .map(|descriptor| -> EngineResult<Gate> {
                let routed = descriptor.try_map_qubits(|old| {
                    routing
                        .get(old)
                        .map(|new| PhysicalQubit(new).to_downstream().0)
                        .ok_or(EngineError::UnmappedResource {
                            space: QubitSpace::Physical,
                            index: old,
                        })
                })?;
                debug!("Sending {routed}");
                Ok(catalog.construct(&routed)?)
            })
            .collect::<EngineResult<Vec<Gate>>>()?;

        self.downstream.begin_batch(self.block.name());
        for gate in gates {
            self.downstream.gate(gate)?;
        }

        info!("Flushed {} gate(s)", self.block.len());
        self.blocks_flushed += 1;
        self.block = Block::new(self.blocks_flushed);
        Ok(())
    }

    fn upstream_to_physical(&self, up: UpstreamQubit) -> EngineResult<PhysicalQubit> {
        let virt = self
            .upstream
            .forward(&up)
            .ok_or(EngineError::UnmappedResource {
                space: QubitSpace::Upstream,
                index: up.0,
            })?;
        self.placement
            .forward(&virt)
            .ok_or(EngineError::UnmappedResource {
                space: QubitSpace::Virtual,
                index: virt.0,
            })
    }

    /// Current identity chains.
    pub fn qubit_map_report(&self) -> QubitMapReport {
        QubitMapReport::new(&self.upstream, &self.placement, self.num_qubits)
    }

    /// Number of physical qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Upstream to virtual map.
    pub fn upstream_map(&self) -> &BiMap<UpstreamQubit, VirtualQubit> {
        &self.upstream
    }

    /// Virtual to physical map.
    pub fn placement(&self) -> &BiMap<VirtualQubit, PhysicalQubit> {
        &self.placement
    }

    /// Gates waiting for the next flush.
    pub fn pending(&self) -> &[GateDescriptor] {
        self.block.gates()
    }

    /// Number of blocks flushed so far.
    pub fn blocks_flushed(&self) -> u64 {
        self.blocks_flushed
    }

    /// Get the gate catalog.
    pub fn catalog(&self) -> &GateCatalog {
        &self.catalog
    }

    /// Get the routing oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Get the downstream consumer.
    pub fn downstream(&self) -> &D {
        &self.downstream
    }

    /// Get the downstream consumer mutably.
    pub fn downstream_mut(&mut self) -> &mut D {
        &mut self.downstream
    }

    /// Consume the engine, returning the downstream consumer.
    pub fn into_downstream(self) -> D {
        self.downstream
    }
}

impl<O, D> std::fmt::Debug for Engine<O, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("num_qubits", &self.num_qubits)
            .field("pending", &self.block.len())
            .field("blocks_flushed", &self.blocks_flushed)
            .finish_non_exhaustive()
    }
}
