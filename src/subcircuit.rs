/// Sub-circuit node kind
///
/// A named circuit compiled once and placed like any other node. Its input
/// ports are the inner `input` nodes and its output ports the inner `output`
/// nodes, both ordered by node id. Every placed instance owns its own copy of
/// the inner state arena.
///
/// When no inner input reaches an inner output within one tick (every such
/// path runs through a memory or a delay), the sub-circuit provides delay
/// and may close a feedback loop in the graph it is placed in. Otherwise it
/// is evaluated combinationally like any arithmetic node.

use crate::engine::CompiledCircuit;
use crate::error::{GraphError, InvariantViolation};
use crate::graph::CircuitGraph;
use crate::node_state::{CircuitState, NodeState};
use crate::node_type::{
    missing_state, Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor, PortSide,
};
use crate::params::ParamValues;
use crate::registry::NodeRegistry;
use crate::signal::{clamp, Signal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Type id prefix for sub-circuit node kinds
pub const CIRCUIT_PREFIX: &str = "circuit:";

/// A user-composed circuit, as saved by the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDefinition {
    pub name: String,
    pub graph: CircuitGraph,
}

impl CircuitDefinition {
    pub fn new(name: &str, graph: CircuitGraph) -> Self {
        Self {
            name: name.to_string(),
            graph,
        }
    }

    /// Type id this definition registers under
    pub fn type_id(&self) -> String {
        format!("{}{}", CIRCUIT_PREFIX, self.name)
    }

    /// Compile against `registry` and add the result to it
    ///
    /// Inner graphs may use any kind already registered, including earlier
    /// sub-circuits.
    pub fn register(&self, registry: &mut NodeRegistry) -> Result<String, GraphError> {
        let node_type = SubCircuitType::compile(self, registry)?;
        let type_id = node_type.type_id().to_string();
        registry.register(Arc::new(node_type));
        Ok(type_id)
    }
}

pub struct SubCircuitType {
    descriptor: NodeTypeDescriptor,
    circuit: CompiledCircuit,
    input_slots: Vec<usize>,
    /// Result column of each inner output node
    output_columns: Vec<usize>,
    /// No inner input reaches an inner output in the same tick
    delays_all_outputs: bool,
}

impl SubCircuitType {
    pub fn compile(
        definition: &CircuitDefinition,
        registry: &NodeRegistry,
    ) -> Result<Self, GraphError> {
        let circuit = CompiledCircuit::compile(&definition.graph, registry)?;
        let input_slots = circuit.slots_of_type("input");
        let output_slots = circuit.slots_of_type("output");

        let mut descriptor = NodeTypeDescriptor::new(&definition.type_id(), Category::Circuit)
            .footprint(3, (input_slots.len().max(output_slots.len()).max(1) as u32) + 1)
            .stateful();
        for (i, _) in input_slots.iter().enumerate() {
            descriptor = descriptor.input(PortDescriptor::new(&format!("In{}", i)).on(PortSide::Left));
        }
        for (i, _) in output_slots.iter().enumerate() {
            descriptor =
                descriptor.output(PortDescriptor::new(&format!("Out{}", i)).on(PortSide::Right));
        }

        let output_columns = output_slots
            .iter()
            .map(|&slot| circuit.output_offset(slot))
            .collect();

        let delays_all_outputs = input_slots.iter().all(|&from| {
            output_slots
                .iter()
                .all(|&to| !circuit.depends_same_tick(from, to))
        });

        debug!(
            "Compiled sub-circuit {}: {} in, {} out, {} inner nodes, delayed: {}",
            definition.name,
            input_slots.len(),
            output_slots.len(),
            circuit.node_count(),
            delays_all_outputs
        );

        Ok(Self {
            descriptor,
            circuit,
            input_slots,
            output_columns,
            delays_all_outputs,
        })
    }

    fn inner_states<'s>(
        &self,
        state: Option<&'s mut NodeState>,
    ) -> Result<&'s mut Vec<Option<NodeState>>, InvariantViolation> {
        match state {
            Some(NodeState::Circuit(inner)) if inner.states.len() == self.circuit.node_count() => {
                Ok(&mut inner.states)
            }
            _ => Err(missing_state(self)),
        }
    }

    fn run_tick(
        &self,
        tick: usize,
        inputs: &[Signal],
        states: &mut [Option<NodeState>],
    ) -> Result<Vec<Signal>, InvariantViolation> {
        let mut externals = vec![0.0; self.circuit.node_count()];
        for (&slot, &input) in self.input_slots.iter().zip(inputs) {
            externals[slot] = clamp(input);
        }
        let mut values = vec![0.0; self.circuit.columns().len()];
        self.circuit.step_into(tick, &externals, states, &mut values)?;
        Ok(self.output_columns.iter().map(|&c| values[c]).collect())
    }
}

impl NodeType for SubCircuitType {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        let inputs: Vec<Signal> = (0..self.input_slots.len()).map(|port| ctx.input(port)).collect();
        let tick = ctx.tick;
        let states = self.inner_states(ctx.state_mut())?;
        self.run_tick(tick, &inputs, states)
    }

    fn create_state(&self, _params: &ParamValues) -> Option<NodeState> {
        Some(NodeState::Circuit(CircuitState {
            states: self.circuit.fresh_states(),
        }))
    }

    fn check_state(&self, _params: &ParamValues, state: &NodeState) -> Result<(), String> {
        match state {
            NodeState::Circuit(inner) => self.circuit.check_states(&inner.states),
            other => Err(format!("expected circuit state, found {}", other.kind_name())),
        }
    }

    fn provides_delay(&self, _params: &ParamValues) -> bool {
        self.delays_all_outputs
    }

    fn peek(
        &self,
        _params: &ParamValues,
        state: Option<&NodeState>,
        tick: usize,
    ) -> Result<Vec<Signal>, InvariantViolation> {
        // Outputs do not read this tick's inputs, so a dry run on a copy of
        // the arena with silent inputs yields them
        let mut scratch = state.cloned();
        let states = self.inner_states(scratch.as_mut())?;
        self.run_tick(tick, &[], states)
    }
}
