/// Cycle evaluation engine
///
/// This module implements the core execution loop: a circuit graph is
/// compiled once into dense evaluation slots and a same-tick order, then run
/// tick by tick over a fixed window. Runtime state for stateful nodes lives
/// in an arena owned by the run, created before tick 0 and never reset
/// mid-run.
///
/// One tick has three phases:
/// 1. Delay-providing nodes announce their output for this tick (`peek`)
/// 2. Every other node is evaluated in topological order
/// 3. Delay-providing nodes are evaluated once with their now-known inputs
///
/// Phase 3 must emit exactly what phase 1 announced; anything else is an
/// engine invariant violation.

use crate::dependency_graph::DependencyGraph;
use crate::error::{GraphError, InvariantViolation, SimResult};
use crate::graph::{CircuitGraph, NodeId, PortRef};
use crate::node_state::NodeState;
use crate::node_type::{EvalContext, NodeType};
use crate::params::{self, ParamValues};
use crate::registry::NodeRegistry;
use crate::results::CycleResults;
use crate::signal::{in_range, Signal};
use crate::stimulus::{Stimuli, Waveform};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Ticks evaluated per run unless configured otherwise
pub const DEFAULT_WINDOW_TICKS: usize = 256;

/// Where an input port gets its value from
#[derive(Debug, Clone, Copy, PartialEq)]
enum InputSource {
    /// Output slot of the driving port
    Wire(usize),
    /// Unwired: knob parameter value or 0
    Default(Signal),
}

struct CompiledNode {
    id: NodeId,
    node_type: Arc<dyn NodeType>,
    params: ParamValues,
    inputs: Vec<InputSource>,
    output_offset: usize,
    output_count: usize,
}

/// A validated circuit ready to run
///
/// Compiling checks every structural rule (dangling wires, port arity,
/// doubly driven inputs, combinational cycles); a `CompiledCircuit` that
/// exists can always be run.
pub struct CompiledCircuit {
    nodes: Vec<CompiledNode>,
    /// Non-delayed slots in same-tick dependency order
    order: Vec<usize>,
    /// Delay-providing slots, in slot order
    delayed: Vec<usize>,
    columns: Vec<PortRef>,
    slot_of: HashMap<NodeId, usize>,
    initial_states: Vec<Option<NodeState>>,
    dependencies: DependencyGraph,
}

impl CompiledCircuit {
    /// Validate `graph` against `registry` and fix its evaluation order
    ///
    /// # Errors
    /// - Duplicate node ids, unknown node types
    /// - Wires to missing nodes or to ports beyond the declared arity
    /// - Two wires into one input port
    /// - Any cycle with no delay-providing node on it
    /// - Saved state that does not fit its node
    pub fn compile(graph: &CircuitGraph, registry: &NodeRegistry) -> Result<Self, GraphError> {
        let mut slot_of = HashMap::with_capacity(graph.nodes.len());
        let mut nodes = Vec::with_capacity(graph.nodes.len());
        let mut columns = Vec::new();
        let mut initial_states = Vec::with_capacity(graph.nodes.len());

        for (slot, instance) in graph.nodes.iter().enumerate() {
            if slot_of.insert(instance.id, slot).is_some() {
                return Err(GraphError::DuplicateNode(instance.id));
            }
            let node_type = registry.get(&instance.type_id).cloned().ok_or_else(|| {
                GraphError::UnknownNodeType {
                    node: instance.id,
                    type_id: instance.type_id.clone(),
                }
            })?;
            let descriptor = node_type.descriptor();

            // Keys a loaded graph left out take their declared defaults
            let mut params = params::defaults(&descriptor.params);
            params.extend(instance.params.iter().map(|(k, v)| (k.clone(), *v)));

            let inputs = descriptor
                .inputs
                .iter()
                .map(|port| {
                    let value = port
                        .knob
                        .as_deref()
                        .and_then(|key| params.get(key).copied())
                        .unwrap_or(0.0);
                    InputSource::Default(value)
                })
                .collect();

            let output_offset = columns.len();
            let output_count = descriptor.outputs.len();
            columns.extend((0..output_count).map(|port| PortRef::new(instance.id, port)));

            let state = match &instance.state {
                Some(saved) => {
                    node_type.check_state(&params, saved).map_err(|message| {
                        GraphError::StateMismatch {
                            node: instance.id,
                            message,
                        }
                    })?;
                    Some(saved.clone())
                }
                None => node_type.create_state(&params),
            };
            initial_states.push(state);

            nodes.push(CompiledNode {
                id: instance.id,
                node_type,
                params,
                inputs,
                output_offset,
                output_count,
            });
        }

        let mut edges = Vec::with_capacity(graph.wires.len());
        for wire in &graph.wires {
            let (Some(&from), Some(&to)) = (slot_of.get(&wire.from.node), slot_of.get(&wire.to.node))
            else {
                return Err(GraphError::DanglingWire {
                    from: wire.from.node,
                    to: wire.to.node,
                });
            };

            if wire.from.port >= nodes[from].output_count {
                return Err(GraphError::PortOutOfRange {
                    node: wire.from.node,
                    port: wire.from.port,
                    arity: nodes[from].output_count,
                    output: true,
                });
            }
            let source = InputSource::Wire(nodes[from].output_offset + wire.from.port);

            let target = &mut nodes[to];
            let arity = target.inputs.len();
            let Some(input) = target.inputs.get_mut(wire.to.port) else {
                return Err(GraphError::PortOutOfRange {
                    node: wire.to.node,
                    port: wire.to.port,
                    arity,
                    output: false,
                });
            };
            if matches!(input, InputSource::Wire(_)) {
                return Err(GraphError::InputAlreadyDriven {
                    node: wire.to.node,
                    port: wire.to.port,
                });
            }
            *input = source;
            edges.push((from, to));
        }

        let ids: Vec<NodeId> = nodes.iter().map(|n| n.id).collect();
        let delayed_flags: Vec<bool> = nodes
            .iter()
            .map(|n| n.node_type.provides_delay(&n.params))
            .collect();

        let dependencies = DependencyGraph::build(&ids, &edges, &delayed_flags);
        dependencies.check_combinational_cycles()?;
        let order: Vec<usize> = dependencies
            .execution_order()?
            .into_iter()
            .filter(|&slot| !delayed_flags[slot])
            .collect();
        let delayed: Vec<usize> = (0..nodes.len()).filter(|&s| delayed_flags[s]).collect();

        debug!(
            "Compiled circuit: {} nodes, {} same-tick edges, {} delayed edges, {} output ports",
            dependencies.node_count(),
            dependencies.edge_count(),
            dependencies.delayed_edge_count(),
            columns.len()
        );

        Ok(Self {
            nodes,
            order,
            delayed,
            columns,
            slot_of,
            initial_states,
            dependencies,
        })
    }

    /// Output ports in result-column order
    pub fn columns(&self) -> &[PortRef] {
        &self.columns
    }

    /// Number of node instances
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in the order they are evaluated each tick
    ///
    /// Delay-providing nodes are listed last: their committing evaluation
    /// happens after everything else.
    pub fn evaluation_order(&self) -> Vec<NodeId> {
        self.order
            .iter()
            .chain(self.delayed.iter())
            .map(|&slot| self.nodes[slot].id)
            .collect()
    }

    /// Fresh state arena (rehydrated state where the graph carried one)
    pub(crate) fn fresh_states(&self) -> Vec<Option<NodeState>> {
        self.initial_states.clone()
    }

    /// Slots holding nodes of `type_id`, ordered by node id
    pub(crate) fn slots_of_type(&self, type_id: &str) -> Vec<usize> {
        let mut slots: Vec<usize> = (0..self.nodes.len())
            .filter(|&s| self.nodes[s].node_type.type_id() == type_id)
            .collect();
        slots.sort_by_key(|&s| self.nodes[s].id);
        slots
    }

    /// First output slot of a node slot
    pub(crate) fn output_offset(&self, slot: usize) -> usize {
        self.nodes[slot].output_offset
    }

    /// True when `to` reads a value computed from `from` within one tick
    pub(crate) fn depends_same_tick(&self, from: usize, to: usize) -> bool {
        self.dependencies.has_path(from, to)
    }

    /// Check a saved state arena against every slot's node type and parameters
    pub(crate) fn check_states(&self, states: &[Option<NodeState>]) -> Result<(), String> {
        if states.len() != self.nodes.len() {
            return Err(format!(
                "expected {} inner states, found {}",
                self.nodes.len(),
                states.len()
            ));
        }
        for (node, state) in self.nodes.iter().zip(states) {
            match state {
                Some(state) => node
                    .node_type
                    .check_state(&node.params, state)
                    .map_err(|message| format!("inner node {}: {}", node.id, message))?,
                None if node.node_type.descriptor().stateful => {
                    return Err(format!("inner node {} has no state", node.id));
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Evaluate one tick
    ///
    /// `externals` holds one stimulus value per slot, `states` the run's
    /// arena, `values` receives every output port (column order).
    pub(crate) fn step_into(
        &self,
        tick: usize,
        externals: &[Signal],
        states: &mut [Option<NodeState>],
        values: &mut [Signal],
    ) -> Result<(), InvariantViolation> {
        let mut inputs: Vec<Signal> = Vec::new();

        // Phase 1: announce delayed outputs
        for &slot in &self.delayed {
            let node = &self.nodes[slot];
            let announced = node
                .node_type
                .peek(&node.params, states[slot].as_ref(), tick)?;
            check_outputs(node, tick, &announced)?;
            values[node.output_offset..node.output_offset + node.output_count]
                .copy_from_slice(&announced);
        }

        // Phase 2: combinational nodes in dependency order
        for &slot in &self.order {
            let node = &self.nodes[slot];
            gather_inputs(node, values, &mut inputs);
            let mut ctx = EvalContext {
                inputs: &inputs,
                params: &node.params,
                state: states[slot].as_mut(),
                tick,
                external: externals[slot],
            };
            let outputs = node.node_type.evaluate(&mut ctx)?;
            check_outputs(node, tick, &outputs)?;
            values[node.output_offset..node.output_offset + node.output_count]
                .copy_from_slice(&outputs);
        }

        // Phase 3: delayed nodes consume this tick's input
        for &slot in &self.delayed {
            let node = &self.nodes[slot];
            gather_inputs(node, values, &mut inputs);
            let mut ctx = EvalContext {
                inputs: &inputs,
                params: &node.params,
                state: states[slot].as_mut(),
                tick,
                external: externals[slot],
            };
            let outputs = node.node_type.evaluate(&mut ctx)?;
            check_outputs(node, tick, &outputs)?;

            let announced = &values[node.output_offset..node.output_offset + node.output_count];
            if let Some((&a, &c)) = announced
                .iter()
                .zip(&outputs)
                .find(|(a, c)| a.to_bits() != c.to_bits())
            {
                return Err(InvariantViolation::PeekMismatch {
                    type_id: node.node_type.type_id().to_string(),
                    tick,
                    announced: a,
                    committed: c,
                });
            }
        }

        trace!("tick {} evaluated", tick);
        Ok(())
    }

    /// Start a live, tick-by-tick run with fresh state
    pub fn simulate<'c>(&'c self, stimuli: &'c Stimuli) -> Simulation<'c> {
        Simulation::new(self, stimuli)
    }

    /// Evaluate ticks `0..window` and collect the full table
    ///
    /// Every call starts from fresh state, so repeated runs of the same
    /// circuit and stimuli are bit-for-bit identical.
    pub fn run(&self, stimuli: &Stimuli, window: usize) -> Result<CycleResults, InvariantViolation> {
        debug!("Running {} ticks over {} nodes", window, self.nodes.len());
        let mut simulation = self.simulate(stimuli);
        let mut results = CycleResults::with_capacity(self.columns.clone(), window);
        for _ in 0..window {
            let row = simulation.step()?;
            results.push_row(row);
        }
        info!("Run complete: {} ticks, digest {}", results.ticks(), results.digest());
        Ok(results)
    }
}

fn gather_inputs(node: &CompiledNode, values: &[Signal], inputs: &mut Vec<Signal>) {
    inputs.clear();
    inputs.extend(node.inputs.iter().map(|source| match *source {
        InputSource::Wire(slot) => values[slot],
        InputSource::Default(v) => v,
    }));
}

fn check_outputs(
    node: &CompiledNode,
    tick: usize,
    outputs: &[Signal],
) -> Result<(), InvariantViolation> {
    if outputs.len() != node.output_count {
        return Err(InvariantViolation::OutputArity {
            type_id: node.node_type.type_id().to_string(),
            expected: node.output_count,
            got: outputs.len(),
        });
    }
    if let Some((port, &value)) = outputs.iter().enumerate().find(|(_, v)| !in_range(**v)) {
        return Err(InvariantViolation::OutOfRange {
            type_id: node.node_type.type_id().to_string(),
            tick,
            port,
            value,
        });
    }
    Ok(())
}

/// A run in progress, advanced one tick at a time
///
/// Owns the state arena for its whole lifetime; nothing outside sees it
/// until [`Simulation::into_states`].
pub struct Simulation<'c> {
    circuit: &'c CompiledCircuit,
    stimulus_slots: Vec<(usize, &'c Waveform)>,
    states: Vec<Option<NodeState>>,
    externals: Vec<Signal>,
    values: Vec<Signal>,
    tick: usize,
}

impl<'c> Simulation<'c> {
    pub fn new(circuit: &'c CompiledCircuit, stimuli: &'c Stimuli) -> Self {
        let stimulus_slots = stimuli
            .iter()
            .filter_map(|(id, waveform)| circuit.slot_of.get(id).map(|&slot| (slot, waveform)))
            .collect();
        Self {
            circuit,
            stimulus_slots,
            states: circuit.fresh_states(),
            externals: vec![0.0; circuit.nodes.len()],
            values: vec![0.0; circuit.columns.len()],
            tick: 0,
        }
    }

    /// Index of the next tick to evaluate
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Evaluate the next tick, returning its row in column order
    pub fn step(&mut self) -> Result<&[Signal], InvariantViolation> {
        for &(slot, waveform) in &self.stimulus_slots {
            self.externals[slot] = waveform.sample(self.tick);
        }
        self.circuit
            .step_into(self.tick, &self.externals, &mut self.states, &mut self.values)?;
        self.tick += 1;
        Ok(&self.values)
    }

    /// Current value of one output port (after the last step)
    pub fn value(&self, port: PortRef) -> Option<Signal> {
        let column = self.circuit.columns.iter().position(|&c| c == port)?;
        Some(self.values[column])
    }

    /// Hand back the runtime state of every node, for saving
    pub fn into_states(self) -> Vec<(NodeId, Option<NodeState>)> {
        self.circuit
            .nodes
            .iter()
            .map(|n| n.id)
            .zip(self.states)
            .collect()
    }
}

/// Compile and run in one call
pub fn evaluate(
    graph: &CircuitGraph,
    registry: &NodeRegistry,
    stimuli: &Stimuli,
    window: usize,
) -> SimResult<CycleResults> {
    let circuit = CompiledCircuit::compile(graph, registry)?;
    Ok(circuit.run(stimuli, window)?)
}
