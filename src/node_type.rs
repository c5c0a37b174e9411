/// Node type contract - core abstraction for the circuit evaluator
///
/// Every node kind, pure or stateful, implements [`NodeType`]: given the
/// inputs for one tick, its parameters, a handle to its runtime state and the
/// tick index, produce one value per declared output port.
///
/// The descriptor half ([`NodeTypeDescriptor`]) is plain data: ports,
/// parameters and layout hints the editor and renderer consume. The
/// evaluation half is the trait method set.

use crate::error::InvariantViolation;
use crate::node_state::NodeState;
use crate::params::{ParamDescriptor, ParamValues};
use crate::signal::Signal;
use serde::{Deserialize, Serialize};

/// Classification used by the editor palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Io,
    Arithmetic,
    Routing,
    Comparison,
    Timing,
    Circuit,
}

/// Which edge of the node body a port is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// One input or output slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<PortSide>,
    /// Parameter whose value this input reads while it has no wire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knob: Option<String>,
}

impl PortDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            side: None,
            knob: None,
        }
    }

    pub fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn on(mut self, side: PortSide) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_knob(mut self, param_key: &str) -> Self {
        self.knob = Some(param_key.to_string());
        self
    }
}

/// Grid cells a node occupies (rendering only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            width: 2,
            height: 2,
        }
    }
}

/// Immutable description of one node kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeDescriptor {
    #[serde(rename = "type")]
    pub type_id: String,
    pub category: Category,
    pub inputs: Vec<PortDescriptor>,
    pub outputs: Vec<PortDescriptor>,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
    #[serde(default)]
    pub footprint: Footprint,
    /// True when instances carry runtime state
    #[serde(default)]
    pub stateful: bool,
}

impl NodeTypeDescriptor {
    pub fn new(type_id: &str, category: Category) -> Self {
        Self {
            type_id: type_id.to_string(),
            category,
            inputs: Vec::new(),
            outputs: Vec::new(),
            params: Vec::new(),
            footprint: Footprint::default(),
            stateful: false,
        }
    }

    pub fn input(mut self, port: PortDescriptor) -> Self {
        self.inputs.push(port);
        self
    }

    pub fn output(mut self, port: PortDescriptor) -> Self {
        self.outputs.push(port);
        self
    }

    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    pub fn footprint(mut self, width: u32, height: u32) -> Self {
        self.footprint = Footprint { width, height };
        self
    }

    pub fn stateful(mut self) -> Self {
        self.stateful = true;
        self
    }

    pub fn find_param(&self, key: &str) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.key == key)
    }
}

/// Everything one node sees for one evaluation at one tick
pub struct EvalContext<'a> {
    /// Input values in declared port order
    pub inputs: &'a [Signal],
    /// Current parameter values
    pub params: &'a ParamValues,
    /// This instance's runtime state (None for stateless kinds)
    pub state: Option<&'a mut NodeState>,
    /// Absolute tick index within the run
    pub tick: usize,
    /// Stimulus value for source nodes that read from outside the circuit
    pub external: Signal,
}

impl<'a> EvalContext<'a> {
    /// Input value by port index (0 for ports the caller did not supply)
    #[inline]
    pub fn input(&self, port: usize) -> Signal {
        self.inputs.get(port).copied().unwrap_or(0.0)
    }

    /// Parameter value by key (0 when absent)
    #[inline]
    pub fn param(&self, key: &str) -> Signal {
        self.params.get(key).copied().unwrap_or(0.0)
    }

    /// Mutable access to the runtime state
    pub fn state_mut(&mut self) -> Option<&mut NodeState> {
        self.state.as_deref_mut()
    }
}

/// Core trait for circuit node kinds
///
/// Implementations are stateless themselves; per-instance memory lives in a
/// [`NodeState`] owned by the running engine and handed in through the
/// context.
pub trait NodeType: Send + Sync {
    /// Ports, parameters and layout metadata
    fn descriptor(&self) -> &NodeTypeDescriptor;

    /// Type identifier ("add", "delay", ...)
    fn type_id(&self) -> &str {
        &self.descriptor().type_id
    }

    /// Evaluate one tick
    ///
    /// Must return exactly one value per declared output, each already in
    /// signal range. The engine checks both and reports a violation rather
    /// than re-clamping.
    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation>;

    /// Fresh runtime state for a new instance (None for stateless kinds)
    fn create_state(&self, _params: &ParamValues) -> Option<NodeState> {
        None
    }

    /// Check that rehydrated state fits an instance with these parameters
    fn check_state(&self, params: &ParamValues, state: &NodeState) -> Result<(), String> {
        match self.create_state(params) {
            Some(fresh) if fresh.kind_name() == state.kind_name() => Ok(()),
            Some(fresh) => Err(format!(
                "expected {} state, found {}",
                fresh.kind_name(),
                state.kind_name()
            )),
            None => Err(format!("{} is stateless", self.type_id())),
        }
    }

    /// Returns true if this node's output never depends on same-tick input
    ///
    /// Such nodes can sit on a feedback loop: they announce their output
    /// via [`NodeType::peek`] before the loop is evaluated, and consume their
    /// input afterwards.
    fn provides_delay(&self, _params: &ParamValues) -> bool {
        false
    }

    /// Outputs the next [`NodeType::evaluate`] call at `tick` will return
    ///
    /// Only called for nodes where `provides_delay` is true. Must not
    /// change `state`.
    fn peek(
        &self,
        _params: &ParamValues,
        _state: Option<&NodeState>,
        _tick: usize,
    ) -> Result<Vec<Signal>, InvariantViolation> {
        Err(InvariantViolation::MissingState {
            type_id: self.type_id().to_string(),
        })
    }
}

/// Violation for a stateful node handed no (or the wrong) state
pub fn missing_state(node: &dyn NodeType) -> InvariantViolation {
    InvariantViolation::MissingState {
        type_id: node.type_id().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamDescriptor;

    #[test]
    fn test_descriptor_builder() {
        let desc = NodeTypeDescriptor::new("add", Category::Arithmetic)
            .input(PortDescriptor::new("A").on(PortSide::Left))
            .input(PortDescriptor::new("X").with_knob("amount"))
            .output(PortDescriptor::new("Out").described("A + X"))
            .param(ParamDescriptor::integer("amount", "Amount", 0.0, -100.0, 100.0))
            .footprint(3, 2);

        assert_eq!(desc.inputs.len(), 2);
        assert_eq!(desc.inputs[1].knob.as_deref(), Some("amount"));
        assert_eq!(desc.footprint, Footprint { width: 3, height: 2 });
        assert!(desc.find_param("amount").is_some());
        assert!(!desc.stateful);
    }

    #[test]
    fn test_context_defaults() {
        let params = ParamValues::new();
        let inputs = [12.0];
        let ctx = EvalContext {
            inputs: &inputs,
            params: &params,
            state: None,
            tick: 0,
            external: 0.0,
        };
        assert_eq!(ctx.input(0), 12.0);
        assert_eq!(ctx.input(5), 0.0);
        assert_eq!(ctx.param("missing"), 0.0);
    }

    #[test]
    fn test_descriptor_serializes_type_key() {
        let desc = NodeTypeDescriptor::new("negate", Category::Arithmetic)
            .input(PortDescriptor::new("A"))
            .output(PortDescriptor::new("Out"));
        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["type"], "negate");
        assert_eq!(json["category"], "arithmetic");
        assert!(json["inputs"][0].get("knob").is_none());
    }
}
