/// Memory node - one-tick delay
///
/// Emits the value it stored on the previous tick, then stores the current
/// input (read before write). Tick 0 emits 0. Because its output never
/// depends on the current tick's input, a memory node may close a feedback
/// loop.

use crate::error::InvariantViolation;
use crate::node_state::{MemoryCell, NodeState};
use crate::node_type::{
    missing_state, Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor, PortSide,
};
use crate::params::ParamValues;
use crate::signal::{clamp, Signal};

pub struct MemoryNode {
    descriptor: NodeTypeDescriptor,
}

impl MemoryNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("memory", Category::Timing)
                .input(PortDescriptor::new("In").on(PortSide::Left))
                .output(
                    PortDescriptor::new("Out")
                        .described("Input from the previous tick")
                        .on(PortSide::Right),
                )
                .stateful(),
        }
    }
}

impl Default for MemoryNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for MemoryNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        let input = ctx.input(0);
        match ctx.state_mut() {
            Some(NodeState::Memory(cell)) => Ok(vec![clamp(cell.tick(input))]),
            _ => Err(missing_state(self)),
        }
    }

    fn create_state(&self, _params: &ParamValues) -> Option<NodeState> {
        Some(NodeState::Memory(MemoryCell::new()))
    }

    fn provides_delay(&self, _params: &ParamValues) -> bool {
        true
    }

    fn peek(
        &self,
        _params: &ParamValues,
        state: Option<&NodeState>,
        _tick: usize,
    ) -> Result<Vec<Signal>, InvariantViolation> {
        match state {
            Some(NodeState::Memory(cell)) => Ok(vec![clamp(cell.peek())]),
            _ => Err(missing_state(self)),
        }
    }
}
