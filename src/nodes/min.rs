/// Min node - smaller of two signals

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor};
use crate::signal::{clamp, Signal};

pub struct MinNode {
    descriptor: NodeTypeDescriptor,
}

impl MinNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("min", Category::Arithmetic)
                .input(PortDescriptor::new("A"))
                .input(PortDescriptor::new("B"))
                .output(PortDescriptor::new("Out")),
        }
    }
}

impl Default for MinNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for MinNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        Ok(vec![clamp(ctx.input(0).min(ctx.input(1)))])
    }
}
