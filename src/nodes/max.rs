/// Max node - larger of two signals

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor};
use crate::signal::{clamp, Signal};

pub struct MaxNode {
    descriptor: NodeTypeDescriptor,
}

impl MaxNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("max", Category::Arithmetic)
                .input(PortDescriptor::new("A"))
                .input(PortDescriptor::new("B"))
                .output(PortDescriptor::new("Out")),
        }
    }
}

impl Default for MaxNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for MaxNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        Ok(vec![clamp(ctx.input(0).max(ctx.input(1)))])
    }
}
