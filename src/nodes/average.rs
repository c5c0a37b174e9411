/// Average node - arithmetic mean of two signals

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor};
use crate::signal::{clamp, Signal};

pub struct AverageNode {
    descriptor: NodeTypeDescriptor,
}

impl AverageNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("average", Category::Arithmetic)
                .input(PortDescriptor::new("A"))
                .input(PortDescriptor::new("B"))
                .output(PortDescriptor::new("Out")),
        }
    }
}

impl Default for AverageNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for AverageNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        Ok(vec![clamp((ctx.input(0) + ctx.input(1)) / 2.0)])
    }
}
