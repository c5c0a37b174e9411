/// Merge node - joins two wires into one by averaging

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor, PortSide};
use crate::signal::{clamp, Signal};

pub struct MergeNode {
    descriptor: NodeTypeDescriptor,
}

impl MergeNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("merge", Category::Routing)
                .input(PortDescriptor::new("In 1").on(PortSide::Left))
                .input(PortDescriptor::new("In 2").on(PortSide::Top))
                .output(PortDescriptor::new("Out").on(PortSide::Right)),
        }
    }
}

impl Default for MergeNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for MergeNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        Ok(vec![clamp((ctx.input(0) + ctx.input(1)) / 2.0)])
    }
}
