/// Duplicate node - copies one signal onto two outputs

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor, PortSide};
use crate::signal::{clamp, Signal};

pub struct DuplicateNode {
    descriptor: NodeTypeDescriptor,
}

impl DuplicateNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("duplicate", Category::Routing)
                .input(PortDescriptor::new("In").on(PortSide::Left))
                .output(PortDescriptor::new("Out 1").on(PortSide::Right))
                .output(PortDescriptor::new("Out 2").on(PortSide::Bottom)),
        }
    }
}

impl Default for DuplicateNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for DuplicateNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        let value = clamp(ctx.input(0));
        Ok(vec![value, value])
    }
}
