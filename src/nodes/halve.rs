/// Halve node - splits a signal into two equal halves
///
/// Both outputs carry A / 2, so wiring them back through an add node
/// restores the original.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor, PortSide};
use crate::signal::{clamp, Signal};

pub struct HalveNode {
    descriptor: NodeTypeDescriptor,
}

impl HalveNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("halve", Category::Routing)
                .input(PortDescriptor::new("In").on(PortSide::Left))
                .output(PortDescriptor::new("Half 1").on(PortSide::Right))
                .output(PortDescriptor::new("Half 2").on(PortSide::Bottom)),
        }
    }
}

impl Default for HalveNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for HalveNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        let half = clamp(ctx.input(0) / 2.0);
        Ok(vec![half, half])
    }
}
