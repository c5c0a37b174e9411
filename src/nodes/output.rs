/// Output node - tap that exposes a signal to the puzzle checker
///
/// Identity: Out = In. Exists so a circuit's designated results have a
/// stable port to read, and so sub-circuits know which values to export.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor, PortSide};
use crate::signal::{clamp, Signal};

pub struct OutputNode {
    descriptor: NodeTypeDescriptor,
}

impl OutputNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("output", Category::Io)
                .input(PortDescriptor::new("In").on(PortSide::Left))
                .output(PortDescriptor::new("Out"))
                .footprint(1, 1),
        }
    }
}

impl Default for OutputNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for OutputNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        Ok(vec![clamp(ctx.input(0))])
    }
}
