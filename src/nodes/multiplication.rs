/// Multiplication node - multiplies two signals on the percent scale
///
/// Out = clamp(A * B / 100), so 100 behaves as 1.0 and the product stays
/// inside the signal range.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor};
use crate::signal::{clamp, Signal};

pub struct MultiplicationNode {
    descriptor: NodeTypeDescriptor,
}

impl MultiplicationNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("multiply", Category::Arithmetic)
                .input(PortDescriptor::new("A"))
                .input(PortDescriptor::new("B"))
                .output(PortDescriptor::new("Out")),
        }
    }
}

impl Default for MultiplicationNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for MultiplicationNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        Ok(vec![clamp(ctx.input(0) * ctx.input(1) / 100.0)])
    }
}
