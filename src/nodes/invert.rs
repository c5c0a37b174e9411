/// Negate node - flips the sign of a signal
///
/// Out = -A. Negating 0 yields positive zero.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor};
use crate::signal::{clamp, Signal};

pub struct NegateNode {
    descriptor: NodeTypeDescriptor,
}

impl NegateNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("negate", Category::Arithmetic)
                .input(PortDescriptor::new("A"))
                .output(PortDescriptor::new("Out"))
                .footprint(1, 1),
        }
    }
}

impl Default for NegateNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for NegateNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        Ok(vec![clamp(-ctx.input(0))])
    }
}
