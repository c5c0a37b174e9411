/// Compare node - binary gate on A strictly greater than B
///
/// Out = +100 when A > B, otherwise -100. The boundary is exclusive: equal
/// inputs read low. This is the counterpart of `threshold`, which is
/// inclusive.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor};
use crate::signal::{Signal, SIGNAL_MAX, SIGNAL_MIN};

pub struct GreaterThanNode {
    descriptor: NodeTypeDescriptor,
}

impl GreaterThanNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("compare", Category::Comparison)
                .input(PortDescriptor::new("A"))
                .input(PortDescriptor::new("B"))
                .output(PortDescriptor::new("A > B")),
        }
    }
}

impl Default for GreaterThanNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for GreaterThanNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        let out = if ctx.input(0) > ctx.input(1) {
            SIGNAL_MAX
        } else {
            SIGNAL_MIN
        };
        Ok(vec![out])
    }
}
