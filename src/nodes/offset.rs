/// Offset node - shifts a signal by a fixed amount
///
/// Out = clamp(A + amount). Unlike `add`, the amount cannot be wired.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor};
use crate::params::ParamDescriptor;
use crate::signal::{clamp, Signal};

pub struct OffsetNode {
    descriptor: NodeTypeDescriptor,
}

impl OffsetNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("offset", Category::Arithmetic)
                .input(PortDescriptor::new("A"))
                .output(PortDescriptor::new("Out"))
                .param(ParamDescriptor::integer("amount", "Offset", 0.0, -100.0, 100.0)),
        }
    }
}

impl Default for OffsetNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for OffsetNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        Ok(vec![clamp(ctx.input(0) + ctx.param("amount"))])
    }
}
