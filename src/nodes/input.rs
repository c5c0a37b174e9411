/// Input node - feeds an external stimulus into the circuit
///
/// Source node with no inputs. Its single output carries whatever the run's
/// stimulus supplies for this node at the current tick, clamped to signal
/// range. Without a stimulus it reads 0.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor, PortSide};
use crate::signal::{clamp, Signal};

pub struct InputNode {
    descriptor: NodeTypeDescriptor,
}

impl InputNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("input", Category::Io)
                .output(PortDescriptor::new("Out").on(PortSide::Right))
                .footprint(1, 1),
        }
    }
}

impl Default for InputNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for InputNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        Ok(vec![clamp(ctx.external)])
    }
}
