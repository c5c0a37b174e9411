/// Polarity node - snaps a signal to full scale in its own direction
///
/// Out = +100 for A > 0, -100 for A < 0, and 0 for A == 0.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor};
use crate::signal::{Signal, SIGNAL_MAX, SIGNAL_MIN};

pub struct PolarityNode {
    descriptor: NodeTypeDescriptor,
}

impl PolarityNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("polarity", Category::Arithmetic)
                .input(PortDescriptor::new("A"))
                .output(PortDescriptor::new("Out"))
                .footprint(1, 1),
        }
    }
}

impl Default for PolarityNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for PolarityNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        let a = ctx.input(0);
        let out = if a > 0.0 {
            SIGNAL_MAX
        } else if a < 0.0 {
            SIGNAL_MIN
        } else {
            0.0
        };
        Ok(vec![out])
    }
}
