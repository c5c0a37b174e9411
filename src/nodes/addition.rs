/// Addition node - sums A with a knob-bound second operand
///
/// Out = clamp(A + X). While X has no wire it reads the `amount` knob, so a
/// lone add node doubles as a fixed offset.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor, PortSide};
use crate::params::ParamDescriptor;
use crate::signal::{clamp, Signal};

/// Addition node: out = clamp(a + x)
pub struct AdditionNode {
    descriptor: NodeTypeDescriptor,
}

impl AdditionNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("add", Category::Arithmetic)
                .input(PortDescriptor::new("A").on(PortSide::Left))
                .input(
                    PortDescriptor::new("X")
                        .described("Added to A; follows the amount knob when unwired")
                        .on(PortSide::Top)
                        .with_knob("amount"),
                )
                .output(PortDescriptor::new("Out").on(PortSide::Right))
                .param(ParamDescriptor::integer("amount", "Amount", 0.0, -100.0, 100.0)),
        }
    }
}

impl Default for AdditionNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for AdditionNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        Ok(vec![clamp(ctx.input(0) + ctx.input(1))])
    }
}
