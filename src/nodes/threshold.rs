/// Threshold node - binary gate against a knob-bound level
///
/// Out = +100 when A >= X, otherwise -100. The boundary is inclusive: a
/// signal sitting exactly on the level reads high. X follows the `level`
/// knob while unwired.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor, PortSide};
use crate::params::ParamDescriptor;
use crate::signal::{Signal, SIGNAL_MAX, SIGNAL_MIN};

pub struct ThresholdNode {
    descriptor: NodeTypeDescriptor,
}

impl ThresholdNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("threshold", Category::Comparison)
                .input(PortDescriptor::new("A").on(PortSide::Left))
                .input(
                    PortDescriptor::new("X")
                        .described("Level; A >= X reads high")
                        .on(PortSide::Top)
                        .with_knob("level"),
                )
                .output(PortDescriptor::new("Out").on(PortSide::Right))
                .param(ParamDescriptor::integer("level", "Level", 0.0, -100.0, 100.0)),
        }
    }
}

impl Default for ThresholdNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for ThresholdNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        let out = if ctx.input(0) >= ctx.input(1) {
            SIGNAL_MAX
        } else {
            SIGNAL_MIN
        };
        Ok(vec![out])
    }
}
