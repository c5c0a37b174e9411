/// Amplify node - scales a signal by a percentage
///
/// Out = clamp(A * X / 100). X is the gain in percent and follows the `gain`
/// knob (default 100, unity) while unwired.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor, PortSide};
use crate::params::ParamDescriptor;
use crate::signal::{clamp, Signal};

pub struct AmplifyNode {
    descriptor: NodeTypeDescriptor,
}

impl AmplifyNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("amplify", Category::Arithmetic)
                .input(PortDescriptor::new("A").on(PortSide::Left))
                .input(
                    PortDescriptor::new("X")
                        .described("Gain in percent")
                        .on(PortSide::Top)
                        .with_knob("gain"),
                )
                .output(PortDescriptor::new("Out").on(PortSide::Right))
                .param(ParamDescriptor::integer("gain", "Gain %", 100.0, -100.0, 100.0)),
        }
    }
}

impl Default for AmplifyNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for AmplifyNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        Ok(vec![clamp(ctx.input(0) * ctx.input(1) / 100.0)])
    }
}
