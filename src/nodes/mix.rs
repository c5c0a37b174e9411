/// Mix node - combines two signals with a selectable operation
///
/// The `mode` parameter picks the combination:
///
/// | mode | output |
/// |------|--------|
/// | 0 | A + B |
/// | 1 | A - B |
/// | 2 | (A + B) / 2 |
/// | 3 | max(A, B) |
/// | 4 | min(A, B) |
///
/// Every mode clamps.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor};
use crate::params::ParamDescriptor;
use crate::signal::{clamp, Signal};

/// Combination selected by the `mode` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixMode {
    Add,
    Subtract,
    Average,
    Max,
    Min,
}

impl MixMode {
    /// Decode a validated `mode` parameter value
    pub fn from_param(value: Signal) -> Self {
        match value as i32 {
            1 => MixMode::Subtract,
            2 => MixMode::Average,
            3 => MixMode::Max,
            4 => MixMode::Min,
            _ => MixMode::Add,
        }
    }

    pub fn apply(self, a: Signal, b: Signal) -> Signal {
        clamp(match self {
            MixMode::Add => a + b,
            MixMode::Subtract => a - b,
            MixMode::Average => (a + b) / 2.0,
            MixMode::Max => a.max(b),
            MixMode::Min => a.min(b),
        })
    }
}

pub struct MixNode {
    descriptor: NodeTypeDescriptor,
}

impl MixNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("mix", Category::Arithmetic)
                .input(PortDescriptor::new("A"))
                .input(PortDescriptor::new("B"))
                .output(PortDescriptor::new("Out"))
                .param(ParamDescriptor::integer("mode", "Mode", 0.0, 0.0, 4.0))
                .footprint(2, 3),
        }
    }
}

impl Default for MixNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for MixNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        let mode = MixMode::from_param(ctx.param("mode"));
        Ok(vec![mode.apply(ctx.input(0), ctx.input(1))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::eval_pure;
    use crate::params::ParamValues;

    fn mix_with(mode: Signal, a: Signal, b: Signal) -> Signal {
        let mut params = ParamValues::new();
        params.insert("mode".to_string(), mode);
        eval_pure(&MixNode::new(), &[a, b], &params)[0]
    }

    #[test]
    fn test_mix_modes() {
        assert_eq!(mix_with(0.0, 60.0, 60.0), 100.0);
        assert_eq!(mix_with(1.0, 10.0, 60.0), -50.0);
        assert_eq!(mix_with(2.0, 10.0, 60.0), 35.0);
        assert_eq!(mix_with(3.0, 10.0, 60.0), 60.0);
        assert_eq!(mix_with(4.0, 10.0, 60.0), 10.0);
    }

    #[test]
    fn test_mix_subtract_clamps() {
        assert_eq!(mix_with(1.0, -90.0, 90.0), -100.0);
    }
}
