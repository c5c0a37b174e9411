/// Constant node - outputs a fixed, parameter-controlled value
///
/// Source node with no inputs: Out = value.

use crate::error::InvariantViolation;
use crate::node_type::{Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor};
use crate::params::ParamDescriptor;
use crate::signal::{clamp, Signal};

/// Constant node: out = value
///
/// # Example
/// ```
/// use tickwire::node_type::NodeType;
/// use tickwire::nodes::constant::ConstantNode;
///
/// let node = ConstantNode::new();
/// assert_eq!(node.type_id(), "constant");
/// ```
pub struct ConstantNode {
    descriptor: NodeTypeDescriptor,
}

impl ConstantNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("constant", Category::Io)
                .output(PortDescriptor::new("Out"))
                .param(ParamDescriptor::integer("value", "Value", 0.0, -100.0, 100.0))
                .footprint(1, 1),
        }
    }
}

impl Default for ConstantNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for ConstantNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        Ok(vec![clamp(ctx.param("value"))])
    }
}
