/// Built-in node catalog
///
/// One file per node kind, each implementing [`NodeType`](crate::node_type::NodeType).
///
/// # Node Categories
///
/// ## I/O Nodes
/// - [`input::InputNode`] - External stimulus source
/// - [`output::OutputNode`] - Identity tap for checked results
/// - [`constant::ConstantNode`] - Fixed parameter value
///
/// ## Arithmetic Nodes (each clamps)
/// - [`addition::AdditionNode`] - A + X, X knob-bound to `amount`
/// - [`offset::OffsetNode`] - A + amount
/// - [`gain::AmplifyNode`] - A * X / 100, X knob-bound to `gain`
/// - [`multiplication::MultiplicationNode`] - A * B / 100
/// - [`average::AverageNode`] - (A + B) / 2
/// - [`max::MaxNode`] / [`min::MinNode`] - larger / smaller input
/// - [`mix::MixNode`] - add, subtract, average, max or min by `mode`
/// - [`invert::NegateNode`] - -A
/// - [`polarity::PolarityNode`] - snap to +100 / 0 / -100
///
/// ## Routing Nodes
/// - [`duplicate::DuplicateNode`] - one input onto two outputs
/// - [`halve::HalveNode`] - A / 2 onto two outputs
/// - [`merge::MergeNode`] - two inputs averaged into one
///
/// ## Comparison Nodes (output is exactly +100 or -100)
/// - [`threshold::ThresholdNode`] - A >= X (inclusive)
/// - [`greater_than::GreaterThanNode`] - A > B (exclusive)
///
/// ## Timing Nodes (stateful, may close feedback loops)
/// - [`memory::MemoryNode`] - one-tick delay
/// - [`delay::DelayNode`] - 0-16 tick delay line

pub mod addition;
pub mod average;
pub mod constant;
pub mod delay;
pub mod duplicate;
pub mod gain;
pub mod greater_than;
pub mod halve;
pub mod input;
pub mod invert;
pub mod max;
pub mod memory;
pub mod merge;
pub mod min;
pub mod mix;
pub mod multiplication;
pub mod offset;
pub mod output;
pub mod polarity;
pub mod threshold;

use crate::node_type::NodeType;
use std::sync::Arc;

/// Every built-in node kind, in palette order
pub fn builtin() -> Vec<Arc<dyn NodeType>> {
    vec![
        Arc::new(input::InputNode::new()),
        Arc::new(output::OutputNode::new()),
        Arc::new(constant::ConstantNode::new()),
        Arc::new(addition::AdditionNode::new()),
        Arc::new(offset::OffsetNode::new()),
        Arc::new(gain::AmplifyNode::new()),
        Arc::new(multiplication::MultiplicationNode::new()),
        Arc::new(average::AverageNode::new()),
        Arc::new(max::MaxNode::new()),
        Arc::new(min::MinNode::new()),
        Arc::new(mix::MixNode::new()),
        Arc::new(invert::NegateNode::new()),
        Arc::new(polarity::PolarityNode::new()),
        Arc::new(duplicate::DuplicateNode::new()),
        Arc::new(halve::HalveNode::new()),
        Arc::new(merge::MergeNode::new()),
        Arc::new(threshold::ThresholdNode::new()),
        Arc::new(greater_than::GreaterThanNode::new()),
        Arc::new(memory::MemoryNode::new()),
        Arc::new(delay::DelayNode::new()),
    ]
}

/// Evaluate a stateless node once, filling knob-bound inputs like the engine
#[cfg(test)]
pub(crate) fn eval_pure(
    node: &dyn NodeType,
    inputs: &[crate::signal::Signal],
    params: &crate::params::ParamValues,
) -> Vec<crate::signal::Signal> {
    use crate::node_type::EvalContext;

    let descriptor = node.descriptor();
    let mut resolved: Vec<crate::signal::Signal> = inputs.to_vec();
    for desc in descriptor.inputs.iter().skip(inputs.len()) {
        let value = desc
            .knob
            .as_deref()
            .and_then(|key| {
                params
                    .get(key)
                    .copied()
                    .or_else(|| descriptor.find_param(key).map(|p| p.default))
            })
            .unwrap_or(0.0);
        resolved.push(value);
    }

    let mut ctx = EvalContext {
        inputs: &resolved,
        params,
        state: None,
        tick: 0,
        external: 0.0,
    };
    node.evaluate(&mut ctx).expect("stateless node evaluation")
}
