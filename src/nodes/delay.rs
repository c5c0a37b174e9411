/// Delay node - multi-tick delay line with 0-16 subdivisions
///
/// Backed by a [`DelayLine`] of `subdivisions + 1` slots: write at the
/// cursor, read one slot ahead, advance. Output at tick t is the input from
/// tick t - subdivisions (0 before that). With 0 subdivisions the node is a
/// same-tick pass-through and cannot break a feedback loop.

use crate::error::InvariantViolation;
use crate::node_state::{DelayLine, NodeState, MAX_SUBDIVISIONS};
use crate::node_type::{
    missing_state, Category, EvalContext, NodeType, NodeTypeDescriptor, PortDescriptor, PortSide,
};
use crate::params::{ParamDescriptor, ParamValues};
use crate::signal::{clamp_to, Signal};

pub struct DelayNode {
    descriptor: NodeTypeDescriptor,
}

impl DelayNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeTypeDescriptor::new("delay", Category::Timing)
                .input(PortDescriptor::new("In").on(PortSide::Left))
                .output(PortDescriptor::new("Out").on(PortSide::Right))
                .param(ParamDescriptor::integer(
                    "subdivisions",
                    "Delay (ticks)",
                    1.0,
                    0.0,
                    MAX_SUBDIVISIONS as Signal,
                ))
                .footprint(3, 2)
                .stateful(),
        }
    }

    /// Subdivision count from a validated parameter map
    pub fn subdivisions(params: &ParamValues) -> usize {
        let raw = params.get("subdivisions").copied().unwrap_or(1.0);
        clamp_to(raw, 0.0, MAX_SUBDIVISIONS as Signal) as usize
    }
}

impl Default for DelayNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for DelayNode {
    fn descriptor(&self) -> &NodeTypeDescriptor {
        &self.descriptor
    }

    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Vec<Signal>, InvariantViolation> {
        let input = ctx.input(0);
        match ctx.state_mut() {
            Some(NodeState::Delay(line)) => Ok(vec![line.tick(input)]),
            _ => Err(missing_state(self)),
        }
    }

    fn create_state(&self, params: &ParamValues) -> Option<NodeState> {
        Some(NodeState::Delay(DelayLine::new(Self::subdivisions(params))))
    }

    fn check_state(&self, params: &ParamValues, state: &NodeState) -> Result<(), String> {
        let NodeState::Delay(line) = state else {
            return Err(format!("expected delay state, found {}", state.kind_name()));
        };
        line.check_shape()?;
        let expected = Self::subdivisions(params);
        if line.depth() != expected {
            return Err(format!(
                "delay buffer holds {} subdivisions, parameter says {}",
                line.depth(),
                expected
            ));
        }
        Ok(())
    }

    fn provides_delay(&self, params: &ParamValues) -> bool {
        Self::subdivisions(params) >= 1
    }

    fn peek(
        &self,
        _params: &ParamValues,
        state: Option<&NodeState>,
        _tick: usize,
    ) -> Result<Vec<Signal>, InvariantViolation> {
        match state {
            Some(NodeState::Delay(line)) => line
                .peek()
                .map(|v| vec![v])
                .ok_or_else(|| missing_state(self)),
            _ => Err(missing_state(self)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_for(subdivisions: usize) -> ParamValues {
        let mut params = ParamValues::new();
        params.insert("subdivisions".to_string(), subdivisions as Signal);
        params
    }

    fn run(subdivisions: usize, inputs: &[Signal]) -> Vec<Signal> {
        let node = DelayNode::new();
        let params = params_for(subdivisions);
        let mut state = node.create_state(&params);
        inputs
            .iter()
            .enumerate()
            .map(|(tick, &x)| {
                let input = [x];
                let mut ctx = EvalContext {
                    inputs: &input,
                    params: &params,
                    state: state.as_mut(),
                    tick,
                    external: 0.0,
                };
                node.evaluate(&mut ctx).unwrap()[0]
            })
            .collect()
    }

    #[test]
    fn test_delay_three_ticks() {
        let out = run(3, &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(out, vec![0.0, 0.0, 0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_delay_zero_pass_through() {
        let inputs = [5.0, -6.0, 7.0];
        assert_eq!(run(0, &inputs), inputs.to_vec());
        assert!(!DelayNode::new().provides_delay(&params_for(0)));
    }

    #[test]
    fn test_delay_sixteen_ticks() {
        let inputs: Vec<Signal> = (0..40).map(|i| (i % 7) as Signal * 10.0).collect();
        let out = run(16, &inputs);
        for t in 0..inputs.len() {
            let expected = if t >= 16 { inputs[t - 16] } else { 0.0 };
            assert_eq!(out[t], expected, "tick {}", t);
        }
    }

    #[test]
    fn test_subdivisions_read_within_bounds() {
        assert_eq!(DelayNode::subdivisions(&params_for(40)), MAX_SUBDIVISIONS);
        assert_eq!(DelayNode::subdivisions(&ParamValues::new()), 1);

        let mut params = ParamValues::new();
        params.insert("subdivisions".to_string(), -3.0);
        assert_eq!(DelayNode::subdivisions(&params), 0);
        params.insert("subdivisions".to_string(), Signal::NAN);
        assert_eq!(DelayNode::subdivisions(&params), 0);
    }

    #[test]
    fn test_delay_check_state_shape() {
        let node = DelayNode::new();
        let params = params_for(2);
        let good = NodeState::Delay(DelayLine::new(2));
        let wrong_depth = NodeState::Delay(DelayLine::new(5));
        assert!(node.check_state(&params, &good).is_ok());
        assert!(node.check_state(&params, &wrong_depth).is_err());
    }
}
