/// External input waveforms for `input` nodes
///
/// A puzzle supplies one waveform per input node. Sequences loop, so a short
/// pattern repeats across the whole window.

use crate::graph::NodeId;
use crate::signal::{clamp, Signal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values an input node presents, tick by tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Waveform {
    /// Same value every tick
    Constant(Signal),
    /// Sequence repeated modulo its length (empty reads 0)
    Samples(Vec<Signal>),
}

impl Waveform {
    /// Clamped value at `tick`
    pub fn sample(&self, tick: usize) -> Signal {
        match self {
            Waveform::Constant(v) => clamp(*v),
            Waveform::Samples(values) if values.is_empty() => 0.0,
            Waveform::Samples(values) => clamp(values[tick % values.len()]),
        }
    }
}

/// Waveform per input node
pub type Stimuli = BTreeMap<NodeId, Waveform>;
