/// Per-instance runtime state for stateful node kinds
///
/// - [`MemoryCell`] - one-tick memory (read before write)
/// - [`DelayLine`] - circular buffer of `subdivisions + 1` slots
/// - [`CircuitState`] - state arena of a nested sub-circuit
///
/// Stateless kinds carry no state at all (`Option<NodeState>::None`).
/// The serialized shape is the persisted form: memory is one scalar, delay
/// is the ordered slot list plus the write cursor.

use crate::signal::{clamp, Signal};
use serde::{Deserialize, Serialize};

/// Largest subdivision count a delay line accepts
pub const MAX_SUBDIVISIONS: usize = 16;

/// Runtime state, polymorphic over node kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeState {
    Memory(MemoryCell),
    Delay(DelayLine),
    Circuit(CircuitState),
}

impl NodeState {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeState::Memory(_) => "memory",
            NodeState::Delay(_) => "delay",
            NodeState::Circuit(_) => "circuit",
        }
    }
}

/// One-slot memory: outputs what it stored last tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryCell {
    #[serde(rename = "previousValue")]
    pub previous_value: Signal,
}

impl MemoryCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value this cell will emit on its next tick
    pub fn peek(&self) -> Signal {
        self.previous_value
    }

    /// Emit the stored value, then store `input`
    pub fn tick(&mut self, input: Signal) -> Signal {
        let out = self.previous_value;
        self.previous_value = input;
        out
    }
}

/// Circular delay buffer with a write cursor
///
/// Each tick writes at the cursor and reads one slot ahead, which is the
/// oldest value still held. A buffer of `d + 1` slots therefore delays by
/// exactly `d` ticks; a single slot is pass-through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDelayLine")]
pub struct DelayLine {
    buffer: Vec<Signal>,
    cursor: usize,
}

/// Persisted delay line before its shape is checked
#[derive(Deserialize)]
struct RawDelayLine {
    buffer: Vec<Signal>,
    cursor: usize,
}

impl TryFrom<RawDelayLine> for DelayLine {
    type Error = String;

    fn try_from(raw: RawDelayLine) -> Result<Self, Self::Error> {
        DelayLine::from_parts(raw.buffer, raw.cursor)
    }
}

impl DelayLine {
    /// Zero-filled line for `subdivisions` ticks of latency
    ///
    /// Counts above [`MAX_SUBDIVISIONS`] are clamped; callers are expected to
    /// pass a validated count.
    pub fn new(subdivisions: usize) -> Self {
        let len = subdivisions.min(MAX_SUBDIVISIONS) + 1;
        Self {
            buffer: vec![0.0; len],
            cursor: 0,
        }
    }

    /// Rebuild a line from its persisted parts
    pub fn from_parts(buffer: Vec<Signal>, cursor: usize) -> Result<Self, String> {
        let line = Self { buffer, cursor };
        line.check_shape()?;
        Ok(line)
    }

    /// Ticks of latency this line introduces
    pub fn depth(&self) -> usize {
        self.buffer.len().saturating_sub(1)
    }

    /// Current write cursor
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Slot contents in storage order
    pub fn slots(&self) -> &[Signal] {
        &self.buffer
    }

    /// Value the next tick will emit, provided `depth() >= 1`
    ///
    /// With a single slot the next output is the next input, so there is
    /// nothing to announce ahead of time.
    pub fn peek(&self) -> Option<Signal> {
        if self.buffer.len() < 2 {
            return None;
        }
        let read = (self.cursor + 1) % self.buffer.len();
        Some(clamp(self.buffer[read]))
    }

    /// Write `input`, read the oldest slot, advance the cursor
    pub fn tick(&mut self, input: Signal) -> Signal {
        let len = self.buffer.len();
        self.buffer[self.cursor] = input;
        let read = (self.cursor + 1) % len;
        let out = clamp(self.buffer[read]);
        self.cursor = read;
        out
    }

    /// Verify length is within 1..=17 and the cursor points inside it
    pub fn check_shape(&self) -> Result<(), String> {
        let len = self.buffer.len();
        if len == 0 || len > MAX_SUBDIVISIONS + 1 {
            return Err(format!(
                "delay buffer length {} outside 1..={}",
                len,
                MAX_SUBDIVISIONS + 1
            ));
        }
        if self.cursor >= len {
            return Err(format!("delay cursor {} beyond buffer length {}", self.cursor, len));
        }
        Ok(())
    }
}

/// State arena of a nested sub-circuit, indexed by inner evaluation slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitState {
    pub states: Vec<Option<NodeState>>,
}
