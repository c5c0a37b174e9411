/// Error taxonomy for circuit editing, compilation and evaluation
///
/// Three classes, so callers can tell "fix your parameters" from "fix your
/// graph" from "the engine (or a node rule) is broken":
/// - [`ConfigError`] - rejected at the editing boundary
/// - [`GraphError`] - rejected at graph-build time
/// - [`InvariantViolation`] - an evaluate rule broke its contract
///
/// Nothing here is retried: evaluation is a pure function of graph,
/// parameters and window length.

use crate::graph::NodeId;
use crate::signal::Signal;
use std::fmt;

/// Parameter or configuration problem
#[derive(Debug)]
pub enum ConfigError {
    /// Node type has no parameter with this key
    UnknownParam { type_id: String, key: String },
    /// Value outside the declared inclusive range
    OutOfRange {
        key: String,
        value: Signal,
        min: Signal,
        max: Signal,
    },
    /// Value does not land on the declared step grid
    OffStep { key: String, value: Signal, step: Signal },
    /// Integer parameter given a fractional value
    NotIntegral { key: String, value: Signal },
    /// Rehydrated runtime state does not fit the node it was attached to
    StateShape { node: NodeId, message: String },
    /// Node id not present in the graph
    UnknownNode(NodeId),
    /// Configuration file could not be read
    Io(std::io::Error),
    /// Configuration file could not be parsed
    Parse(String),
    /// Configuration value rejected
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownParam { type_id, key } => {
                write!(f, "Node type '{}' has no parameter '{}'", type_id, key)
            }
            ConfigError::OutOfRange {
                key,
                value,
                min,
                max,
            } => write!(
                f,
                "Parameter '{}' = {} outside [{}, {}]",
                key, value, min, max
            ),
            ConfigError::OffStep { key, value, step } => {
                write!(f, "Parameter '{}' = {} is not a multiple of step {}", key, value, step)
            }
            ConfigError::NotIntegral { key, value } => {
                write!(f, "Parameter '{}' must be an integer, got {}", key, value)
            }
            ConfigError::StateShape { node, message } => {
                write!(f, "Runtime state for node {} does not fit: {}", node, message)
            }
            ConfigError::UnknownNode(id) => write!(f, "No node with id {}", id),
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

/// Structural problem with the circuit topology
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Two node instances share an id
    DuplicateNode(NodeId),
    /// Instance references a type the registry does not know
    UnknownNodeType { node: NodeId, type_id: String },
    /// Wire endpoint names a node that is not in the graph
    DanglingWire { from: NodeId, to: NodeId },
    /// Wire endpoint names a port beyond the node's declared arity
    PortOutOfRange {
        node: NodeId,
        port: usize,
        arity: usize,
        output: bool,
    },
    /// More than one wire drives the same input port
    InputAlreadyDriven { node: NodeId, port: usize },
    /// Same-tick loop with no memory/delay node on it
    CombinationalCycle(Vec<NodeId>),
    /// Saved runtime state does not fit the node's kind or parameters
    StateMismatch { node: NodeId, message: String },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::DuplicateNode(id) => write!(f, "Duplicate node id {}", id),
            GraphError::UnknownNodeType { node, type_id } => {
                write!(f, "Node {} has unknown type '{}'", node, type_id)
            }
            GraphError::DanglingWire { from, to } => {
                write!(f, "Wire {} -> {} references a missing node", from, to)
            }
            GraphError::PortOutOfRange {
                node,
                port,
                arity,
                output,
            } => write!(
                f,
                "Node {} has {} {} port(s), wire uses port {}",
                node,
                arity,
                if *output { "output" } else { "input" },
                port
            ),
            GraphError::InputAlreadyDriven { node, port } => {
                write!(f, "Input port {} of node {} is driven by more than one wire", port, node)
            }
            GraphError::CombinationalCycle(nodes) => write!(
                f,
                "Combinational cycle through nodes {:?} (insert a memory or delay node)",
                nodes
            ),
            GraphError::StateMismatch { node, message } => {
                write!(f, "Saved state of node {} cannot be used: {}", node, message)
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// A node evaluate rule broke its contract during a run
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// Returned a different number of outputs than declared
    OutputArity {
        type_id: String,
        expected: usize,
        got: usize,
    },
    /// Returned a value outside [-100, 100] (or NaN)
    OutOfRange {
        type_id: String,
        tick: usize,
        port: usize,
        value: Signal,
    },
    /// Stateful node ran without the state kind it needs
    MissingState { type_id: String },
    /// Delay-providing node committed a different value than it announced
    PeekMismatch {
        type_id: String,
        tick: usize,
        announced: Signal,
        committed: Signal,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::OutputArity {
                type_id,
                expected,
                got,
            } => write!(
                f,
                "Node type '{}' returned {} outputs, declares {}",
                type_id, got, expected
            ),
            InvariantViolation::OutOfRange {
                type_id,
                tick,
                port,
                value,
            } => write!(
                f,
                "Node type '{}' produced unclamped value {} on port {} at tick {}",
                type_id, value, port, tick
            ),
            InvariantViolation::MissingState { type_id } => {
                write!(f, "Node type '{}' evaluated without its runtime state", type_id)
            }
            InvariantViolation::PeekMismatch {
                type_id,
                tick,
                announced,
                committed,
            } => write!(
                f,
                "Node type '{}' announced {} but committed {} at tick {}",
                type_id, announced, committed, tick
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Any failure surfaced by the simulation core
#[derive(Debug)]
pub enum SimError {
    /// Fix your parameters
    Config(ConfigError),
    /// Fix your graph
    Graph(GraphError),
    /// Engine or node-rule bug
    Invariant(InvariantViolation),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(e) => write!(f, "Configuration error: {}", e),
            SimError::Graph(e) => write!(f, "Graph error: {}", e),
            SimError::Invariant(e) => write!(f, "Engine invariant violated: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(e) => Some(e),
            SimError::Graph(e) => Some(e),
            SimError::Invariant(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}

impl From<GraphError> for SimError {
    fn from(e: GraphError) -> Self {
        SimError::Graph(e)
    }
}

impl From<InvariantViolation> for SimError {
    fn from(e: InvariantViolation) -> Self {
        SimError::Invariant(e)
    }
}

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;
