//! # Tickwire - Deterministic Signal Circuit Simulator
//!
//! Tickwire evaluates node-and-wire signal circuits over a fixed window of
//! discrete ticks. Every signal is a scalar clamped to [-100, 100]; nodes
//! are drawn from a catalog (arithmetic, routing, comparison, timing) and
//! wired output-to-input. Memory and delay nodes carry state across ticks,
//! which lets circuits loop back on themselves.
//!
//! ## Core Features
//!
//! - **Deterministic runs**: same graph, parameters and window give
//!   bit-for-bit identical results (checked with a SHA-256 digest)
//! - **Feedback loops**: legal when a memory or delay node sits on the loop;
//!   purely combinational cycles are rejected at compile time
//! - **Typed errors**: parameter problems, graph problems and engine bugs are
//!   separate error classes
//! - **Sub-circuits**: saved circuits become node kinds of their own
//! - **Live view**: step one tick at a time into a rolling sample buffer,
//!   paced by a discrete tick clock
//!
//! ## Quick Start
//!
//! ```rust
//! use tickwire::engine::evaluate;
//! use tickwire::graph::{CircuitGraph, PortRef};
//! use tickwire::registry::NodeRegistry;
//! use tickwire::stimulus::{Stimuli, Waveform};
//!
//! let registry = NodeRegistry::builtin();
//! let mut graph = CircuitGraph::new();
//! let input = graph.add_node(&registry, "input").unwrap();
//! let add = graph.add_node(&registry, "add").unwrap();
//! graph.connect(PortRef::new(input, 0), PortRef::new(add, 0));
//!
//! let mut stimuli = Stimuli::new();
//! stimuli.insert(input, Waveform::Constant(50.0));
//!
//! let results = evaluate(&graph, &registry, &stimuli, 256).unwrap();
//! assert_eq!(results.waveform(PortRef::new(add, 0)), Some(vec![50.0; 256]));
//! ```
//!
//! ## Feedback Through Memory
//!
//! ```rust
//! use tickwire::engine::evaluate;
//! use tickwire::graph::{CircuitGraph, PortRef};
//! use tickwire::registry::NodeRegistry;
//! use tickwire::stimulus::Stimuli;
//!
//! let registry = NodeRegistry::builtin();
//! let mut graph = CircuitGraph::new();
//! let memory = graph.add_node(&registry, "memory").unwrap();
//! let step = graph.add_node_with(&registry, "add", &[("amount", 25.0)]).unwrap();
//! graph.connect(PortRef::new(memory, 0), PortRef::new(step, 0));
//! graph.connect(PortRef::new(step, 0), PortRef::new(memory, 0));
//!
//! let results = evaluate(&graph, &registry, &Stimuli::new(), 6).unwrap();
//! assert_eq!(
//!     results.waveform(PortRef::new(memory, 0)),
//!     Some(vec![0.0, 25.0, 50.0, 75.0, 100.0, 100.0])
//! );
//! ```
//!
//! ## Architecture
//!
//! - [`signal`] - the clamped scalar every port carries
//! - [`node_type`], [`params`], [`registry`], [`nodes`] - node catalog
//! - [`node_state`] - memory cells, delay lines, sub-circuit arenas
//! - [`graph`] - node instances, wires, editing operations
//! - [`dependency_graph`], [`engine`] - compile and run
//! - [`results`], [`stimulus`] - what goes in and comes out of a run
//! - [`subcircuit`] - user-composed node kinds
//! - [`sample_buffer`], [`tick_clock`] - live display helpers
//! - [`config`], [`error`] - ambient plumbing

pub mod config;
pub mod dependency_graph;
pub mod engine;
pub mod error;
pub mod graph;
pub mod node_state;
pub mod node_type;
pub mod nodes;
pub mod params;
pub mod registry;
pub mod results;
pub mod sample_buffer;
pub mod signal;
pub mod stimulus;
pub mod subcircuit;
pub mod tick_clock;

pub use engine::{evaluate, CompiledCircuit, Simulation, DEFAULT_WINDOW_TICKS};
pub use error::{ConfigError, GraphError, InvariantViolation, SimError, SimResult};
pub use graph::{CircuitGraph, NodeId, PortRef, Wire};
pub use registry::NodeRegistry;
pub use results::CycleResults;
pub use signal::{clamp, Signal};
