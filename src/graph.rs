/// Circuit graph - node instances and the wires between them
///
/// This is the editor-facing model. Editing operations here are the
/// parameter-validation boundary: values are checked against their
/// descriptors on the way in, so the engine can trust them.

use crate::error::{ConfigError, GraphError, SimError};
use crate::node_state::NodeState;
use crate::params::{self, ParamValues};
use crate::registry::NodeRegistry;
use crate::signal::Signal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identifier of a placed node, unique within one graph
pub type NodeId = usize;

/// A specific port on a specific node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortRef {
    pub node: NodeId,
    pub port: usize,
}

impl PortRef {
    pub fn new(node: NodeId, port: usize) -> Self {
        Self { node, port }
    }
}

/// Directed connection: output port `from` drives input port `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    pub from: PortRef,
    pub to: PortRef,
}

impl Wire {
    pub fn new(from: PortRef, to: PortRef) -> Self {
        Self { from, to }
    }
}

/// One placed node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInstance {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(default)]
    pub params: ParamValues,
    /// Runtime state, created with the instance or rehydrated from a save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<NodeState>,
}

/// Node instances plus wires
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitGraph {
    #[serde(default)]
    pub nodes: Vec<NodeInstance>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

impl CircuitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a graph from editor JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeInstance> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeInstance> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    fn next_id(&self) -> NodeId {
        self.nodes.iter().map(|n| n.id + 1).max().unwrap_or(0)
    }

    /// Place a node with default parameters
    pub fn add_node(&mut self, registry: &NodeRegistry, type_id: &str) -> Result<NodeId, SimError> {
        self.add_node_with(registry, type_id, &[])
    }

    /// Place a node, overriding some parameters
    ///
    /// Overrides are validated; the rest take their declared defaults. The
    /// instance's runtime state is created here, once.
    pub fn add_node_with(
        &mut self,
        registry: &NodeRegistry,
        type_id: &str,
        overrides: &[(&str, Signal)],
    ) -> Result<NodeId, SimError> {
        let id = self.next_id();
        let node_type = registry
            .get(type_id)
            .ok_or_else(|| GraphError::UnknownNodeType {
                node: id,
                type_id: type_id.to_string(),
            })?;
        let descriptor = node_type.descriptor();

        let mut values = params::defaults(&descriptor.params);
        for &(key, value) in overrides {
            let param = descriptor
                .find_param(key)
                .ok_or_else(|| ConfigError::UnknownParam {
                    type_id: type_id.to_string(),
                    key: key.to_string(),
                })?;
            param.validate(value)?;
            values.insert(key.to_string(), value);
        }

        let state = node_type.create_state(&values);
        self.nodes.push(NodeInstance {
            id,
            type_id: type_id.to_string(),
            params: values,
            state,
        });
        debug!("Placed node {} ({})", id, type_id);
        Ok(id)
    }

    /// Remove a node, every wire touching it, and its runtime state
    pub fn remove_node(&mut self, id: NodeId) -> Option<NodeInstance> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        self.wires.retain(|w| w.from.node != id && w.to.node != id);
        Some(self.nodes.remove(index))
    }

    /// Wire `from` into `to`, replacing whatever drove `to` before
    pub fn connect(&mut self, from: PortRef, to: PortRef) -> Option<Wire> {
        let previous = self.disconnect(to);
        self.wires.push(Wire::new(from, to));
        previous
    }

    /// Remove the wire driving input port `to`
    pub fn disconnect(&mut self, to: PortRef) -> Option<Wire> {
        let index = self.wires.iter().position(|w| w.to == to)?;
        Some(self.wires.remove(index))
    }

    /// Change one parameter
    ///
    /// Validates against the descriptor. Stateful nodes get fresh state, since
    /// any edit triggers a full re-run from tick 0.
    pub fn set_param(
        &mut self,
        registry: &NodeRegistry,
        id: NodeId,
        key: &str,
        value: Signal,
    ) -> Result<(), SimError> {
        let instance = self.node_mut(id).ok_or(ConfigError::UnknownNode(id))?;
        let node_type = registry
            .get(&instance.type_id)
            .ok_or_else(|| GraphError::UnknownNodeType {
                node: id,
                type_id: instance.type_id.clone(),
            })?;
        let param = node_type
            .descriptor()
            .find_param(key)
            .ok_or_else(|| ConfigError::UnknownParam {
                type_id: instance.type_id.clone(),
                key: key.to_string(),
            })?;
        param.validate(value)?;

        instance.params.insert(key.to_string(), value);
        instance.state = node_type.create_state(&instance.params);
        Ok(())
    }

    /// Drop every instance's runtime state back to a fresh one
    pub fn reset_states(&mut self, registry: &NodeRegistry) {
        for instance in &mut self.nodes {
            if let Some(node_type) = registry.get(&instance.type_id) {
                instance.state = node_type.create_state(&instance.params);
            }
        }
    }

    /// Validate a graph that arrived from outside the editing operations
    ///
    /// Checks node types, every parameter value, and the shape of any
    /// rehydrated runtime state.
    pub fn validate_params(&self, registry: &NodeRegistry) -> Result<(), SimError> {
        for instance in &self.nodes {
            let node_type =
                registry
                    .get(&instance.type_id)
                    .ok_or_else(|| GraphError::UnknownNodeType {
                        node: instance.id,
                        type_id: instance.type_id.clone(),
                    })?;
            let descriptor = node_type.descriptor();
            params::validate_all(&descriptor.type_id, &descriptor.params, &instance.params)?;

            if let Some(state) = &instance.state {
                node_type
                    .check_state(&instance.params, state)
                    .map_err(|message| ConfigError::StateShape {
                        node: instance.id,
                        message,
                    })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_fills_defaults_and_state() {
        let registry = NodeRegistry::builtin();
        let mut graph = CircuitGraph::new();
        let add = graph.add_node(&registry, "add").unwrap();
        let delay = graph.add_node_with(&registry, "delay", &[("subdivisions", 4.0)]).unwrap();

        assert_eq!(add, 0);
        assert_eq!(delay, 1);
        assert_eq!(graph.node(add).unwrap().params["amount"], 0.0);
        assert!(graph.node(add).unwrap().state.is_none());
        match &graph.node(delay).unwrap().state {
            Some(NodeState::Delay(line)) => assert_eq!(line.depth(), 4),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_add_node_rejects_bad_params() {
        let registry = NodeRegistry::builtin();
        let mut graph = CircuitGraph::new();
        assert!(matches!(
            graph.add_node_with(&registry, "delay", &[("subdivisions", 17.0)]),
            Err(SimError::Config(ConfigError::OutOfRange { .. }))
        ));
        assert!(matches!(
            graph.add_node(&registry, "flux_capacitor"),
            Err(SimError::Graph(GraphError::UnknownNodeType { .. }))
        ));
        assert!(graph.nodes.is_empty());
    }

    #[test]
    fn test_connect_replaces_existing_driver() {
        let registry = NodeRegistry::builtin();
        let mut graph = CircuitGraph::new();
        let a = graph.add_node(&registry, "constant").unwrap();
        let b = graph.add_node(&registry, "constant").unwrap();
        let add = graph.add_node(&registry, "add").unwrap();

        assert!(graph.connect(PortRef::new(a, 0), PortRef::new(add, 0)).is_none());
        let old = graph.connect(PortRef::new(b, 0), PortRef::new(add, 0));
        assert_eq!(old.unwrap().from.node, a);
        assert_eq!(graph.wires.len(), 1);
    }

    #[test]
    fn test_remove_node_drops_wires() {
        let registry = NodeRegistry::builtin();
        let mut graph = CircuitGraph::new();
        let a = graph.add_node(&registry, "constant").unwrap();
        let b = graph.add_node(&registry, "negate").unwrap();
        graph.connect(PortRef::new(a, 0), PortRef::new(b, 0));

        let removed = graph.remove_node(a).unwrap();
        assert_eq!(removed.type_id, "constant");
        assert!(graph.wires.is_empty());
        assert!(graph.remove_node(a).is_none());
    }

    #[test]
    fn test_set_param_validates_and_resets_state() {
        let registry = NodeRegistry::builtin();
        let mut graph = CircuitGraph::new();
        let id = graph.add_node(&registry, "delay").unwrap();

        graph.set_param(&registry, id, "subdivisions", 6.0).unwrap();
        match &graph.node(id).unwrap().state {
            Some(NodeState::Delay(line)) => assert_eq!(line.depth(), 6),
            other => panic!("unexpected state {:?}", other),
        }

        assert!(matches!(
            graph.set_param(&registry, id, "subdivisions", 2.5),
            Err(SimError::Config(ConfigError::NotIntegral { .. }))
        ));
        assert!(matches!(
            graph.set_param(&registry, id, "speed", 1.0),
            Err(SimError::Config(ConfigError::UnknownParam { .. }))
        ));
        assert!(matches!(
            graph.set_param(&registry, 99, "subdivisions", 1.0),
            Err(SimError::Config(ConfigError::UnknownNode(99)))
        ));
    }

    #[test]
    fn test_validate_params_on_loaded_graph() {
        let registry = NodeRegistry::builtin();
        let json = r#"{
            "nodes": [
                {"id": 0, "type": "add", "params": {"amount": 250}},
                {"id": 1, "type": "memory"}
            ],
            "wires": []
        }"#;
        let graph = CircuitGraph::from_json(json).unwrap();
        assert!(matches!(
            graph.validate_params(&registry),
            Err(SimError::Config(ConfigError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_validate_params_rejects_mismatched_state() {
        let registry = NodeRegistry::builtin();
        let json = r#"{
            "nodes": [
                {"id": 3, "type": "delay", "params": {"subdivisions": 2},
                 "state": {"kind": "delay", "buffer": [0, 0, 0, 0], "cursor": 0}}
            ]
        }"#;
        let graph = CircuitGraph::from_json(json).unwrap();
        assert!(matches!(
            graph.validate_params(&registry),
            Err(SimError::Config(ConfigError::StateShape { node: 3, .. }))
        ));
    }
}
