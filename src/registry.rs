/// Node type registry - maps type identifiers to node kinds
///
/// The catalog is data: adding a node kind means registering one more
/// [`NodeType`]. Sub-circuits register the same way under `circuit:<name>`.

use crate::node_type::{NodeType, NodeTypeDescriptor};
use crate::nodes;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Default)]
pub struct NodeRegistry {
    types: BTreeMap<String, Arc<dyn NodeType>>,
}

impl NodeRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in node kind
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for node in nodes::builtin() {
            registry.register(node);
        }
        registry
    }

    /// Add (or replace) a node kind, keyed by its type id
    pub fn register(&mut self, node: Arc<dyn NodeType>) {
        let type_id = node.type_id().to_string();
        if self.types.insert(type_id.clone(), node).is_some() {
            debug!("Replaced node type '{}'", type_id);
        }
    }

    pub fn get(&self, type_id: &str) -> Option<&Arc<dyn NodeType>> {
        self.types.get(type_id)
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }

    /// Descriptors of every registered kind, ordered by type id
    pub fn descriptors(&self) -> Vec<&NodeTypeDescriptor> {
        self.types.values().map(|n| n.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_type::Category;

    #[test]
    fn test_builtin_lookup() {
        let registry = NodeRegistry::builtin();
        assert!(registry.contains("add"));
        assert!(registry.contains("memory"));
        assert!(registry.contains("delay"));
        assert!(registry.get("nope").is_none());

        let delay = registry.get("delay").unwrap();
        assert_eq!(delay.descriptor().category, Category::Timing);
    }

    #[test]
    fn test_descriptors_sorted_by_type() {
        let registry = NodeRegistry::builtin();
        let ids: Vec<&str> = registry
            .descriptors()
            .iter()
            .map(|d| d.type_id.as_str())
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), registry.len());
    }
}
