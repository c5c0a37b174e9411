/// Same-tick dependency analysis for circuit evaluation
///
/// This module analyzes the wire graph to determine:
/// - Execution order within one tick (topological sort)
/// - Which feedback loops are legal (broken by a delay-providing node)
/// - Which are not (purely combinational cycles)

use crate::error::GraphError;
use crate::graph::NodeId;
use petgraph::algo::{has_path_connecting, tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

/// Represents the same-tick dependency graph of a circuit
///
/// # Graph Structure
/// - Nodes: evaluation slots (dense indices), weighted with their [`NodeId`]
/// - Edges: source → dependent, for every wire whose source's output this
///   tick depends on its input this tick
///
/// Wires leaving a delay-providing node (memory, delay with at least one
/// subdivision) carry last tick's value and are left out, which is what lets
/// a loop through such a node evaluate.
///
/// # Usage
/// ```ignore
/// let deps = DependencyGraph::build(&ids, &edges, &delayed);
/// deps.check_combinational_cycles()?;
/// let order = deps.execution_order()?;
/// ```
pub struct DependencyGraph {
    graph: DiGraph<NodeId, ()>,
    skipped_edges: usize,
}

impl DependencyGraph {
    /// Build from dense slots
    ///
    /// # Arguments
    /// * `ids` - NodeId of each slot
    /// * `edges` - (source slot, dependent slot) per wire
    /// * `delayed` - per slot, true when the node provides delay
    pub fn build(ids: &[NodeId], edges: &[(usize, usize)], delayed: &[bool]) -> Self {
        let mut graph = DiGraph::with_capacity(ids.len(), edges.len());
        for &id in ids {
            graph.add_node(id);
        }

        let mut skipped_edges = 0;
        for &(source, dependent) in edges {
            if delayed[source] {
                skipped_edges += 1;
                continue;
            }
            graph.add_edge(NodeIndex::new(source), NodeIndex::new(dependent), ());
        }

        Self {
            graph,
            skipped_edges,
        }
    }

    /// Reject every cycle that has no delay-providing node on it
    ///
    /// Strongly connected components of the same-tick graph are exactly the
    /// combinational loops: any component with more than one node, or a
    /// single node wired to itself. The first one found (by lowest NodeId)
    /// is reported with its members sorted.
    pub fn check_combinational_cycles(&self) -> Result<(), GraphError> {
        let mut cycles: Vec<Vec<NodeId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || self
                        .graph
                        .find_edge(component[0], component[0])
                        .is_some()
            })
            .map(|component| {
                let mut ids: Vec<NodeId> = component.iter().map(|&idx| self.graph[idx]).collect();
                ids.sort_unstable();
                ids
            })
            .collect();

        if cycles.is_empty() {
            return Ok(());
        }
        cycles.sort();
        Err(GraphError::CombinationalCycle(cycles.swap_remove(0)))
    }

    /// Topologically sorted slot order for one tick
    ///
    /// Every slot's same-tick sources come before it. Fails only when a
    /// combinational cycle exists.
    pub fn execution_order(&self) -> Result<Vec<usize>, GraphError> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|idx| idx.index()).collect())
            .map_err(|cycle| GraphError::CombinationalCycle(vec![self.graph[cycle.node_id()]]))
    }

    /// Whether `to` can be reached from `from` along same-tick edges
    pub fn has_path(&self, from: usize, to: usize) -> bool {
        has_path_connecting(&self.graph, NodeIndex::new(from), NodeIndex::new(to), None)
    }

    /// Number of slots in the graph
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of same-tick dependencies
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of wires left out because their source provides delay
    pub fn delayed_edge_count(&self) -> usize {
        self.skipped_edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_linear_graph() {
        // 0 → 1 → 2
        let deps = DependencyGraph::build(&[10, 11, 12], &[(0, 1), (1, 2)], &[false; 3]);
        assert_eq!(deps.execution_order().unwrap(), vec![0, 1, 2]);
        assert!(deps.has_path(0, 2));
        assert!(!deps.has_path(2, 0));
    }

    #[test]
    fn test_order_respects_every_edge() {
        //   0 → 2 → 4
        //   1 → 3 → 4
        let edges = [(0, 2), (1, 3), (2, 4), (3, 4)];
        let deps = DependencyGraph::build(&[0, 1, 2, 3, 4], &edges, &[false; 5]);
        let order = deps.execution_order().unwrap();
        let position = |slot: usize| order.iter().position(|&s| s == slot).unwrap();
        for (source, dependent) in edges {
            assert!(position(source) < position(dependent));
        }
    }

    #[test]
    fn test_combinational_cycle_detected() {
        // 0 → 1 → 2 → 0
        let deps = DependencyGraph::build(&[7, 8, 9], &[(0, 1), (1, 2), (2, 0)], &[false; 3]);
        assert!(deps.execution_order().is_err());
        assert_eq!(
            deps.check_combinational_cycles(),
            Err(GraphError::CombinationalCycle(vec![7, 8, 9]))
        );
    }

    #[test]
    fn test_self_loop_detected() {
        let deps = DependencyGraph::build(&[4], &[(0, 0)], &[false]);
        assert_eq!(
            deps.check_combinational_cycles(),
            Err(GraphError::CombinationalCycle(vec![4]))
        );
    }

    #[test]
    fn test_delayed_node_breaks_cycle() {
        // 0 (memory) → 1 → 0
        let deps = DependencyGraph::build(&[0, 1], &[(0, 1), (1, 0)], &[true, false]);
        assert!(deps.check_combinational_cycles().is_ok());
        assert_eq!(deps.delayed_edge_count(), 1);
        assert_eq!(deps.edge_count(), 1);
        // Node 1 feeds the memory's input, so it runs first
        assert_eq!(deps.execution_order().unwrap(), vec![1, 0]);
        assert!(deps.has_path(1, 0));
        assert!(!deps.has_path(0, 1));
    }

    #[test]
    fn test_delayed_self_loop_allowed() {
        let deps = DependencyGraph::build(&[0], &[(0, 0)], &[true]);
        assert!(deps.check_combinational_cycles().is_ok());
    }

    #[test]
    fn test_cycle_report_ignores_legal_loops() {
        // Slots 0-1 loop through a delayed node, slots 2-3 are combinational
        let edges = [(0, 1), (1, 0), (2, 3), (3, 2)];
        let deps = DependencyGraph::build(&[0, 1, 2, 3], &edges, &[true, false, false, false]);
        assert_eq!(
            deps.check_combinational_cycles(),
            Err(GraphError::CombinationalCycle(vec![2, 3]))
        );
    }
}
