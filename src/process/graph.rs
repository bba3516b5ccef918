//! Flow-graph construction.

use crate::model::{EnhancedNode, Flow, FlowGraph, NodeConnections, NodeSummary};
use std::collections::BTreeMap;

/// Build adjacency and start/end sets in a single pass over the flows.
///
/// Isolated nodes appear in both `start_nodes` and `end_nodes`. Start and
/// end lists follow node order.
#[must_use]
pub fn build_flow_graph(nodes: &[EnhancedNode], flows: &[Flow]) -> FlowGraph {
    let mut connections: BTreeMap<String, NodeConnections> = nodes
        .iter()
        .map(|n| (n.uuid.clone(), NodeConnections::default()))
        .collect();

    for flow in flows {
        connections
            .entry(flow.from_node_uuid.clone())
            .or_default()
            .outgoing
            .push(flow.clone());
        connections
            .entry(flow.to_node_uuid.clone())
            .or_default()
            .incoming
            .push(flow.clone());
    }

    let with = |pred: fn(&NodeConnections) -> bool| -> Vec<String> {
        nodes
            .iter()
            .filter(|n| connections.get(&n.uuid).is_none_or(pred))
            .map(|n| n.uuid.clone())
            .collect()
    };
    let start_nodes = with(|c| c.incoming.is_empty());
    let end_nodes = with(|c| c.outgoing.is_empty());

    FlowGraph {
        start_nodes,
        end_nodes,
        node_connections: connections,
    }
}

/// Summarise node types and graph shape.
#[must_use]
pub fn summarize(
    nodes: &[EnhancedNode],
    flows: &[Flow],
    graph: &FlowGraph,
    failed_nodes: usize,
) -> NodeSummary {
    let mut nodes_by_type = BTreeMap::new();
    for node in nodes {
        *nodes_by_type.entry(node.node_type.to_string()).or_insert(0) += 1;
    }
    NodeSummary {
        total_nodes: nodes.len(),
        total_flows: flows.len(),
        nodes_by_type,
        start_node_count: graph.start_nodes.len(),
        end_node_count: graph.end_nodes.len(),
        failed_nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(uuid: &str) -> EnhancedNode {
        let mut n = EnhancedNode::stub(uuid);
        n.name = uuid.to_uppercase();
        n
    }

    fn flow(from: &str, to: &str) -> Flow {
        Flow::new(
            format!("{from}-{to}"),
            (from, from.to_uppercase().as_str()),
            (to, to.to_uppercase().as_str()),
            "",
        )
    }

    #[test]
    fn test_linear_chain() {
        let nodes = [node("a"), node("b"), node("c")];
        let flows = [flow("a", "b"), flow("b", "c")];
        let graph = build_flow_graph(&nodes, &flows);

        assert_eq!(graph.start_nodes, vec!["a"]);
        assert_eq!(graph.end_nodes, vec!["c"]);
        assert_eq!(graph.node_connections["b"].incoming.len(), 1);
        assert_eq!(graph.node_connections["b"].outgoing.len(), 1);
    }

    #[test]
    fn test_isolated_node_is_start_and_end() {
        let nodes = [node("a"), node("b"), node("lonely")];
        let graph = build_flow_graph(&nodes, &[flow("a", "b")]);
        assert!(graph.start_nodes.contains(&"lonely".to_string()));
        assert!(graph.end_nodes.contains(&"lonely".to_string()));
    }

    #[test]
    fn test_cycle_has_no_start_or_end() {
        let nodes = [node("a"), node("b")];
        let graph = build_flow_graph(&nodes, &[flow("a", "b"), flow("b", "a")]);
        assert!(graph.start_nodes.is_empty());
        assert!(graph.end_nodes.is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let mut nodes = vec![node("a"), node("b")];
        nodes[0].node_type = crate::model::NodeType::StartNode;
        let flows = [flow("a", "b")];
        let graph = build_flow_graph(&nodes, &flows);
        let summary = summarize(&nodes, &flows, &graph, 1);
        assert_eq!(summary.total_nodes, 2);
        assert_eq!(summary.total_flows, 1);
        assert_eq!(summary.nodes_by_type.get("Start Node"), Some(&1));
        assert_eq!(summary.failed_nodes, 1);
    }
}
