//! Flow extraction.
//!
//! Connections reference their target by the node's short-form local id
//! (`guiId`), so an index from local id to uuid is built first. Modern
//! documents list connections per node; older ones carry a flat `flows`
//! list on the model. Both are read and de-duplicated by (from, to).

use crate::model::{EnhancedNode, Flow};
use crate::parsers::XmlElement;
use std::collections::{HashMap, HashSet};

/// Maps local ids and uuids to node identity.
#[derive(Debug, Default)]
pub struct NodeIndex {
    by_local_id: HashMap<String, (String, String)>,
    by_uuid: HashMap<String, String>,
}

impl NodeIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, local_id: Option<&str>, node: &EnhancedNode) {
        if let Some(local_id) = local_id {
            self.by_local_id
                .insert(local_id.to_string(), (node.uuid.clone(), node.name.clone()));
        }
        self.by_uuid.insert(node.uuid.clone(), node.name.clone());
    }

    /// Resolve a connection endpoint given as local id or uuid.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<(&str, &str)> {
        let id = id.trim();
        if let Some((uuid, name)) = self.by_local_id.get(id) {
            return Some((uuid.as_str(), name.as_str()));
        }
        self.by_uuid
            .get_key_value(id)
            .map(|(uuid, name)| (uuid.as_str(), name.as_str()))
    }
}

/// Flows of one process model plus dropped-flow diagnostics.
#[derive(Debug, Default)]
pub struct FlowExtraction {
    pub flows: Vec<Flow>,
    pub diagnostics: Vec<String>,
}

impl FlowExtraction {
    fn push(&mut self, seen: &mut HashSet<(String, String)>, flow: Flow) {
        let key = (flow.from_node_uuid.clone(), flow.to_node_uuid.clone());
        if seen.insert(key) {
            self.flows.push(flow);
        } else {
            tracing::debug!(
                from = %flow.from_node_name,
                to = %flow.to_node_name,
                "duplicate flow between the same nodes collapsed"
            );
        }
    }

    fn drop_flow(&mut self, message: String) {
        tracing::warn!("{message}");
        self.diagnostics.push(message);
    }
}

fn condition_text(connection: &XmlElement) -> String {
    connection
        .child("condition")
        .map(|c| {
            c.descendants()
                .filter_map(XmlElement::text)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .or_else(|| connection.attr("condition").map(str::to_string))
        .unwrap_or_default()
}

fn endpoint<'e>(element: &'e XmlElement, names: &[&str]) -> Option<&'e str> {
    element
        .child_text_any(names)
        .or_else(|| names.iter().find_map(|n| element.attr(n)))
}

/// Extract flows from node connection lists and the legacy flow list.
///
/// `nodes` pairs each node element with the node extracted from it.
pub fn extract_flows(
    pm: &XmlElement,
    nodes: &[(&XmlElement, &EnhancedNode)],
    index: &NodeIndex,
) -> FlowExtraction {
    let mut out = FlowExtraction::default();
    let mut seen = HashSet::new();

    for (element, node) in nodes {
        let Some(connections) = element.child("connections") else {
            continue;
        };
        for connection in connections.children_named("connection") {
            let Some(target) = endpoint(connection, &["to", "target"]) else {
                out.drop_flow(format!(
                    "flow from '{}' dropped: connection has no target",
                    node.name
                ));
                continue;
            };
            let Some((to_uuid, to_name)) = index.resolve(target) else {
                out.drop_flow(format!(
                    "flow from '{}' dropped: target '{target}' not found",
                    node.name
                ));
                continue;
            };
            let uuid = connection
                .attr("uuid")
                .map_or_else(|| format!("flow-{}-{to_uuid}", node.uuid), str::to_string);
            let flow = Flow::new(
                uuid,
                (node.uuid.as_str(), node.name.as_str()),
                (to_uuid, to_name),
                condition_text(connection),
            );
            out.push(&mut seen, flow);
        }
    }

    let legacy = pm
        .child("flows")
        .map(|flows| flows.children_named("flow").collect::<Vec<_>>())
        .unwrap_or_default();
    for flow_el in legacy {
        let from = endpoint(flow_el, &["from", "source"]).and_then(|id| index.resolve(id));
        let to = endpoint(flow_el, &["to", "target"]).and_then(|id| index.resolve(id));
        let (Some(from), Some(to)) = (from, to) else {
            out.drop_flow(format!(
                "legacy flow dropped: endpoint '{}' -> '{}' not found",
                endpoint(flow_el, &["from", "source"]).unwrap_or_default(),
                endpoint(flow_el, &["to", "target"]).unwrap_or_default()
            ));
            continue;
        };
        let uuid = flow_el
            .attr("uuid")
            .map_or_else(|| format!("flow-{}-{}", from.0, to.0), str::to_string);
        out.push(&mut seen, Flow::new(uuid, from, to, condition_text(flow_el)));
    }

    out
}
