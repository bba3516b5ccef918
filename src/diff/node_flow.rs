//! Node and flow comparison between two versions of a process model.
//!
//! Nodes are keyed by UUID and flows by their (from, to) endpoint pair.
//! Matched items are deep-compared and every differing property becomes a
//! `PropertyChange`.

use crate::model::{EnhancedNode, Flow, ProcessModelObject, PropertyMap};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One differing property. `None` means the property is absent on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyChange {
    pub property_path: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl PropertyChange {
    fn new(path: impl Into<String>, before: Option<String>, after: Option<String>) -> Self {
        Self {
            property_path: path.into(),
            before,
            after,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeChange {
    pub uuid: String,
    pub name: String,
    pub changes: Vec<PropertyChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowChange {
    pub from_node_uuid: String,
    pub to_node_uuid: String,
    pub changes: Vec<PropertyChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeComparison {
    pub added: Vec<EnhancedNode>,
    pub removed: Vec<EnhancedNode>,
    pub modified: Vec<NodeChange>,
    pub unchanged: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowComparison {
    pub added: Vec<Flow>,
    pub removed: Vec<Flow>,
    pub modified: Vec<FlowChange>,
    pub unchanged: usize,
}

/// Node and flow deltas for one process model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessModelComparison {
    pub uuid: String,
    pub name: String,
    pub nodes: NodeComparison,
    pub flows: FlowComparison,
}

impl ProcessModelComparison {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        let n = &self.nodes;
        let f = &self.flows;
        !(n.added.is_empty()
            && n.removed.is_empty()
            && n.modified.is_empty()
            && f.added.is_empty()
            && f.removed.is_empty()
            && f.modified.is_empty())
    }
}

fn push_if_differs(changes: &mut Vec<PropertyChange>, path: &str, before: &str, after: &str) {
    if before != after {
        changes.push(PropertyChange::new(
            path,
            Some(before.to_string()),
            Some(after.to_string()),
        ));
    }
}

fn compare_maps(changes: &mut Vec<PropertyChange>, prefix: &str, old: &PropertyMap, new: &PropertyMap) {
    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    for key in keys {
        let (before, after) = (old.get(key), new.get(key));
        if before != after {
            changes.push(PropertyChange::new(
                format!("{prefix}.{key}"),
                before.cloned(),
                after.cloned(),
            ));
        }
    }
}

fn node_changes(old: &EnhancedNode, new: &EnhancedNode) -> Vec<PropertyChange> {
    let mut changes = Vec::new();
    push_if_differs(&mut changes, "name", &old.name, &new.name);
    push_if_differs(
        &mut changes,
        "node_type",
        old.node_type.as_str(),
        new.node_type.as_str(),
    );

    for ((category, before), (_, after)) in old
        .properties
        .categories()
        .into_iter()
        .zip(new.properties.categories())
    {
        compare_maps(&mut changes, &format!("properties.{category}"), before, after);
    }

    for ((bucket, before), (_, after)) in old
        .dependencies
        .buckets()
        .into_iter()
        .zip(new.dependencies.buckets())
    {
        let before: BTreeSet<&str> = before.iter().map(|d| d.uuid.as_str()).collect();
        let after: BTreeSet<&str> = after.iter().map(|d| d.uuid.as_str()).collect();
        if before != after {
            let join = |set: &BTreeSet<&str>| set.iter().copied().collect::<Vec<_>>().join(", ");
            changes.push(PropertyChange::new(
                format!("dependencies.{bucket}"),
                Some(join(&before)),
                Some(join(&after)),
            ));
        }
    }
    changes
}

/// Compare two node lists by UUID.
///
/// Added and modified nodes follow new-side order, removed nodes old-side
/// order.
#[must_use]
pub fn compare_nodes(old: &[EnhancedNode], new: &[EnhancedNode]) -> NodeComparison {
    let old_by_uuid: IndexMap<&str, &EnhancedNode> =
        old.iter().map(|n| (n.uuid.as_str(), n)).collect();
    let new_by_uuid: IndexMap<&str, &EnhancedNode> =
        new.iter().map(|n| (n.uuid.as_str(), n)).collect();

    let mut out = NodeComparison::default();
    for (uuid, node) in &new_by_uuid {
        match old_by_uuid.get(uuid) {
            None => out.added.push((*node).clone()),
            Some(previous) => {
                let changes = node_changes(previous, node);
                if changes.is_empty() {
                    out.unchanged += 1;
                } else {
                    out.modified.push(NodeChange {
                        uuid: (*uuid).to_string(),
                        name: node.name.clone(),
                        changes,
                    });
                }
            }
        }
    }
    out.removed = old_by_uuid
        .iter()
        .filter(|(uuid, _)| !new_by_uuid.contains_key(*uuid))
        .map(|(_, node)| (*node).clone())
        .collect();
    out
}

fn flow_changes(old: &Flow, new: &Flow) -> Vec<PropertyChange> {
    let mut changes = Vec::new();
    push_if_differs(&mut changes, "condition", &old.condition, &new.condition);
    push_if_differs(
        &mut changes,
        "is_default",
        &old.is_default.to_string(),
        &new.is_default.to_string(),
    );
    push_if_differs(&mut changes, "label", &old.label, &new.label);
    push_if_differs(
        &mut changes,
        "from_node_name",
        &old.from_node_name,
        &new.from_node_name,
    );
    push_if_differs(&mut changes, "to_node_name", &old.to_node_name, &new.to_node_name);
    changes
}

/// Compare two flow lists keyed by (from, to).
#[must_use]
pub fn compare_flows(old: &[Flow], new: &[Flow]) -> FlowComparison {
    let old_by_pair: IndexMap<(&str, &str), &Flow> = old.iter().map(|f| (f.endpoints(), f)).collect();
    let new_by_pair: IndexMap<(&str, &str), &Flow> = new.iter().map(|f| (f.endpoints(), f)).collect();

    let mut out = FlowComparison::default();
    for (pair, flow) in &new_by_pair {
        match old_by_pair.get(pair) {
            None => out.added.push((*flow).clone()),
            Some(previous) => {
                let changes = flow_changes(previous, flow);
                if changes.is_empty() {
                    out.unchanged += 1;
                } else {
                    out.modified.push(FlowChange {
                        from_node_uuid: pair.0.to_string(),
                        to_node_uuid: pair.1.to_string(),
                        changes,
                    });
                }
            }
        }
    }
    out.removed = old_by_pair
        .iter()
        .filter(|(pair, _)| !new_by_pair.contains_key(*pair))
        .map(|(_, flow)| (*flow).clone())
        .collect();
    out
}

/// Node and flow comparison of two versions of a process model.
#[must_use]
pub fn compare_process_models(
    old: &ProcessModelObject,
    new: &ProcessModelObject,
) -> ProcessModelComparison {
    let comparison = ProcessModelComparison {
        uuid: new.core.uuid.clone(),
        name: new.core.name.clone(),
        nodes: compare_nodes(&old.nodes, &new.nodes),
        flows: compare_flows(&old.flows, &new.flows),
    };
    tracing::debug!(
        process_model = %comparison.name,
        nodes_added = comparison.nodes.added.len(),
        nodes_removed = comparison.nodes.removed.len(),
        nodes_modified = comparison.nodes.modified.len(),
        flows_added = comparison.flows.added.len(),
        flows_removed = comparison.flows.removed.len(),
        "process model nodes compared"
    );
    comparison
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DependencyRef, NodeType, ObjectType};

    fn node(uuid: &str, name: &str) -> EnhancedNode {
        let mut n = EnhancedNode::stub(uuid);
        n.name = name.to_string();
        n
    }

    fn flow(from: &str, to: &str, condition: &str) -> Flow {
        Flow::new(format!("{from}{to}"), (from, from), (to, to), condition)
    }

    #[test]
    fn test_node_set_difference() {
        let old = [node("a", "A"), node("b", "B")];
        let new = [node("b", "B"), node("c", "C")];
        let cmp = compare_nodes(&old, &new);
        assert_eq!(cmp.added[0].uuid, "c");
        assert_eq!(cmp.removed[0].uuid, "a");
        assert_eq!(cmp.unchanged, 1);
        assert!(cmp.modified.is_empty());
    }

    #[test]
    fn test_node_deep_compare() {
        let old = node("a", "Review");
        let mut new = node("a", "Review Request");
        new.node_type = NodeType::UserInputTask;
        new.properties.basic.insert("priority".into(), "High".into());
        new.dependencies.rules.push(DependencyRef {
            uuid: "r-1".into(),
            name: "rule".into(),
            object_type: ObjectType::ExpressionRule,
        });

        let cmp = compare_nodes(&[old], &[new]);
        let paths: Vec<_> = cmp.modified[0]
            .changes
            .iter()
            .map(|c| c.property_path.as_str())
            .collect();
        assert_eq!(
            paths,
            vec!["name", "node_type", "properties.basic.priority", "dependencies.rules"]
        );
        let priority = &cmp.modified[0].changes[2];
        assert_eq!(priority.before, None);
        assert_eq!(priority.after.as_deref(), Some("High"));
    }

    #[test]
    fn test_flows_keyed_by_endpoints() {
        let old = [flow("a", "b", ""), flow("b", "c", "x")];
        let new = [flow("a", "b", "pv!ok"), flow("c", "d", "")];
        let cmp = compare_flows(&old, &new);
        assert_eq!(cmp.added.len(), 1);
        assert_eq!(cmp.removed[0].endpoints(), ("b", "c"));
        let paths: Vec<_> = cmp.modified[0]
            .changes
            .iter()
            .map(|c| c.property_path.as_str())
            .collect();
        assert_eq!(paths, vec!["condition", "is_default", "label"]);
    }
}
