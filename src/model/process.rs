//! Process-model execution graph types.

use super::ObjectType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Execution role of a process node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    UserInputTask,
    ScriptTask,
    Gateway,
    Subprocess,
    StartNode,
    EndNode,
    Unknown,
}

impl NodeType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UserInputTask => "User Input Task",
            Self::ScriptTask => "Script Task",
            Self::Gateway => "Gateway",
            Self::Subprocess => "Subprocess",
            Self::StartNode => "Start Node",
            Self::EndNode => "End Node",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat key/value property map.
pub type PropertyMap = BTreeMap<String, String>;

/// Node properties grouped into fixed categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeProperties {
    /// description, priority, deadline
    #[serde(default)]
    pub basic: PropertyMap,
    /// type (User, Group, Expression, None) and resolved assignees
    #[serde(default)]
    pub assignment: PropertyMap,
    /// resolved interface reference
    #[serde(default)]
    pub forms: PropertyMap,
    /// pre/post-activity and output expressions
    #[serde(default)]
    pub expressions: PropertyMap,
    /// enabled, time, action, notify
    #[serde(default)]
    pub escalation: PropertyMap,
}

impl NodeProperties {
    /// Category name and map pairs in a stable order.
    #[must_use]
    pub fn categories(&self) -> [(&'static str, &PropertyMap); 5] {
        [
            ("basic", &self.basic),
            ("assignment", &self.assignment),
            ("forms", &self.forms),
            ("expressions", &self.expressions),
            ("escalation", &self.escalation),
        ]
    }
}

/// Resolved reference from a node to another object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyRef {
    pub uuid: String,
    pub name: String,
    pub object_type: ObjectType,
}

/// Node dependencies bucketed by resolved object kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDependencies {
    #[serde(default)]
    pub interfaces: Vec<DependencyRef>,
    #[serde(default)]
    pub rules: Vec<DependencyRef>,
    #[serde(default)]
    pub groups: Vec<DependencyRef>,
}

impl NodeDependencies {
    #[must_use]
    pub fn buckets(&self) -> [(&'static str, &[DependencyRef]); 3] {
        [
            ("interfaces", self.interfaces.as_slice()),
            ("rules", self.rules.as_slice()),
            ("groups", self.groups.as_slice()),
        ]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty() && self.rules.is_empty() && self.groups.is_empty()
    }
}

/// A process node after the enhancement pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancedNode {
    pub uuid: String,
    pub name: String,
    pub node_type: NodeType,
    #[serde(default)]
    pub properties: NodeProperties,
    #[serde(default)]
    pub dependencies: NodeDependencies,
}

impl EnhancedNode {
    /// Placeholder name for nodes whose extraction failed.
    pub const STUB_NAME: &'static str = "Unknown Node";

    /// Minimal node substituted when extraction fails.
    pub fn stub(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: Self::STUB_NAME.to_string(),
            node_type: NodeType::Unknown,
            properties: NodeProperties::default(),
            dependencies: NodeDependencies::default(),
        }
    }
}

/// Directed transition between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub uuid: String,
    pub from_node_uuid: String,
    pub from_node_name: String,
    pub to_node_uuid: String,
    pub to_node_name: String,
    /// Empty when unconditional
    #[serde(default)]
    pub condition: String,
    pub is_default: bool,
    pub label: String,
}

impl Flow {
    /// Maximum condition characters shown in a label.
    pub const LABEL_MAX_CHARS: usize = 50;

    /// Build a flow, deriving `is_default` and `label` from the condition.
    pub fn new(
        uuid: impl Into<String>,
        from: (&str, &str),
        to: (&str, &str),
        condition: impl Into<String>,
    ) -> Self {
        let condition = condition.into();
        let label = Self::label_for(&condition);
        Self {
            uuid: uuid.into(),
            from_node_uuid: from.0.to_string(),
            from_node_name: from.1.to_string(),
            to_node_uuid: to.0.to_string(),
            to_node_name: to.1.to_string(),
            is_default: condition.is_empty(),
            condition,
            label,
        }
    }

    /// Display label: the condition truncated, or `"default"`.
    #[must_use]
    pub fn label_for(condition: &str) -> String {
        if condition.is_empty() {
            return "default".to_string();
        }
        if condition.chars().count() > Self::LABEL_MAX_CHARS {
            let truncated: String = condition.chars().take(Self::LABEL_MAX_CHARS).collect();
            format!("{truncated}...")
        } else {
            condition.to_string()
        }
    }

    /// Identity used for de-duplication and comparison.
    #[must_use]
    pub fn endpoints(&self) -> (&str, &str) {
        (&self.from_node_uuid, &self.to_node_uuid)
    }
}

/// Incoming and outgoing flows of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConnections {
    #[serde(default)]
    pub incoming: Vec<Flow>,
    #[serde(default)]
    pub outgoing: Vec<Flow>,
}

/// Adjacency view of a process model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowGraph {
    /// Nodes with zero incoming flows
    pub start_nodes: Vec<String>,
    /// Nodes with zero outgoing flows
    pub end_nodes: Vec<String>,
    pub node_connections: BTreeMap<String, NodeConnections>,
}

/// Aggregate counts over a process model's nodes and flows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub total_nodes: usize,
    pub total_flows: usize,
    #[serde(default)]
    pub nodes_by_type: BTreeMap<String, usize>,
    pub start_node_count: usize,
    pub end_node_count: usize,
    /// Nodes substituted by stubs after a failed extraction
    #[serde(default)]
    pub failed_nodes: usize,
}
