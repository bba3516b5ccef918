//! Application objects extracted from a package.

use super::process::{EnhancedNode, Flow, FlowGraph, NodeSummary};
use super::{RawTree, VersionEntry};
use crate::content::DiffHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of application object.
///
/// Serialized as its display tag so unknown kinds survive a round trip as
/// [`ObjectType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectType {
    Site,
    RecordType,
    ProcessModel,
    Interface,
    ExpressionRule,
    QueryRule,
    DecisionRule,
    Constant,
    Integration,
    DataType,
    ConnectedSystem,
    WebApi,
    SecurityGroup,
    Report,
    Other(String),
}

impl ObjectType {
    /// Display tag for this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Site => "Site",
            Self::RecordType => "Record Type",
            Self::ProcessModel => "Process Model",
            Self::Interface => "Interface",
            Self::ExpressionRule => "Expression Rule",
            Self::QueryRule => "Query Rule",
            Self::DecisionRule => "Decision Rule",
            Self::Constant => "Constant",
            Self::Integration => "Integration",
            Self::DataType => "Data Type",
            Self::ConnectedSystem => "Connected System",
            Self::WebApi => "Web API",
            Self::SecurityGroup => "Group",
            Self::Report => "Report",
            Self::Other(tag) => tag,
        }
    }

    /// Report category this kind is aggregated under.
    #[must_use]
    pub fn category(&self) -> ObjectCategory {
        match self {
            Self::Interface => ObjectCategory::Interfaces,
            Self::ExpressionRule | Self::QueryRule | Self::DecisionRule => ObjectCategory::Rules,
            Self::Constant => ObjectCategory::Constants,
            Self::ProcessModel => ObjectCategory::ProcessModels,
            Self::RecordType => ObjectCategory::RecordTypes,
            Self::DataType => ObjectCategory::DataTypes,
            Self::Integration | Self::ConnectedSystem | Self::WebApi => ObjectCategory::Integrations,
            Self::Site => ObjectCategory::Sites,
            Self::SecurityGroup => ObjectCategory::Groups,
            Self::Report => ObjectCategory::Reports,
            Self::Other(_) => ObjectCategory::Other,
        }
    }

    /// Whether references to this kind count as rule dependencies of a node.
    #[must_use]
    pub const fn is_rule_like(&self) -> bool {
        matches!(
            self,
            Self::ExpressionRule
                | Self::QueryRule
                | Self::DecisionRule
                | Self::Constant
                | Self::Integration
        )
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ObjectType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Site" => Self::Site,
            "Record Type" => Self::RecordType,
            "Process Model" => Self::ProcessModel,
            "Interface" => Self::Interface,
            "Expression Rule" => Self::ExpressionRule,
            "Query Rule" => Self::QueryRule,
            "Decision Rule" => Self::DecisionRule,
            "Constant" => Self::Constant,
            "Integration" => Self::Integration,
            "Data Type" => Self::DataType,
            "Connected System" => Self::ConnectedSystem,
            "Web API" => Self::WebApi,
            "Group" => Self::SecurityGroup,
            "Report" => Self::Report,
            _ => Self::Other(value),
        }
    }
}

impl From<ObjectType> for String {
    fn from(value: ObjectType) -> Self {
        match value {
            ObjectType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// Fixed category table used by blueprints and comparison reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectCategory {
    Interfaces,
    Rules,
    Constants,
    ProcessModels,
    RecordTypes,
    DataTypes,
    Integrations,
    Sites,
    Groups,
    Reports,
    Other,
}

impl ObjectCategory {
    pub const ALL: [Self; 11] = [
        Self::Interfaces,
        Self::Rules,
        Self::Constants,
        Self::ProcessModels,
        Self::RecordTypes,
        Self::DataTypes,
        Self::Integrations,
        Self::Sites,
        Self::Groups,
        Self::Reports,
        Self::Other,
    ];

    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Interfaces => "interfaces",
            Self::Rules => "rules",
            Self::Constants => "constants",
            Self::ProcessModels => "process_models",
            Self::RecordTypes => "record_types",
            Self::DataTypes => "data_types",
            Self::Integrations => "integrations",
            Self::Sites => "sites",
            Self::Groups => "groups",
            Self::Reports => "reports",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fields shared by every object kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectCore {
    pub uuid: String,
    pub name: String,
    pub object_type: ObjectType,
    #[serde(default)]
    pub description: String,
    /// Complete original document text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw_document: String,
    pub version_id: Option<String>,
    #[serde(default)]
    pub version_lineage: Vec<VersionEntry>,
    #[serde(default)]
    pub raw_tree: RawTree,
    /// Computed after both parsing passes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_hash: Option<DiffHash>,
    /// Recoverable extraction problems attached to this object
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl ObjectCore {
    /// Create a core with the given identity and empty payload.
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, object_type: ObjectType) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            object_type,
            description: String::new(),
            raw_document: String::new(),
            version_id: None,
            version_lineage: Vec::new(),
            raw_tree: RawTree::default(),
            diff_hash: None,
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    #[must_use]
    pub fn with_lineage(mut self, lineage: Vec<VersionEntry>) -> Self {
        self.version_lineage = lineage;
        self
    }

    #[must_use]
    pub fn with_raw_document(mut self, raw: impl Into<String>) -> Self {
        self.raw_document = raw.into();
        self
    }
}

/// A named security role and its members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRole {
    pub name: String,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Page of a site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitePage {
    pub uuid: String,
    pub name: String,
    /// Visibility expression, empty when always visible
    #[serde(default)]
    pub visibility: String,
    /// UUIDs of the UI objects shown on the page
    #[serde(default)]
    pub ui_objects: Vec<String>,
    /// Display names aligned with `ui_objects`, `None` when not in the package
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ui_object_names: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteObject {
    pub core: ObjectCore,
    #[serde(default)]
    pub pages: Vec<SitePage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordField {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub field_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRelationship {
    pub uuid: String,
    pub name: String,
    /// Target record type reference
    pub target_record_uuid: String,
    /// Display name of the target, set once the package is fully read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_record_name: Option<String>,
    #[serde(default)]
    pub relationship_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAction {
    pub key: String,
    pub title: String,
    /// Process model started by this action
    #[serde(default)]
    pub target_process_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_process_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordView {
    pub name: String,
    #[serde(default)]
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordTypeObject {
    pub core: ObjectCore,
    #[serde(default)]
    pub fields: Vec<RecordField>,
    #[serde(default)]
    pub relationships: Vec<RecordRelationship>,
    #[serde(default)]
    pub actions: Vec<RecordAction>,
    #[serde(default)]
    pub views: Vec<RecordView>,
    #[serde(default)]
    pub security_roles: Vec<SecurityRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessVariable {
    pub name: String,
    #[serde(default)]
    pub var_type: String,
    #[serde(default)]
    pub is_parameter: bool,
    #[serde(default)]
    pub is_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessModelObject {
    pub core: ObjectCore,
    #[serde(default)]
    pub variables: Vec<ProcessVariable>,
    #[serde(default)]
    pub nodes: Vec<EnhancedNode>,
    #[serde(default)]
    pub flows: Vec<Flow>,
    #[serde(default)]
    pub flow_graph: FlowGraph,
    #[serde(default)]
    pub node_summary: NodeSummary,
    #[serde(default)]
    pub business_logic: String,
    #[serde(default)]
    pub security_roles: Vec<SecurityRole>,
}

/// Rule input declared on a content object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInput {
    pub name: String,
    #[serde(default)]
    pub input_type: String,
}

/// Interfaces, rules, constants, integrations, groups, reports and other
/// kinds whose meaningful content is a single payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleObject {
    pub core: ObjectCore,
    #[serde(default)]
    pub business_logic: String,
    #[serde(default)]
    pub security_roles: Vec<SecurityRole>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<RuleInput>,
    /// Kind-specific scalar attributes (constant type, integration URL, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl SimpleObject {
    #[must_use]
    pub fn new(core: ObjectCore) -> Self {
        Self {
            core,
            business_logic: String::new(),
            security_roles: Vec::new(),
            inputs: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }
}

/// An extracted application object, one variant per structural kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AppObject {
    Site(SiteObject),
    RecordType(RecordTypeObject),
    ProcessModel(ProcessModelObject),
    Simple(SimpleObject),
}

impl AppObject {
    #[must_use]
    pub const fn core(&self) -> &ObjectCore {
        match self {
            Self::Site(o) => &o.core,
            Self::RecordType(o) => &o.core,
            Self::ProcessModel(o) => &o.core,
            Self::Simple(o) => &o.core,
        }
    }

    pub fn core_mut(&mut self) -> &mut ObjectCore {
        match self {
            Self::Site(o) => &mut o.core,
            Self::RecordType(o) => &mut o.core,
            Self::ProcessModel(o) => &mut o.core,
            Self::Simple(o) => &mut o.core,
        }
    }

    #[must_use]
    pub fn uuid(&self) -> &str {
        &self.core().uuid
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.core().name
    }

    #[must_use]
    pub const fn object_type(&self) -> &ObjectType {
        &self.core().object_type
    }

    #[must_use]
    pub fn version_id(&self) -> Option<&str> {
        self.core().version_id.as_deref()
    }

    /// Code payload compared byte-for-byte in content diffs.
    #[must_use]
    pub fn business_logic(&self) -> &str {
        match self {
            Self::ProcessModel(o) => &o.business_logic,
            Self::Simple(o) => &o.business_logic,
            Self::Site(_) | Self::RecordType(_) => "",
        }
    }

    #[must_use]
    pub fn security_roles(&self) -> &[SecurityRole] {
        match self {
            Self::RecordType(o) => &o.security_roles,
            Self::ProcessModel(o) => &o.security_roles,
            Self::Simple(o) => &o.security_roles,
            Self::Site(_) => &[],
        }
    }

    /// Named structural counts (fields, nodes, pages, ...) for content diffs.
    #[must_use]
    pub fn structure_counts(&self) -> Vec<(&'static str, usize)> {
        match self {
            Self::Site(o) => vec![("pages", o.pages.len())],
            Self::RecordType(o) => vec![
                ("fields", o.fields.len()),
                ("relationships", o.relationships.len()),
                ("actions", o.actions.len()),
                ("views", o.views.len()),
            ],
            Self::ProcessModel(o) => vec![
                ("variables", o.variables.len()),
                ("nodes", o.nodes.len()),
                ("flows", o.flows.len()),
            ],
            Self::Simple(o) => vec![("inputs", o.inputs.len())],
        }
    }

    #[must_use]
    pub const fn as_process_model(&self) -> Option<&ProcessModelObject> {
        match self {
            Self::ProcessModel(pm) => Some(pm),
            _ => None,
        }
    }
}
