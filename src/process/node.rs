//! Node extraction for the process-model enhancement pass.

use super::formatter::{ExpressionFormatter, reference_tokens};
use crate::model::{
    DependencyRef, EnhancedNode, NodeDependencies, NodeProperties, NodeType, ObjectDirectory,
    ObjectType, PropertyMap,
};
use crate::parsers::XmlElement;
use std::collections::HashSet;
use thiserror::Error;

/// Why a node could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeExtractionError {
    #[error("node has no uuid")]
    MissingUuid,
    #[error("node {0} has no name")]
    MissingName(String),
}

/// Name tokens hinting at a node type, checked in order.
const NAME_HINTS: &[(&[&str], NodeType)] = &[
    (&["start", "begin"], NodeType::StartNode),
    (&["end", "finish", "terminate"], NodeType::EndNode),
    (&["gateway", "decision", "branch", "xor"], NodeType::Gateway),
];

/// Extracts [`EnhancedNode`]s with cross-references resolved.
pub struct NodeExtractor<'a> {
    directory: &'a ObjectDirectory,
    formatter: Option<ExpressionFormatter<'a>>,
}

impl<'a> NodeExtractor<'a> {
    #[must_use]
    pub const fn new(directory: &'a ObjectDirectory) -> Self {
        Self {
            directory,
            formatter: None,
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: ExpressionFormatter<'a>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Extract one node element.
    pub fn extract(&self, element: &XmlElement) -> Result<EnhancedNode, NodeExtractionError> {
        let uuid = node_uuid(element).ok_or(NodeExtractionError::MissingUuid)?;
        let name =
            node_name(element).ok_or_else(|| NodeExtractionError::MissingName(uuid.clone()))?;

        Ok(EnhancedNode {
            node_type: determine_node_type(element, &name),
            properties: NodeProperties {
                basic: self.basic_properties(element),
                assignment: self.assignment_properties(element),
                forms: self.form_properties(element),
                expressions: self.expression_properties(element),
                escalation: escalation_properties(element),
            },
            dependencies: self.dependencies(element),
            uuid,
            name,
        })
    }

    fn format(&self, expression: &str) -> String {
        match &self.formatter {
            Some(formatter) => formatter.format(expression),
            None => expression.trim().to_string(),
        }
    }

    fn basic_properties(&self, element: &XmlElement) -> PropertyMap {
        let mut props = PropertyMap::new();
        if let Some(desc) = element
            .child_any(&["desc", "description"])
            .map(localized_or_text)
            .filter(|d| !d.is_empty())
        {
            props.insert("description".to_string(), desc);
        }
        if let Some(priority) = element
            .child_text("priority")
            .or_else(|| element.find("priority").and_then(XmlElement::text))
        {
            props.insert("priority".to_string(), priority.to_string());
        }
        if let Some(deadline) = element.find("deadline") {
            let text = expression_text(deadline);
            if !text.is_empty() {
                props.insert("deadline".to_string(), self.format(&text));
            }
        }
        props
    }

    fn assignment_properties(&self, element: &XmlElement) -> PropertyMap {
        let mut props = PropertyMap::new();
        let Some(assign) = element
            .child_any(&["assign", "assignment"])
            .or_else(|| element.find("assign"))
        else {
            return props;
        };

        let users: Vec<&str> = assign
            .find_all("user")
            .chain(assign.find_all("username"))
            .filter_map(XmlElement::text)
            .collect();
        let groups: Vec<String> = assign
            .find_all("group")
            .filter_map(XmlElement::text)
            .map(|uuid| self.directory.resolve(uuid))
            .collect();
        let expression = assign
            .child_any(&["expression", "expr"])
            .map(expression_text)
            .filter(|e| !e.is_empty());

        let (kind, assignees) = if !users.is_empty() {
            ("User", users.join(", "))
        } else if !groups.is_empty() {
            ("Group", groups.join(", "))
        } else if let Some(expression) = expression {
            ("Expression", self.format(&expression))
        } else {
            ("None", String::new())
        };
        props.insert("type".to_string(), kind.to_string());
        if !assignees.is_empty() {
            props.insert("assignees".to_string(), assignees);
        }
        props
    }

    fn form_properties(&self, element: &XmlElement) -> PropertyMap {
        let mut props = PropertyMap::new();
        let Some(form) = element.find("form-config").or_else(|| element.find("form-map")) else {
            return props;
        };

        let text = form.deep_text();
        let interface_uuid = reference_tokens(&text)
            .map(str::to_string)
            .chain(
                form.descendants()
                    .flat_map(|e| {
                        e.text()
                            .into_iter()
                            .chain(e.attributes.iter().map(|(_, v)| v.as_str()))
                    })
                    .map(|v| v.trim().to_string()),
            )
            .find(|candidate| {
                self.directory
                    .object_type_of(candidate)
                    .is_some_and(|ty| *ty == ObjectType::Interface)
            });

        if let Some(uuid) = interface_uuid {
            props.insert("interface".to_string(), self.directory.resolve(&uuid));
            props.insert("interface_uuid".to_string(), uuid);
        }
        props
    }

    fn expression_properties(&self, element: &XmlElement) -> PropertyMap {
        let mut props = PropertyMap::new();
        for (tag, key) in [("pre-activity", "pre_activity"), ("post-activity", "post_activity")] {
            if let Some(block) = element.find(tag) {
                let text = expression_text(block);
                if !text.is_empty() {
                    props.insert(key.to_string(), self.format(&text));
                }
            }
        }
        if let Some(outputs) = element.find("output-exprs") {
            let exprs: Vec<String> = if outputs.children.is_empty() {
                outputs.text().map(str::to_string).into_iter().collect()
            } else {
                outputs
                    .children
                    .iter()
                    .map(expression_text)
                    .filter(|e| !e.is_empty())
                    .collect()
            };
            for (i, expr) in exprs.iter().enumerate() {
                props.insert(format!("output_{}", i + 1), self.format(expr));
            }
        }
        props
    }

    /// Resolve every referenced object and bucket it by kind.
    ///
    /// Candidates are `#"uuid"` tokens plus exact attribute and text values;
    /// candidates missing from the directory are dropped.
    fn dependencies(&self, element: &XmlElement) -> NodeDependencies {
        let text = element.deep_text();
        let mut seen = HashSet::new();
        let mut deps = NodeDependencies::default();

        let exact_values = element.descendants().flat_map(|e| {
            e.text()
                .into_iter()
                .chain(e.attributes.iter().map(|(_, v)| v.as_str()))
        });

        for candidate in reference_tokens(&text).chain(exact_values) {
            let candidate = candidate.trim();
            let Some(object) = self.directory.get(candidate) else {
                continue;
            };
            if !seen.insert(candidate.to_string()) {
                continue;
            }
            let object_type = object.object_type().clone();
            let bucket = match &object_type {
                ObjectType::Interface => &mut deps.interfaces,
                ObjectType::SecurityGroup => &mut deps.groups,
                ty if ty.is_rule_like() => &mut deps.rules,
                _ => continue,
            };
            bucket.push(DependencyRef {
                uuid: candidate.to_string(),
                name: object.name().to_string(),
                object_type,
            });
        }
        deps
    }
}

fn localized_or_text(element: &XmlElement) -> String {
    element
        .find_all("value")
        .find_map(XmlElement::text)
        .or_else(|| element.text())
        .unwrap_or_default()
        .to_string()
}

/// Concatenated text of an expression block, one line per text node.
fn expression_text(element: &XmlElement) -> String {
    element
        .descendants()
        .filter_map(XmlElement::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Node uuid from the `uuid` attribute or child.
#[must_use]
pub fn node_uuid(element: &XmlElement) -> Option<String> {
    element
        .attr("uuid")
        .or_else(|| element.child_text("uuid"))
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
}

/// Short-form local id used by connections.
#[must_use]
pub fn node_local_id(element: &XmlElement) -> Option<String> {
    element
        .child_text_any(&["guiId", "local-id", "id"])
        .or_else(|| element.attr("guiId"))
        .or_else(|| element.attr("id"))
        .or_else(|| element.child("ac").and_then(|ac| ac.child_text("local-id")))
        .map(str::to_string)
}

fn node_name(element: &XmlElement) -> Option<String> {
    element
        .child_any(&["fname", "name"])
        .map(localized_or_text)
        .filter(|n| !n.is_empty())
        .or_else(|| element.attr("name").map(str::to_string))
}

/// Classify a node; the first matching rule wins.
#[must_use]
pub fn determine_node_type(element: &XmlElement, name: &str) -> NodeType {
    let lowered = name.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    for (hints, node_type) in NAME_HINTS {
        if tokens.iter().any(|t| hints.contains(t)) {
            return *node_type;
        }
    }

    if element.contains("form-config") || element.contains("form-map") {
        return NodeType::UserInputTask;
    }

    let subprocess_param = element
        .find_all("acp")
        .any(|acp| acp.attr("name") == Some("pmUuid"));
    if element.contains("subprocess-uuid") || subprocess_param {
        return NodeType::Subprocess;
    }

    if element.contains("gateway-type") {
        return NodeType::Gateway;
    }

    let class = element
        .attr("class")
        .or_else(|| element.child("ac").and_then(|ac| ac.attr("class")))
        .unwrap_or_default()
        .to_lowercase();
    if class.contains("start") {
        return NodeType::StartNode;
    }
    if class.contains("end") {
        return NodeType::EndNode;
    }

    if element.contains("output-exprs") || element.contains("pre-activity") {
        return NodeType::ScriptTask;
    }

    NodeType::Unknown
}

fn escalation_properties(element: &XmlElement) -> PropertyMap {
    let mut props = PropertyMap::new();
    let Some(escalation) = element.find("escalation") else {
        return props;
    };

    let enabled = escalation
        .attr("enabled")
        .or_else(|| escalation.child_text("enabled"))
        .map_or(true, |v| v.trim() != "false");
    props.insert("enabled".to_string(), enabled.to_string());
    if let Some(time) = escalation.child_text_any(&["time", "delay", "interval"]) {
        props.insert("time".to_string(), time.to_string());
    }
    if let Some(action) = escalation.child_text_any(&["action", "escalation-action"]) {
        props.insert("action".to_string(), action.to_string());
    }
    let notify = escalation.contains("notify")
        && escalation
            .find("notify")
            .and_then(XmlElement::text)
            .is_none_or(|v| v != "false");
    props.insert("notify".to_string(), notify.to_string());
    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppObject, ObjectCore, SimpleObject};

    fn directory() -> ObjectDirectory {
        let mut dir = ObjectDirectory::new();
        for (uuid, name, ty) in [
            ("iface-1", "Review Form", ObjectType::Interface),
            ("rule-1", "calcTotal", ObjectType::ExpressionRule),
            ("grp-1", "Approvers", ObjectType::SecurityGroup),
            ("site-1", "Portal", ObjectType::Site),
        ] {
            dir.add(AppObject::Simple(SimpleObject::new(ObjectCore::new(uuid, name, ty))))
                .expect("add");
        }
        dir
    }

    fn element(xml: &str) -> XmlElement {
        XmlElement::parse_document(xml).expect("parse")
    }

    #[test]
    fn test_name_hints_match_tokens_not_substrings() {
        let el = element("<node/>");
        assert_eq!(determine_node_type(&el, "Start Process"), NodeType::StartNode);
        assert_eq!(determine_node_type(&el, "End"), NodeType::EndNode);
        assert_eq!(determine_node_type(&el, "XOR split"), NodeType::Gateway);
        assert_eq!(determine_node_type(&el, "Send Email"), NodeType::Unknown);
        assert_eq!(determine_node_type(&el, "Append Items"), NodeType::Unknown);
    }

    #[test]
    fn test_structural_rules_in_order() {
        let form = element("<node><form-config/><output-exprs/></node>");
        assert_eq!(determine_node_type(&form, "Review"), NodeType::UserInputTask);

        let sub = element(r#"<node><ac><acps><acp name="pmUuid">pm-2</acp></acps></ac></node>"#);
        assert_eq!(determine_node_type(&sub, "Call"), NodeType::Subprocess);

        let gw = element("<node><gateway-type>XOR</gateway-type></node>");
        assert_eq!(determine_node_type(&gw, "Route"), NodeType::Gateway);

        let class = element(r#"<node class="core.StartEvent"/>"#);
        assert_eq!(determine_node_type(&class, "Kickoff"), NodeType::StartNode);

        let script = element("<node><pre-activity><expr>1</expr></pre-activity></node>");
        assert_eq!(determine_node_type(&script, "Compute"), NodeType::ScriptTask);
    }

    #[test]
    fn test_extract_full_node() {
        let dir = directory();
        let el = element(
            r#"<node uuid="n-1">
                 <guiId>3</guiId>
                 <fname><string-map><pair><value>Review Request</value></pair></string-map></fname>
                 <desc>Manager review</desc>
                 <priority>2</priority>
                 <assign><groups><group>grp-1</group></groups></assign>
                 <form-config><uiExpressionForm>#"iface-1"(pv!request)</uiExpressionForm></form-config>
                 <output-exprs><expr>#"rule-1"(pv!items)</expr></output-exprs>
                 <escalation><time>2h</time><action>reassign</action></escalation>
                 <ref>site-1</ref>
               </node>"#,
        );
        let node = NodeExtractor::new(&dir).extract(&el).expect("extract");

        assert_eq!(node.uuid, "n-1");
        assert_eq!(node.name, "Review Request");
        assert_eq!(node.node_type, NodeType::UserInputTask);
        assert_eq!(node.properties.basic.get("priority").map(String::as_str), Some("2"));
        assert_eq!(node.properties.assignment.get("type").map(String::as_str), Some("Group"));
        assert_eq!(
            node.properties.assignment.get("assignees").map(String::as_str),
            Some("Approvers")
        );
        assert_eq!(node.properties.forms.get("interface").map(String::as_str), Some("Review Form"));
        assert_eq!(
            node.properties.expressions.get("output_1").map(String::as_str),
            Some(r#"#"rule-1"(pv!items)"#)
        );
        assert_eq!(node.properties.escalation.get("enabled").map(String::as_str), Some("true"));
        assert_eq!(node.properties.escalation.get("notify").map(String::as_str), Some("false"));

        assert_eq!(node.dependencies.interfaces.len(), 1);
        assert_eq!(node.dependencies.rules.len(), 1);
        assert_eq!(node.dependencies.groups.len(), 1);
        assert_eq!(node.dependencies.groups[0].name, "Approvers");
    }

    #[test]
    fn test_formatter_resolves_expression_references() {
        let dir = directory();
        let el = element(r#"<node uuid="n"><name>Calc</name><output-exprs><expr>#"rule-1"()</expr></output-exprs></node>"#);
        let node = NodeExtractor::new(&dir)
            .with_formatter(ExpressionFormatter::new(&dir))
            .extract(&el)
            .expect("extract");
        assert_eq!(
            node.properties.expressions.get("output_1").map(String::as_str),
            Some(r#"#"calcTotal"()"#)
        );
    }

    #[test]
    fn test_missing_sub_elements_give_empty_categories() {
        let dir = directory();
        let el = element(r#"<node uuid="n"><name>Plain</name></node>"#);
        let node = NodeExtractor::new(&dir).extract(&el).expect("extract");
        assert!(node.properties.assignment.is_empty());
        assert!(node.properties.forms.is_empty());
        assert!(node.properties.escalation.is_empty());
        assert!(node.dependencies.is_empty());
    }

    #[test]
    fn test_extraction_errors() {
        let dir = directory();
        let extractor = NodeExtractor::new(&dir);
        assert_eq!(
            extractor.extract(&element("<node><name>x</name></node>")),
            Err(NodeExtractionError::MissingUuid)
        );
        assert_eq!(
            extractor.extract(&element(r#"<node uuid="n-9"/>"#)),
            Err(NodeExtractionError::MissingName("n-9".to_string()))
        );
    }
}
