//! Parser for generic content objects: interfaces, rules, constants,
//! query rules, decisions and outbound integrations.

use super::common::{build_core, object_name, object_uuid, security_roles};
use super::markup::XmlElement;
use super::traits::{Document, ObjectParser, path_in_dir};
use crate::model::{AppObject, ObjectType, RuleInput, SimpleObject};

/// Content elements that never become objects.
const SKIPPED_ELEMENTS: &[&str] = &[
    "folder",
    "rulesFolder",
    "document",
    "communityKnowledgeCenter",
    "knowledgeCenter",
];

/// Bookkeeping siblings of the content element inside the haul.
const METADATA_ELEMENTS: &[&str] = &["versionUuid", "history", "roleMap", "migrationVersion"];

/// Parser for `contentHaul` documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentParser;

impl ContentParser {
    fn object_type_for(tag: &str) -> ObjectType {
        match tag {
            "interface" => ObjectType::Interface,
            "rule" => ObjectType::ExpressionRule,
            "constant" => ObjectType::Constant,
            "queryRule" => ObjectType::QueryRule,
            "decision" => ObjectType::DecisionRule,
            "outboundIntegration" => ObjectType::Integration,
            other => ObjectType::Other(other.to_string()),
        }
    }

    fn business_logic(element: &XmlElement) -> String {
        if let Some(code) = element.child_text_any(&["definition", "query", "expression"]) {
            return code.to_string();
        }
        element
            .child("typedValue")
            .and_then(|tv| tv.child_text("value").or_else(|| tv.text()))
            .unwrap_or_default()
            .to_string()
    }

    fn inputs(element: &XmlElement) -> Vec<RuleInput> {
        element
            .children_named("ruleInput")
            .filter_map(|input| {
                let name = input
                    .attr("name")
                    .or_else(|| input.child_text("name"))?
                    .to_string();
                let input_type = input
                    .child_text_any(&["type", "typeName"])
                    .or_else(|| input.attr("type"))
                    .unwrap_or_default()
                    .to_string();
                Some(RuleInput { name, input_type })
            })
            .collect()
    }
}

impl ObjectParser for ContentParser {
    fn name(&self) -> &'static str {
        "content"
    }

    fn can_handle(&self, path: &str) -> bool {
        path_in_dir(path, "content")
    }

    fn parse(&self, document: &Document<'_>) -> Option<AppObject> {
        let root = document.root;
        if root.name != "contentHaul" {
            return None;
        }
        let element = root
            .children
            .iter()
            .find(|c| !METADATA_ELEMENTS.contains(&c.name.as_str()))?;
        if SKIPPED_ELEMENTS.contains(&element.name.as_str()) {
            tracing::debug!(path = document.path, tag = %element.name, "skipping content element");
            return None;
        }

        let uuid = object_uuid(element)?;
        let name = object_name(element, &["name"])?;
        let object_type = Self::object_type_for(&element.name);

        let mut object = SimpleObject::new(build_core(document, element, uuid, name, object_type));
        object.business_logic = Self::business_logic(element);
        object.inputs = Self::inputs(element);
        object.security_roles = security_roles(root);

        if let Some(ty) = element
            .child("typedValue")
            .and_then(|tv| tv.child_text("type").or_else(|| tv.attr("type")))
        {
            object.attributes.insert("value_type".to_string(), ty.to_string());
        }
        if let Some(cs) = element.child_text("connectedSystemUuid") {
            object
                .attributes
                .insert("connected_system".to_string(), cs.to_string());
        }
        if let Some(public) = element.attr("public") {
            object.attributes.insert("public".to_string(), public.to_string());
        }

        Some(AppObject::Simple(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Option<AppObject> {
        let root = XmlElement::parse_document(xml).expect("parse");
        let doc = Document {
            path: "content/x.xml",
            raw: xml,
            root: &root,
        };
        ContentParser.parse(&doc)
    }

    #[test]
    fn test_parse_rule_with_inputs() {
        let xml = r#"<contentHaul>
  <rule name="calcTotal" a:uuid="r-1" xmlns:a="urn:a">
    <description>Sum line items</description>
    <definition>sum(ri!items.amount)</definition>
    <ruleInput><name>items</name><type>LineItem?list</type></ruleInput>
    <versionUuid>rv-1</versionUuid>
  </rule>
</contentHaul>"#;
        let Some(AppObject::Simple(rule)) = parse(xml) else {
            panic!("expected rule");
        };
        assert_eq!(rule.core.object_type, ObjectType::ExpressionRule);
        assert_eq!(rule.core.name, "calcTotal");
        assert_eq!(rule.business_logic, "sum(ri!items.amount)");
        assert_eq!(rule.inputs.len(), 1);
        assert_eq!(rule.inputs[0].input_type, "LineItem?list");
        assert_eq!(rule.core.version_id.as_deref(), Some("rv-1"));
    }

    #[test]
    fn test_parse_constant_value() {
        let xml = r#"<contentHaul><constant name="MAX" uuid="c-1"><typedValue><type>int</type><value>10</value></typedValue></constant><versionUuid>cv</versionUuid></contentHaul>"#;
        let Some(AppObject::Simple(constant)) = parse(xml) else {
            panic!("expected constant");
        };
        assert_eq!(constant.core.object_type, ObjectType::Constant);
        assert_eq!(constant.business_logic, "10");
        assert_eq!(constant.attributes.get("value_type").map(String::as_str), Some("int"));
        assert_eq!(constant.core.version_id.as_deref(), Some("cv"));
    }

    #[test]
    fn test_folders_are_skipped() {
        assert!(parse(r#"<contentHaul><rulesFolder name="F" uuid="f-1"/></contentHaul>"#).is_none());
    }

    #[test]
    fn test_unknown_element_becomes_other() {
        let Some(obj) = parse(r#"<contentHaul><tempoFeed name="Feed" uuid="t-1"/></contentHaul>"#)
        else {
            panic!("expected object");
        };
        assert_eq!(obj.object_type(), &ObjectType::Other("tempoFeed".to_string()));
    }
}
