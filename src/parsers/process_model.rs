//! Process model parser (first pass).
//!
//! The first pass only recovers identity, variables and security so the
//! model can enter the object directory. Nodes, flows and the flow graph
//! need every other object resolvable and are built by
//! [`crate::process::ProcessEnhancer`] once the directory is complete.

use super::common::{build_core, localized_text, object_uuid, security_roles};
use super::markup::XmlElement;
use super::traits::{Document, ObjectParser, path_in_dir};
use crate::model::{
    AppObject, FlowGraph, NodeSummary, ObjectType, ProcessModelObject, ProcessVariable,
};

/// Parser for `processModelHaul` documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessModelParser;

/// Locate the `pm` element of a process model document.
#[must_use]
pub fn process_model_element(root: &XmlElement) -> Option<&XmlElement> {
    if root.name != "processModelHaul" {
        return None;
    }
    root.path("process_model_port/pm")
        .or_else(|| root.child("pm"))
        .or_else(|| root.find("pm"))
}

/// Element carrying the model's identity (`meta`, or `pm` itself).
fn meta_element(pm: &XmlElement) -> &XmlElement {
    pm.child("meta").unwrap_or(pm)
}

fn truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| matches!(v.trim(), "true" | "1" | "yes"))
}

fn parse_variable(pv: &XmlElement) -> Option<ProcessVariable> {
    let name = pv
        .attr("name")
        .or_else(|| pv.child_text("name"))?
        .to_string();
    Some(ProcessVariable {
        name,
        var_type: pv
            .child_text("type")
            .or_else(|| pv.attr("type"))
            .unwrap_or_default()
            .to_string(),
        is_parameter: truthy(pv.child_text("parameter").or_else(|| pv.attr("parameter"))),
        is_required: truthy(pv.child_text("required").or_else(|| pv.attr("required"))),
    })
}

/// Process variables declared on the model.
#[must_use]
pub fn process_variables(pm: &XmlElement) -> Vec<ProcessVariable> {
    let container = pm.child_any(&["pvs", "process-variables"]).unwrap_or(pm);
    container
        .children_named("pv")
        .filter_map(parse_variable)
        .collect()
}

impl ObjectParser for ProcessModelParser {
    fn name(&self) -> &'static str {
        "process model"
    }

    fn can_handle(&self, path: &str) -> bool {
        path_in_dir(path, "processModel")
    }

    fn parse(&self, document: &Document<'_>) -> Option<AppObject> {
        let pm = process_model_element(document.root)?;
        let meta = meta_element(pm);

        let uuid = object_uuid(meta).or_else(|| object_uuid(pm))?;
        let name = meta
            .child("name")
            .and_then(localized_text)
            .or_else(|| meta.attr("name").map(str::to_string))?;

        Some(AppObject::ProcessModel(ProcessModelObject {
            core: build_core(document, meta, uuid, name, ObjectType::ProcessModel),
            variables: process_variables(pm),
            nodes: Vec::new(),
            flows: Vec::new(),
            flow_graph: FlowGraph::default(),
            node_summary: NodeSummary::default(),
            business_logic: String::new(),
            security_roles: security_roles(document.root),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROCESS: &str = r#"<processModelHaul>
  <process_model_port>
    <pm>
      <meta>
        <uuid>pm-1</uuid>
        <name><string-map><pair><locale>en_US</locale><value>Onboard Employee</value></pair></string-map></name>
        <desc><string-map><pair><locale>en_US</locale><value>Runs onboarding</value></pair></string-map></desc>
      </meta>
      <pvs>
        <pv name="employee"><type>Employee</type><parameter>true</parameter><required>true</required></pv>
        <pv name="approved"><type>boolean</type></pv>
      </pvs>
      <versionUuid>pv-2</versionUuid>
      <history><historyInfo versionUuid="pv-1"/></history>
    </pm>
  </process_model_port>
</processModelHaul>"#;

    #[test]
    fn test_first_pass_identity_and_variables() {
        let root = XmlElement::parse_document(PROCESS).expect("parse");
        let doc = Document {
            path: "processModel/pm-1.xml",
            raw: PROCESS,
            root: &root,
        };
        let Some(AppObject::ProcessModel(pm)) = ProcessModelParser.parse(&doc) else {
            panic!("expected process model");
        };
        assert_eq!(pm.core.uuid, "pm-1");
        assert_eq!(pm.core.name, "Onboard Employee");
        assert_eq!(pm.core.description, "Runs onboarding");
        assert_eq!(pm.core.version_id.as_deref(), Some("pv-2"));
        assert_eq!(pm.core.version_lineage.len(), 1);
        assert_eq!(pm.variables.len(), 2);
        assert!(pm.variables[0].is_parameter && pm.variables[0].is_required);
        assert!(!pm.variables[1].is_parameter);
        assert!(pm.nodes.is_empty());
    }
}
