//! Process-flow enhancement (second parsing pass).
//!
//! Runs once the object directory is complete: re-reads each process
//! model document, extracts nodes with resolved cross-references, rebuilds
//! the flows between them and derives the flow graph. A node that cannot be
//! extracted is replaced by a stub and a dropped flow becomes a diagnostic;
//! neither aborts the model.

mod flow;
mod formatter;
mod graph;
mod node;

pub use flow::{FlowExtraction, NodeIndex, extract_flows};
pub use formatter::{DEFAULT_WRAP_WIDTH, ExpressionFormatter, pretty_print, reference_tokens};
pub use graph::{build_flow_graph, summarize};
pub use node::{
    NodeExtractionError, NodeExtractor, determine_node_type, node_local_id, node_uuid,
};

use crate::model::{EnhancedNode, ObjectDirectory, ProcessModelObject};
use crate::parsers::{Document, XmlElement, process_model_element};

/// Second-pass builder for process models.
pub struct ProcessEnhancer<'a> {
    directory: &'a ObjectDirectory,
    format_expressions: bool,
}

impl<'a> ProcessEnhancer<'a> {
    #[must_use]
    pub const fn new(directory: &'a ObjectDirectory) -> Self {
        Self {
            directory,
            format_expressions: true,
        }
    }

    #[must_use]
    pub const fn format_expressions(mut self, enabled: bool) -> Self {
        self.format_expressions = enabled;
        self
    }

    /// Rebuild `base` (the first-pass object) with nodes, flows and graph.
    ///
    /// Documents that no longer have a process-model shape leave `base`
    /// unchanged.
    #[must_use]
    pub fn enhance(&self, document: &Document<'_>, base: &ProcessModelObject) -> ProcessModelObject {
        let mut model = base.clone();
        let Some(pm) = process_model_element(document.root) else {
            return model;
        };

        let mut extractor = NodeExtractor::new(self.directory);
        if self.format_expressions {
            extractor = extractor.with_formatter(ExpressionFormatter::new(self.directory));
        }

        let elements: Vec<&XmlElement> = match pm.child("nodes") {
            Some(nodes) => nodes.children_named("node").collect(),
            None => pm.find_all("node").collect(),
        };

        let mut nodes = Vec::with_capacity(elements.len());
        let mut local_ids = Vec::with_capacity(elements.len());
        let mut failed = 0;
        for (idx, element) in elements.iter().enumerate() {
            let node = match extractor.extract(element) {
                Ok(node) => node,
                Err(err) => {
                    failed += 1;
                    let uuid = node_uuid(element).unwrap_or_else(|| format!("node-{idx}"));
                    let message = format!("node {idx} could not be extracted: {err}");
                    tracing::warn!(process_model = %model.core.name, "{message}");
                    model.core.diagnostics.push(message);
                    EnhancedNode::stub(uuid)
                }
            };
            local_ids.push(node_local_id(element));
            nodes.push(node);
        }

        let mut index = NodeIndex::new();
        for (local_id, node) in local_ids.iter().zip(&nodes) {
            index.insert(local_id.as_deref(), node);
        }
        let pairs: Vec<(&XmlElement, &EnhancedNode)> =
            elements.iter().copied().zip(nodes.iter()).collect();
        let extraction = extract_flows(pm, &pairs, &index);
        model.core.diagnostics.extend(extraction.diagnostics);

        let flow_graph = build_flow_graph(&nodes, &extraction.flows);
        model.node_summary = summarize(&nodes, &extraction.flows, &flow_graph, failed);
        model.business_logic = business_logic(&nodes);
        model.flow_graph = flow_graph;
        model.flows = extraction.flows;
        model.nodes = nodes;

        tracing::debug!(
            process_model = %model.core.name,
            nodes = model.nodes.len(),
            flows = model.flows.len(),
            failed,
            "process model enhanced"
        );
        model
    }
}

/// Node expressions concatenated in node order, one block per node.
fn business_logic(nodes: &[EnhancedNode]) -> String {
    nodes
        .iter()
        .filter(|n| !n.properties.expressions.is_empty())
        .map(|n| {
            let body = n
                .properties
                .expressions
                .iter()
                .map(|(key, expr)| format!("{key}: {expr}"))
                .collect::<Vec<_>>()
                .join("\n");
            format!("[{}]\n{body}", n.name)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppObject, NodeType, ObjectCore, ObjectType, SimpleObject};
    use crate::parsers::{ObjectParser, ProcessModelParser};

    const PROCESS: &str = r#"<processModelHaul>
  <process_model_port>
    <pm>
      <meta><uuid>pm-1</uuid><name>Approve Request</name></meta>
      <nodes>
        <node uuid="n-a"><guiId>1</guiId><fname>Start</fname>
          <connections><connection><to>2</to></connection></connections></node>
        <node uuid="n-b"><guiId>2</guiId><fname>Review</fname>
          <form-config><form>#"iface-1"</form></form-config>
          <connections><connection><to>3</to><condition>pv!approved</condition></connection></connections></node>
        <node uuid="n-c"><guiId>3</guiId><fname>End</fname></node>
        <node><guiId>4</guiId><fname>Broken</fname></node>
      </nodes>
      <versionUuid>v1</versionUuid>
    </pm>
  </process_model_port>
</processModelHaul>"#;

    fn first_pass(root: &XmlElement) -> ProcessModelObject {
        let doc = Document {
            path: "processModel/pm-1.xml",
            raw: PROCESS,
            root,
        };
        match ProcessModelParser.parse(&doc) {
            Some(AppObject::ProcessModel(pm)) => pm,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_enhance_builds_graph() {
        let mut dir = ObjectDirectory::new();
        dir.add(AppObject::Simple(SimpleObject::new(ObjectCore::new(
            "iface-1",
            "Review Form",
            ObjectType::Interface,
        ))))
        .expect("add");

        let root = XmlElement::parse_document(PROCESS).expect("parse");
        let base = first_pass(&root);
        let doc = Document {
            path: "processModel/pm-1.xml",
            raw: PROCESS,
            root: &root,
        };
        let pm = ProcessEnhancer::new(&dir).enhance(&doc, &base);

        assert_eq!(pm.nodes.len(), 4);
        assert_eq!(pm.nodes[0].node_type, NodeType::StartNode);
        assert_eq!(pm.nodes[1].node_type, NodeType::UserInputTask);
        assert_eq!(pm.nodes[1].dependencies.interfaces[0].name, "Review Form");
        assert_eq!(pm.nodes[3].name, EnhancedNode::STUB_NAME);
        assert_eq!(pm.nodes[3].uuid, "node-3");

        assert_eq!(pm.flows.len(), 2);
        assert_eq!(pm.flows[1].label, "pv!approved");
        // The stub node is isolated, so it is both a start and an end
        assert_eq!(pm.flow_graph.start_nodes, vec!["n-a", "node-3"]);
        assert_eq!(pm.flow_graph.end_nodes, vec!["n-c", "node-3"]);
        assert_eq!(pm.node_summary.failed_nodes, 1);
        assert_eq!(pm.core.diagnostics.len(), 1);
        assert_eq!(pm.core.version_id.as_deref(), Some("v1"));
    }
}
