//! Table-driven parser for single-payload object kinds.

use super::common::{build_core, object_name, object_uuid, security_roles};
use super::traits::{Document, ObjectParser, path_in_dir};
use crate::model::{AppObject, ObjectType, SimpleObject};

/// Shape of one simple object kind.
#[derive(Debug, Clone)]
pub struct SimpleShape {
    pub directory: &'static str,
    pub haul: &'static str,
    pub element: &'static str,
    pub object_type: ObjectType,
    /// Child elements whose text is the business-logic payload, in priority order
    pub payload: &'static [&'static str],
    /// Child elements (or attributes) copied into `attributes`
    pub attributes: &'static [&'static str],
}

pub const GROUP: SimpleShape = SimpleShape {
    directory: "group",
    haul: "groupHaul",
    element: "group",
    object_type: ObjectType::SecurityGroup,
    payload: &[],
    attributes: &["groupTypeUuid", "parentUuid", "membershipPolicy", "visibilityPolicy"],
};

pub const CONNECTED_SYSTEM: SimpleShape = SimpleShape {
    directory: "connectedSystem",
    haul: "connectedSystemHaul",
    element: "connectedSystem",
    object_type: ObjectType::ConnectedSystem,
    payload: &["configuration", "baseUrl"],
    attributes: &["integrationType", "baseUrl", "authType"],
};

pub const WEB_API: SimpleShape = SimpleShape {
    directory: "webApi",
    haul: "webApiHaul",
    element: "webApi",
    object_type: ObjectType::WebApi,
    payload: &["expression", "definition"],
    attributes: &["urlAlias", "httpMethod"],
};

pub const REPORT: SimpleShape = SimpleShape {
    directory: "tempoReport",
    haul: "tempoReportHaul",
    element: "tempoReport",
    object_type: ObjectType::Report,
    payload: &["definition", "expression"],
    attributes: &["visibility"],
};

pub const DATA_TYPE: SimpleShape = SimpleShape {
    directory: "datatype",
    haul: "datatypeHaul",
    element: "datatype",
    object_type: ObjectType::DataType,
    payload: &["typeDefinition", "xsd", "definition"],
    attributes: &["qualifiedName", "namespace"],
};

/// Parser for one [`SimpleShape`].
#[derive(Debug, Clone)]
pub struct SimpleParser {
    shape: SimpleShape,
}

impl SimpleParser {
    #[must_use]
    pub fn new(shape: SimpleShape) -> Self {
        Self { shape }
    }
}

impl ObjectParser for SimpleParser {
    fn name(&self) -> &'static str {
        self.shape.element
    }

    fn can_handle(&self, path: &str) -> bool {
        path_in_dir(path, self.shape.directory)
    }

    fn parse(&self, document: &Document<'_>) -> Option<AppObject> {
        let root = document.root;
        if root.name != self.shape.haul {
            return None;
        }
        let element = root.child(self.shape.element)?;
        let uuid = object_uuid(element)?;
        let name = object_name(element, &["name"])?;

        let mut object = SimpleObject::new(build_core(
            document,
            element,
            uuid,
            name,
            self.shape.object_type.clone(),
        ));
        object.business_logic = element
            .child_text_any(self.shape.payload)
            .unwrap_or_default()
            .to_string();
        object.security_roles = security_roles(root);
        for key in self.shape.attributes {
            if let Some(value) = element.attr(key).or_else(|| element.child_text(key)) {
                object.attributes.insert((*key).to_string(), value.to_string());
            }
        }

        Some(AppObject::Simple(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::XmlElement;

    #[test]
    fn test_parse_group() {
        let xml = r#"<groupHaul><group a:uuid="g-1" xmlns:a="urn:a"><name>Managers</name><parentUuid>g-0</parentUuid><versionUuid>gv</versionUuid></group></groupHaul>"#;
        let root = XmlElement::parse_document(xml).expect("parse");
        let doc = Document {
            path: "group/g-1.xml",
            raw: xml,
            root: &root,
        };
        let parser = SimpleParser::new(GROUP);
        assert!(parser.can_handle(doc.path));
        assert!(!parser.can_handle("content/g-1.xml"));

        let Some(AppObject::Simple(group)) = parser.parse(&doc) else {
            panic!("expected group");
        };
        assert_eq!(group.core.object_type, ObjectType::SecurityGroup);
        assert_eq!(group.core.name, "Managers");
        assert_eq!(group.attributes.get("parentUuid").map(String::as_str), Some("g-0"));
    }

    #[test]
    fn test_parse_web_api_payload() {
        let xml = r#"<webApiHaul><webApi uuid="w-1" name="orders"><urlAlias>orders</urlAlias><httpMethod>GET</httpMethod><expression>a!httpResponse(body: 1)</expression></webApi></webApiHaul>"#;
        let root = XmlElement::parse_document(xml).expect("parse");
        let doc = Document {
            path: "webApi/w-1.xml",
            raw: xml,
            root: &root,
        };
        let Some(AppObject::Simple(api)) = SimpleParser::new(WEB_API).parse(&doc) else {
            panic!("expected web api");
        };
        assert_eq!(api.business_logic, "a!httpResponse(body: 1)");
        assert_eq!(api.attributes.len(), 2);
    }
}
