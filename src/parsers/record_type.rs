//! Record type parser.

use super::common::{build_core, object_name, object_uuid, security_roles};
use super::markup::XmlElement;
use super::traits::{Document, ObjectParser, path_in_dir};
use crate::model::{
    AppObject, ObjectType, RecordAction, RecordField, RecordRelationship, RecordTypeObject,
    RecordView,
};

/// Parser for `recordTypeHaul` documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordTypeParser;

fn text_of(element: &XmlElement, names: &[&str]) -> String {
    names
        .iter()
        .find_map(|n| element.attr(n).or_else(|| element.child_text(n)))
        .unwrap_or_default()
        .to_string()
}

fn parse_field(field: &XmlElement) -> RecordField {
    RecordField {
        uuid: object_uuid(field).unwrap_or_default(),
        name: text_of(field, &["fieldName", "name"]),
        field_type: text_of(field, &["type", "fieldType"]),
    }
}

fn parse_relationship(rel: &XmlElement) -> RecordRelationship {
    RecordRelationship {
        uuid: object_uuid(rel).unwrap_or_default(),
        name: text_of(rel, &["relationshipName", "name"]),
        target_record_uuid: text_of(rel, &["targetRecordTypeUuid", "targetRecordType"]),
        target_record_name: None,
        relationship_type: text_of(rel, &["relationshipType", "type"]),
    }
}

fn parse_action(action: &XmlElement) -> RecordAction {
    RecordAction {
        key: text_of(action, &["key", "uuid"]),
        title: text_of(action, &["title", "name"]),
        target_process_uuid: text_of(action, &["targetProcessModelUuid", "processModelUuid"]),
        target_process_name: None,
    }
}

fn parse_view(view: &XmlElement) -> RecordView {
    RecordView {
        name: text_of(view, &["name", "title"]),
        expression: text_of(view, &["uiExpr", "expression"]),
    }
}

impl ObjectParser for RecordTypeParser {
    fn name(&self) -> &'static str {
        "record type"
    }

    fn can_handle(&self, path: &str) -> bool {
        path_in_dir(path, "recordType")
    }

    fn parse(&self, document: &Document<'_>) -> Option<AppObject> {
        let root = document.root;
        if root.name != "recordTypeHaul" {
            return None;
        }
        let record = root.child("recordType")?;
        let uuid = object_uuid(record)?;
        let name = object_name(record, &["name", "pluralName"])?;

        Some(AppObject::RecordType(RecordTypeObject {
            core: build_core(document, record, uuid, name, ObjectType::RecordType),
            fields: record.find_all("field").map(parse_field).collect(),
            relationships: record.find_all("relationship").map(parse_relationship).collect(),
            actions: record.find_all("recordAction").map(parse_action).collect(),
            views: record.find_all("view").map(parse_view).collect(),
            security_roles: security_roles(root),
        }))
    }
}
