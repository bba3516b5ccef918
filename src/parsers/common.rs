//! Field extraction shared by all object parsers.

use super::history::extract_lineage;
use super::markup::XmlElement;
use super::traits::Document;
use crate::model::{ObjectCore, ObjectType, RawTree, SecurityRole};

/// Object uuid from a `uuid` attribute or child element.
pub(crate) fn object_uuid(element: &XmlElement) -> Option<String> {
    element
        .attr("uuid")
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .or_else(|| element.child_text("uuid"))
        .map(str::to_string)
}

/// Value of a localisable field.
///
/// Accepts plain text (`<name>X</name>`) as well as string maps
/// (`<name><string-map><pair><locale/><value>X</value></pair></string-map></name>`),
/// where the first non-empty value wins.
pub(crate) fn localized_text(element: &XmlElement) -> Option<String> {
    if element.children.is_empty() {
        return element.text().map(str::to_string);
    }
    element
        .find_all("value")
        .find_map(XmlElement::text)
        .or_else(|| element.text())
        .map(str::to_string)
}

/// Object name from a `name` attribute or a (possibly localised) child.
pub(crate) fn object_name(element: &XmlElement, tags: &[&str]) -> Option<String> {
    element
        .attr("name")
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .or_else(|| {
            tags.iter()
                .filter_map(|t| element.child(t))
                .find_map(localized_text)
        })
}

pub(crate) fn description(element: &XmlElement) -> String {
    ["description", "desc"]
        .iter()
        .filter_map(|t| element.child(t))
        .find_map(localized_text)
        .unwrap_or_default()
}

/// Current version id: the first `versionUuid` outside any history block.
pub(crate) fn version_id(scope: &XmlElement) -> Option<String> {
    scope
        .find_outside("versionUuid", "history")
        .and_then(XmlElement::text)
        .map(str::to_string)
        .or_else(|| {
            scope
                .attr("versionUuid")
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim().to_string())
        })
}

/// Security roles from a `roleMap` block.
pub(crate) fn security_roles(scope: &XmlElement) -> Vec<SecurityRole> {
    let Some(role_map) = scope.find("roleMap") else {
        return Vec::new();
    };

    role_map
        .children_named("role")
        .filter_map(|role| {
            let name = role
                .attr("name")
                .map(str::to_string)
                .or_else(|| role.child_text("name").map(str::to_string))?;
            let members = |tag: &str| -> Vec<String> {
                role.child(tag)
                    .map(|list| {
                        list.children
                            .iter()
                            .filter_map(XmlElement::text)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default()
            };
            Some(SecurityRole {
                name,
                users: members("users"),
                groups: members("groups"),
            })
        })
        .collect()
}

/// Build the shared core for an object found at `element` within `doc`.
///
/// Version information and the generic tree are taken from the whole
/// document so wrappers that carry them outside the object element still
/// contribute.
pub(crate) fn build_core(
    doc: &Document<'_>,
    element: &XmlElement,
    uuid: String,
    name: String,
    object_type: ObjectType,
) -> ObjectCore {
    let mut core = ObjectCore::new(uuid, name, object_type);
    core.description = description(element);
    core.raw_document = doc.raw.to_string();
    core.version_id = version_id(element).or_else(|| version_id(doc.root));
    core.version_lineage = {
        let lineage = extract_lineage(element);
        if lineage.is_empty() {
            extract_lineage(doc.root)
        } else {
            lineage
        }
    };
    core.raw_tree = RawTree::from_element(doc.root);
    core
}
