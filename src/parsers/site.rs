//! Site parser.

use super::common::{build_core, localized_text, object_name, object_uuid};
use super::markup::XmlElement;
use super::traits::{Document, ObjectParser, path_in_dir};
use crate::model::{AppObject, ObjectType, SiteObject, SitePage};

/// Parser for `siteHaul` documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct SiteParser;

impl SiteParser {
    fn parse_page(page: &XmlElement) -> SitePage {
        let name = page
            .child_any(&["staticName", "name"])
            .and_then(localized_text)
            .or_else(|| page.attr("name").map(str::to_string))
            .unwrap_or_default();

        let ui_objects = page
            .find_all("uiObject")
            .filter_map(|ui| object_uuid(ui).or_else(|| ui.text().map(str::to_string)))
            .collect();

        SitePage {
            uuid: object_uuid(page).unwrap_or_default(),
            name,
            visibility: page
                .child_text_any(&["visibilityExpr", "visibility"])
                .unwrap_or_default()
                .to_string(),
            ui_objects,
            ui_object_names: Vec::new(),
        }
    }
}

impl ObjectParser for SiteParser {
    fn name(&self) -> &'static str {
        "site"
    }

    fn can_handle(&self, path: &str) -> bool {
        path_in_dir(path, "site")
    }

    fn parse(&self, document: &Document<'_>) -> Option<AppObject> {
        let root = document.root;
        if root.name != "siteHaul" {
            return None;
        }
        let site = root.child("site")?;
        let uuid = object_uuid(site)?;
        let name = object_name(site, &["name"])?;

        let pages = site
            .child("pages")
            .map(|pages| pages.children_named("page").map(Self::parse_page).collect())
            .unwrap_or_else(|| site.children_named("page").map(Self::parse_page).collect());

        Some(AppObject::Site(SiteObject {
            core: build_core(document, site, uuid, name, ObjectType::Site),
            pages,
        }))
    }
}
