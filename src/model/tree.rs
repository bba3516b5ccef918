//! Generic document tree kept on every object for fallback rendering.

use crate::parsers::XmlElement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generic attribute/text/children tree mirroring a source document.
///
/// Children sharing a tag are grouped under one key at build time, so a tag
/// that repeats becomes a [`TreeChild::Many`] list while a tag that occurs once
/// stays a single node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTree {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<(String, TreeChild)>,
}

/// One child slot of a [`RawTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeChild {
    One(Box<RawTree>),
    Many(Vec<RawTree>),
}

impl TreeChild {
    /// Number of nodes in this slot.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the nodes in this slot.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &RawTree> + '_> {
        match self {
            Self::One(node) => Box::new(std::iter::once(node.as_ref())),
            Self::Many(items) => Box::new(items.iter()),
        }
    }
}

/// An element whose children are still being converted.
struct Frame<'a> {
    element: &'a XmlElement,
    next_child: usize,
    children: Vec<(String, TreeChild)>,
}

impl<'a> Frame<'a> {
    fn new(element: &'a XmlElement) -> Self {
        Self {
            element,
            next_child: 0,
            children: Vec::new(),
        }
    }

    fn finish(self) -> RawTree {
        RawTree {
            attributes: self.element.attributes.iter().cloned().collect(),
            text: self.element.text().map(str::to_string),
            children: self.children,
        }
    }
}

fn group_child(children: &mut Vec<(String, TreeChild)>, name: &str, node: RawTree) {
    match children.iter_mut().find(|(existing, _)| existing == name) {
        Some((_, slot)) => match slot {
            TreeChild::One(existing) => {
                let first = std::mem::take(existing.as_mut());
                *slot = TreeChild::Many(vec![first, node]);
            }
            TreeChild::Many(items) => items.push(node),
        },
        None => children.push((name.to_string(), TreeChild::One(Box::new(node)))),
    }
}

impl RawTree {
    /// Build the tree from a parsed element.
    ///
    /// Uses an explicit work stack, so stack usage does not grow with
    /// document depth.
    #[must_use]
    pub fn from_element(element: &XmlElement) -> Self {
        let mut stack = vec![Frame::new(element)];
        while let Some(frame) = stack.last_mut() {
            let current = frame.element;
            if let Some(child) = current.children.get(frame.next_child) {
                frame.next_child += 1;
                stack.push(Frame::new(child));
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let element = done.element;
            let node = done.finish();
            match stack.last_mut() {
                Some(parent) => group_child(&mut parent.children, &element.name, node),
                None => return node,
            }
        }
        Self::default()
    }

    /// Child slot by tag name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TreeChild> {
        self.children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, child)| child)
    }

    /// Total number of nodes in the tree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter().flat_map(|(_, child)| child.iter()));
        }
        count
    }
}
