//! Lightweight element tree over package documents.
//!
//! Package documents mix several namespaces (`a:uuid`, `xsi:type`, ...) and the
//! object parsers only care about local names, so the tree built here strips
//! prefixes from element and attribute names and drops namespace
//! declarations. Text and CDATA content is concatenated per element.
//!
//! Element nesting is capped while reading, so every tree handed to the
//! rest of the crate has bounded depth.

use super::traits::ParseError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Default maximum element nesting accepted by [`XmlElement::parse_document`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// An element of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Local (prefix-free) element name
    pub name: String,
    /// Attributes in document order, keyed by local name
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
    /// Concatenated direct text content (untrimmed)
    pub text: String,
}

impl XmlElement {
    /// Create an element with the given local name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a document into its root element.
    pub fn parse_document(content: &str) -> Result<Self, ParseError> {
        Self::parse_document_with_depth(content, DEFAULT_MAX_DEPTH)
    }

    /// Parse a document, failing once elements nest deeper than `max_depth`.
    pub fn parse_document_with_depth(content: &str, max_depth: usize) -> Result<Self, ParseError> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    if stack.len() >= max_depth {
                        return Err(ParseError::TooDeep(max_depth));
                    }
                    stack.push(Self::from_start(e));
                }
                Ok(Event::Empty(ref e)) => {
                    if stack.len() >= max_depth {
                        return Err(ParseError::TooDeep(max_depth));
                    }
                    let element = Self::from_start(e);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => {
                            root.get_or_insert(element);
                        }
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(current) = stack.last_mut() {
                        match e.unescape() {
                            Ok(text) => current.text.push_str(&text),
                            // Unknown entities (&nbsp; etc.) keep their raw form
                            Err(_) => current.text.push_str(&String::from_utf8_lossy(e)),
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::End(_)) => {
                    let Some(finished) = stack.pop() else {
                        return Err(ParseError::XmlError(
                            "closing tag without matching opening tag".to_string(),
                        ));
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(finished),
                        None => {
                            root.get_or_insert(finished);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ParseError::XmlError(format!(
                        "error at position {}: {e}",
                        reader.buffer_position()
                    )));
                }
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(ParseError::XmlError(format!(
                "unexpected end of document inside <{}>",
                stack.last().map(|e| e.name.as_str()).unwrap_or_default()
            )));
        }

        root.ok_or_else(|| ParseError::XmlError("document has no root element".to_string()))
    }

    fn from_start(e: &BytesStart<'_>) -> Self {
        let mut element = Self::new(local_name(e.name().as_ref()));
        for attr in e.attributes().filter_map(std::result::Result::ok) {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let value = attr
                .unescape_value()
                .map(|v| v.to_string())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string());
            element.attributes.push((local_name(key.as_bytes()), value));
        }
        element
    }

    /// Attribute value by local name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given local name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First direct child matching any of the given names, in priority order.
    #[must_use]
    pub fn child_any(&self, names: &[&str]) -> Option<&XmlElement> {
        names.iter().find_map(|n| self.child(n))
    }

    /// All direct children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a path of direct-child names (`"meta/uuid"`).
    #[must_use]
    pub fn path(&self, path: &str) -> Option<&XmlElement> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self, |current, step| current.child(step))
    }

    /// Trimmed text of this element, `None` when blank.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Trimmed text of a direct child.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(XmlElement::text)
    }

    /// Trimmed text of the first matching direct child among `names`.
    #[must_use]
    pub fn child_text_any(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|n| self.child_text(n))
    }

    /// Pre-order iterator over this element and all of its descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First descendant (excluding self) with the given local name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().skip(1).find(|e| e.name == name)
    }

    /// All descendants (excluding self) with the given local name.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.descendants().skip(1).filter(move |e| e.name == name)
    }

    /// First descendant with the given name, not descending into `skip` subtrees.
    #[must_use]
    pub fn find_outside(&self, name: &str, skip: &str) -> Option<&XmlElement> {
        let mut stack: Vec<&XmlElement> = self.children.iter().rev().collect();
        while let Some(current) = stack.pop() {
            if current.name == skip {
                continue;
            }
            if current.name == name {
                return Some(current);
            }
            stack.extend(current.children.iter().rev());
        }
        None
    }

    /// Whether any descendant (excluding self) has the given local name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// All text and attribute values of this subtree, space separated.
    ///
    /// Used for reference scanning where markup structure does not matter.
    #[must_use]
    pub fn deep_text(&self) -> String {
        let mut out = String::new();
        for element in self.descendants() {
            for (_, value) in &element.attributes {
                out.push_str(value);
                out.push(' ');
            }
            if let Some(text) = element.text() {
                out.push_str(text);
                out.push(' ');
            }
        }
        out
    }
}

/// Pre-order traversal over an element subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}

/// Extract local name from qualified XML name (strips namespace prefix)
pub fn local_name(name: &[u8]) -> String {
    let name_str = String::from_utf8_lossy(name);
    name_str
        .rfind(':')
        .map_or_else(|| name_str.to_string(), |idx| name_str[idx + 1..].to_string())
}
