//! Document Adapter
//!
//! Parses XML into an owned element tree with namespaces stripped from
//! element and attribute names. Everything downstream matches on local
//! names only, so `xmi:type`, `xsi:type` and a bare `type` all read as
//! `type`, and `diagram:DSemanticDiagram` reads as `DSemanticDiagram`.
//!
//! Attribute values are left untouched: a value such as
//! `diagram:DNodeContainer` keeps its prefix.

use std::fs;
use std::path::Path;

use crate::error::{ExtractError, Result};

/// A single attribute, keyed by local name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An element with its namespace-free name, attributes in source order,
/// leading text and element children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    text: Option<String>,
    children: Vec<Element>,
}

/// A parsed document
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse a document from a string
    pub fn parse(text: &str) -> std::result::Result<Self, roxmltree::Error> {
        let doc = roxmltree::Document::parse(text)?;
        Ok(Self {
            root: Element::from_node(doc.root_element()),
        })
    }

    /// Read and parse a document from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ExtractError::ProjectFileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path)?;
        Self::parse(&text).map_err(|source| ExtractError::Xml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The document element
    pub fn root(&self) -> &Element {
        &self.root
    }
}

impl Element {
    /// Create an element by hand (used by tests and fixtures)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: append an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Builder: set leading text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: append a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|a| Attribute {
                name: a.name().to_string(),
                value: a.value().to_string(),
            })
            .collect();

        let children = node
            .children()
            .filter(|c| c.is_element())
            .map(Element::from_node)
            .collect();

        Self {
            name: node.tag_name().name().to_string(),
            attributes,
            text: node.text().map(str::to_string),
            children,
        }
    }

    /// Local name of the element
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in source order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Value of the first attribute with this local name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Text before the first child element, if any
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Direct element children
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// All descendants (excluding self) in document order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Descendants with the given local name, in document order
    pub fn descendants_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |e| e.name == name)
    }

    /// First descendant with the given local name
    pub fn find_descendant(&self, name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.name == name)
    }
}

/// Pre-order iterator over an element's descendants
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}
