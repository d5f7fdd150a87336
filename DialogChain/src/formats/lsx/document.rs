//! LSX document structures
//!
//! The tree keeps `node` elements only: the `<children>` wrapper element is
//! implied by [`LsxNode::children`] and is not represented on its own.

use serde::{Deserialize, Serialize};

/// An LSX (Larian Save XML) document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsxDocument {
    /// Optional `<version>` header. Dialog saves produced by the editor omit it.
    pub version: Option<LsxVersion>,
    /// Document regions containing the data.
    pub regions: Vec<LsxRegion>,
}

/// The `<version>` element of an LSX document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsxVersion {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
    pub build: u32,
}

/// A region in an LSX document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsxRegion {
    /// Region identifier.
    pub id: String,
    /// Root nodes in this region.
    pub nodes: Vec<LsxNode>,
}

/// A node in an LSX document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsxNode {
    /// Node identifier/type.
    pub id: String,
    /// Optional key for this node.
    pub key: Option<String>,
    /// Attributes on this node.
    pub attributes: Vec<LsxAttribute>,
    /// Child nodes.
    pub children: Vec<LsxNode>,
}

/// An attribute on an LSX node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsxAttribute {
    /// Attribute identifier/name.
    pub id: String,
    /// Type name (e.g., "`FixedString`", "`int32`").
    pub type_name: String,
    /// String representation of the value.
    pub value: String,
    /// Localization handle for translated strings.
    pub handle: Option<String>,
    /// Version number for translated strings.
    pub version: Option<u16>,
}

impl LsxDocument {
    /// Creates an empty document without a version header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a region by id.
    #[must_use]
    pub fn region(&self, id: &str) -> Option<&LsxRegion> {
        self.regions.iter().find(|r| r.id == id)
    }
}

impl LsxRegion {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        LsxRegion {
            id: id.into(),
            nodes: Vec::new(),
        }
    }

    /// First root node with the given id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&LsxNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

impl LsxNode {
    /// Creates a new LSX node with the given ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        LsxNode {
            id: id.into(),
            key: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a new LSX node with the given ID and key.
    #[must_use]
    pub fn with_key(id: impl Into<String>, key: impl Into<String>) -> Self {
        LsxNode {
            key: Some(key.into()),
            ..LsxNode::new(id)
        }
    }

    /// Append a plain `id`/`type`/`value` attribute.
    pub fn push_attribute(
        &mut self,
        id: impl Into<String>,
        type_name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.attributes
            .push(LsxAttribute::new(id.into(), type_name.into(), value.into()));
    }

    /// Append a child node and return a mutable reference to it.
    pub fn push_child(&mut self, child: LsxNode) -> &mut LsxNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// First attribute with the given id.
    #[must_use]
    pub fn attribute(&self, id: &str) -> Option<&LsxAttribute> {
        self.attributes.iter().find(|a| a.id == id)
    }

    /// First direct child with the given id.
    #[must_use]
    pub fn child(&self, id: &str) -> Option<&LsxNode> {
        self.children.iter().find(|c| c.id == id)
    }

    /// All direct children with the given id, in document order.
    pub fn children_with_id<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a LsxNode> {
        self.children.iter().filter(move |c| c.id == id)
    }

    /// First descendant (excluding `self`) with the given id, depth-first.
    #[must_use]
    pub fn find_descendant(&self, id: &str) -> Option<&LsxNode> {
        for child in &self.children {
            if child.id == id {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(id) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants (excluding `self`) with the given id, in document order.
    #[must_use]
    pub fn descendants_with_id(&self, id: &str) -> Vec<&LsxNode> {
        let mut found = Vec::new();
        collect_descendants(self, id, &mut found);
        found
    }
}

fn collect_descendants<'a>(node: &'a LsxNode, id: &str, found: &mut Vec<&'a LsxNode>) {
    for child in &node.children {
        if child.id == id {
            found.push(child);
        }
        collect_descendants(child, id, found);
    }
}

impl LsxAttribute {
    /// Creates a new LSX attribute with the given ID, type, and value.
    #[must_use]
    pub fn new(id: String, type_name: String, value: String) -> Self {
        LsxAttribute {
            id,
            type_name,
            value,
            handle: None,
            version: None,
        }
    }

    /// Creates a `TranslatedString` attribute carrying a handle and version.
    #[must_use]
    pub fn translated(id: impl Into<String>, handle: impl Into<String>, version: u16) -> Self {
        LsxAttribute {
            id: id.into(),
            type_name: "TranslatedString".to_string(),
            value: String::new(),
            handle: Some(handle.into()),
            version: Some(version),
        }
    }
}
