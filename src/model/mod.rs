//! Session Model
//!
//! In-memory view of a Sirius/Capella representation file:
//!
//! ```text
//! DAnalysis
//! ├── semanticResources*
//! └── ownedViews*                       (DView)
//!     ├── viewpoint @href
//!     └── ownedRepresentationDescriptors*   (name, repPath)
//!                         │
//!                         ▼  repPath "#_uid"
//! DSemanticDiagram @uid
//! └── ownedDiagramElements*  (DNodeContainer | DEdge | ...)
//! ```
//!
//! Optional attributes are modelled as `Option` at construction time; the
//! documented fallbacks are applied once, in the constructors in
//! [`reader`] and [`extract`].

pub mod reader;
pub mod locate;
pub mod extract;

pub use reader::parse_analysis;
pub use locate::{find_diagram, locate_semantic_diagram, strip_ref_marker};
pub use extract::{classify, extract_structure, resolve_edges, DiagramElementKind};

use serde::Serialize;

/// Root of a representation file
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    pub uid: Option<String>,
    /// Non-empty `semanticResources` entries, in document order
    pub semantic_resources: Vec<String>,
    pub views: Vec<View>,
}

/// A viewpoint activation holding representation descriptors
#[derive(Debug, Clone, Default, Serialize)]
pub struct View {
    pub uid: Option<String>,
    /// `href` of the view's viewpoint reference
    pub viewpoint: Option<String>,
    pub descriptors: Vec<RepresentationDescriptor>,
}

/// Named pointer from a view to a representation in the same file
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepresentationDescriptor {
    pub uid: Option<String>,
    /// Lookup key for diagram selection (empty when absent)
    pub name: String,
    /// Reference into the representation document, usually `#<uid>` (empty when absent)
    pub ref_path: String,
}

/// The drawn content of one representation
#[derive(Debug, Clone, Default, Serialize)]
pub struct SemanticDiagram {
    pub uid: Option<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// A node container in a diagram
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Node {
    pub uid: String,
    /// Display name; empty when absent
    pub name: String,
    /// UIDs of outgoing edges (the whitespace-separated IDREF list of `outgoingEdges`)
    pub outgoing_edges: Vec<String>,
}

/// A connection between two diagram elements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub uid: String,
    /// Trimmed display name; `None` when absent or blank
    pub name: Option<String>,
    pub source_uid: Option<String>,
    pub target_uid: Option<String>,
    /// Set by [`resolve_edges`] when the source is a known node
    pub source_name: Option<String>,
    /// Set by [`resolve_edges`] when the target is a known node
    pub target_name: Option<String>,
    /// Bracket tag set by [`crate::facts::extract_protocols`]
    pub protocol: Option<String>,
}

impl Node {
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            outgoing_edges: Vec::new(),
        }
    }
}

impl Edge {
    /// An unresolved edge. Blank names are normalized to `None`.
    pub fn new(
        uid: impl Into<String>,
        name: Option<&str>,
        source_uid: Option<&str>,
        target_uid: Option<&str>,
    ) -> Self {
        Self {
            uid: uid.into(),
            name: name.map(str::trim).filter(|n| !n.is_empty()).map(String::from),
            source_uid: source_uid.map(String::from),
            target_uid: target_uid.map(String::from),
            source_name: None,
            target_name: None,
            protocol: None,
        }
    }
}

impl Analysis {
    /// All descriptors across views, in document order
    pub fn descriptors(&self) -> impl Iterator<Item = &RepresentationDescriptor> {
        self.views.iter().flat_map(|v| v.descriptors.iter())
    }
}
