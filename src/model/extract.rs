//! Structural Extraction
//!
//! Recovers nodes and edges from a `DSemanticDiagram` element, then
//! rewrites edge endpoints into node names.
//!
//! ## Classification
//!
//! Diagram elements carry their concrete type in an attribute whose name
//! ends in `type` (normally `xsi:type`, which the document adapter has
//! already reduced to `type`). The classifier takes the FIRST such
//! attribute in source order; later ones are ignored even if they would
//! classify differently.

use std::collections::HashMap;

use tracing::debug;

use super::{Edge, Node, SemanticDiagram};
use crate::xml::Element;

const NODE_CONTAINER_TYPE: &str = "diagram:DNodeContainer";
const EDGE_TYPE: &str = "diagram:DEdge";

/// Concrete kind of an `ownedDiagramElements` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramElementKind {
    /// `diagram:DNodeContainer`
    NodeContainer,
    /// `diagram:DEdge`
    Edge,
    /// Any other declared type (skipped)
    Other(String),
    /// No `*type` attribute at all (skipped)
    Untyped,
}

/// Classify a diagram element by its first `*type` attribute
pub fn classify(element: &Element) -> DiagramElementKind {
    let declared = element
        .attributes()
        .iter()
        .find(|a| a.name.ends_with("type"))
        .map(|a| a.value.as_str());

    match declared {
        Some(NODE_CONTAINER_TYPE) => DiagramElementKind::NodeContainer,
        Some(EDGE_TYPE) => DiagramElementKind::Edge,
        Some(other) => DiagramElementKind::Other(other.to_string()),
        None => DiagramElementKind::Untyped,
    }
}

/// Walk every `ownedDiagramElements` descendant and collect nodes and edges
/// in document order
pub fn extract_structure(diagram: &Element) -> SemanticDiagram {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for element in diagram.descendants_named("ownedDiagramElements") {
        match classify(element) {
            DiagramElementKind::NodeContainer => nodes.push(node_from(element)),
            DiagramElementKind::Edge => edges.push(edge_from(element)),
            kind => {
                debug!(uid = element.attr("uid"), ?kind, "skipping diagram element");
            }
        }
    }

    SemanticDiagram {
        uid: diagram.attr("uid").map(String::from),
        nodes,
        edges,
    }
}

fn node_from(element: &Element) -> Node {
    Node {
        uid: element.attr("uid").unwrap_or_default().to_string(),
        name: element.attr("name").unwrap_or_default().to_string(),
        outgoing_edges: element
            .attr("outgoingEdges")
            .unwrap_or_default()
            .split_whitespace()
            .map(String::from)
            .collect(),
    }
}

fn edge_from(element: &Element) -> Edge {
    Edge::new(
        element.attr("uid").unwrap_or_default(),
        element.attr("name"),
        element.attr("sourceNode"),
        element.attr("targetNode"),
    )
}

/// Fill in `source_name` / `target_name` for every edge whose endpoint is
/// one of `nodes`. Unknown endpoints are left unresolved.
pub fn resolve_edges(nodes: &[Node], edges: &mut [Edge]) {
    let names: HashMap<&str, &str> = nodes
        .iter()
        .map(|n| (n.uid.as_str(), n.name.as_str()))
        .collect();

    for edge in edges.iter_mut() {
        if let Some(name) = edge.source_uid.as_deref().and_then(|uid| names.get(uid)) {
            edge.source_name = Some(name.to_string());
        }
        if let Some(name) = edge.target_uid.as_deref().and_then(|uid| names.get(uid)) {
            edge.target_name = Some(name.to_string());
        }
        if edge.source_name.is_none() || edge.target_name.is_none() {
            debug!(edge = %edge.uid, "edge endpoint outside extracted nodes");
        }
    }
}
