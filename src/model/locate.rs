//! Diagram Locator
//!
//! Two lookups: descriptor name -> reference path within the [`Analysis`],
//! then reference path -> `DSemanticDiagram` element within the
//! representation document.

use super::Analysis;
use crate::xml::Element;

/// Marker prefixing same-document references
const REF_MARKER: char = '#';

/// Reference path of the first descriptor named exactly `name`, in document order
pub fn find_diagram<'a>(analysis: &'a Analysis, name: &str) -> Option<&'a str> {
    analysis
        .descriptors()
        .find(|d| d.name == name)
        .map(|d| d.ref_path.as_str())
}

/// Drop a single leading `#` from a reference
pub fn strip_ref_marker(reference: &str) -> &str {
    reference.strip_prefix(REF_MARKER).unwrap_or(reference)
}

/// Find the semantic diagram a reference points at.
///
/// Only direct children of `root` are searched. The tag test is a
/// substring match on `DSemanticDiagram` so that any prefix form is accepted.
pub fn locate_semantic_diagram<'a>(root: &'a Element, reference: &str) -> Option<&'a Element> {
    let target = strip_ref_marker(reference);

    root.children()
        .iter()
        .filter(|child| child.name().contains("DSemanticDiagram"))
        .find(|child| child.attr("uid") == Some(target))
}
