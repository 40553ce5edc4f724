//! Model Reader
//!
//! Builds an [`Analysis`] from the `DAnalysis` element of a representation
//! file. Missing attributes never fail: descriptors may come back with an
//! empty name or reference path and callers must cope.

use tracing::debug;

use super::{Analysis, RepresentationDescriptor, View};
use crate::xml::Element;

/// Parse a `DAnalysis` element
pub fn parse_analysis(root: &Element) -> Analysis {
    let semantic_resources = root
        .descendants_named("semanticResources")
        .filter_map(Element::text)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();

    let views: Vec<View> = root.descendants_named("ownedViews").map(parse_view).collect();

    debug!(
        views = views.len(),
        descriptors = views.iter().map(|v| v.descriptors.len()).sum::<usize>(),
        "parsed analysis"
    );

    Analysis {
        uid: root.attr("uid").map(String::from),
        semantic_resources,
        views,
    }
}

fn parse_view(view: &Element) -> View {
    let viewpoint = view
        .find_descendant("viewpoint")
        .and_then(|vp| vp.attr("href"))
        .map(String::from);

    let descriptors = view
        .descendants_named("ownedRepresentationDescriptors")
        .map(|d| RepresentationDescriptor {
            uid: d.attr("uid").map(String::from),
            name: d.attr("name").unwrap_or_default().to_string(),
            ref_path: d.attr("repPath").unwrap_or_default().to_string(),
        })
        .collect();

    View {
        uid: view.attr("uid").map(String::from),
        viewpoint,
        descriptors,
    }
}
