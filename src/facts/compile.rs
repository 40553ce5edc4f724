//! Fact Compilation
//!
//! Turns resolved edges into `controlFlow` facts and pulls protocol tags
//! out of edge labels.

use std::sync::LazyLock;

use regex::Regex;

use super::{Atom, Fact};
use crate::model::Edge;

static BRACKET_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]").unwrap());

/// One `controlFlow` fact per edge, in edge order.
///
/// Endpoints prefer the resolved node name and fall back to the raw
/// endpoint uid, then to `unknown_src` / `unknown_tgt`. The label is the
/// whole edge name (not just its tag), falling back to the edge uid, then
/// to `edge`.
pub fn edges_to_control_flow_facts(edges: &[Edge]) -> Vec<Fact> {
    edges
        .iter()
        .map(|e| Fact::ControlFlow {
            source: Atom::new(first_present(&e.source_name, &e.source_uid), "unknown_src"),
            target: Atom::new(first_present(&e.target_name, &e.target_uid), "unknown_tgt"),
            label: Atom::new(e.name.as_deref().or(Some(e.uid.as_str())), "edge"),
        })
        .collect()
}

/// First of two optional strings that is present and non-empty
fn first_present<'a>(preferred: &'a Option<String>, fallback: &'a Option<String>) -> Option<&'a str> {
    preferred
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(fallback.as_deref())
}

/// Store the first `[...]` tag of each named edge on the edge and return
/// all tags in edge order (duplicates kept)
pub fn extract_protocols(edges: &mut [Edge]) -> Vec<String> {
    let mut protocols = Vec::new();

    for edge in edges.iter_mut() {
        let Some(name) = edge.name.as_deref() else {
            continue;
        };
        if let Some(tag) = BRACKET_TAG.captures(name).and_then(|c| c.get(1)) {
            let tag = tag.as_str().to_string();
            edge.protocol = Some(tag.clone());
            protocols.push(tag);
        }
    }

    protocols
}
