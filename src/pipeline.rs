//! Extraction Pipeline
//!
//! ```text
//! .aird ─► parse_analysis ─► find_diagram ─► locate_semantic_diagram
//!                                                   │
//!        extract_structure ◄────────────────────────┘
//!               │
//!        resolve_edges ─► controlFlow facts ─► extract_protocols
//!                                                   │
//!        KnowledgeEnricher ◄────────────────────────┘
//!               │
//!        write_facts (interactions.pl)
//! ```
//!
//! Fatal problems (unreadable documents, missing plugins) stop the run
//! before the fact file is touched. Everything after loading is total.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ExtractConfig;
use crate::error::Result;
use crate::facts::{
    edges_to_control_flow_facts, extract_protocols, write_facts, Fact, FactKind,
    KnowledgeEnricher, SqliteConnector, StoreConnector,
};
use crate::model::{
    extract_structure, find_diagram, locate_semantic_diagram, parse_analysis, resolve_edges,
    Analysis, SemanticDiagram,
};
use crate::project::{check_required_plugins, Project};
use crate::xml::Element;

/// Result of the document-only part of the pipeline
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    pub analysis: Analysis,
    /// The located diagram with resolved, tagged edges
    pub diagram: Option<SemanticDiagram>,
    pub control_flow: Vec<Fact>,
    /// Bracket tags in edge order, duplicates kept
    pub protocols: Vec<String>,
}

/// Extract control-flow facts for `diagram_name`.
///
/// `analysis_root` is the `DAnalysis` element, `document_root` the
/// element whose direct children include the semantic diagrams. A diagram
/// that cannot be found yields an extraction with no facts.
pub fn extract_control_structure(
    analysis_root: &Element,
    document_root: &Element,
    diagram_name: &str,
) -> Extraction {
    let analysis = parse_analysis(analysis_root);

    let Some(reference) = find_diagram(&analysis, diagram_name) else {
        warn!(diagram = diagram_name, "no representation descriptor with this name");
        return Extraction {
            analysis,
            ..Extraction::default()
        };
    };

    let Some(element) = locate_semantic_diagram(document_root, reference) else {
        warn!(diagram = diagram_name, reference, "representation not found in document");
        return Extraction {
            analysis,
            ..Extraction::default()
        };
    };

    let mut diagram = extract_structure(element);
    resolve_edges(&diagram.nodes, &mut diagram.edges);
    let control_flow = edges_to_control_flow_facts(&diagram.edges);
    let protocols = extract_protocols(&mut diagram.edges);

    info!(
        nodes = diagram.nodes.len(),
        edges = diagram.edges.len(),
        protocols = protocols.len(),
        "extracted control structure"
    );

    Extraction {
        analysis,
        diagram: Some(diagram),
        control_flow,
        protocols,
    }
}

/// What a run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output: PathBuf,
    pub diagram: String,
    pub diagram_found: bool,
    pub protocols: Vec<String>,
    pub control_flow: usize,
    pub physical_layer: usize,
    pub weakness_physical_layer: usize,
    pub attack_goal: usize,
}

impl RunSummary {
    fn new(config: &ExtractConfig, extraction: &Extraction, facts: &[Fact]) -> Self {
        let count = |kind: FactKind| facts.iter().filter(|f| f.kind() == kind).count();
        Self {
            output: config.project.output.clone(),
            diagram: config.project.diagram.clone(),
            diagram_found: extraction.diagram.is_some(),
            protocols: extraction.protocols.clone(),
            control_flow: count(FactKind::ControlFlow),
            physical_layer: count(FactKind::PhysicalLayer),
            weakness_physical_layer: count(FactKind::WeaknessPhysicalLayer),
            attack_goal: count(FactKind::AttackGoal),
        }
    }

    /// Total facts written
    pub fn total(&self) -> usize {
        self.control_flow + self.physical_layer + self.weakness_physical_layer + self.attack_goal
    }
}

/// A configured extraction run
pub struct Pipeline {
    config: ExtractConfig,
    enricher: Option<KnowledgeEnricher>,
}

impl Pipeline {
    /// Wire the pipeline from configuration. Enrichment uses the SQLite
    /// database from `[database]`, if any.
    pub fn new(config: ExtractConfig) -> Self {
        let enricher = SqliteConnector::from_config(&config.database)
            .map(|c| KnowledgeEnricher::new(Box::new(c)));
        Self { config, enricher }
    }

    /// Use a different knowledge store
    pub fn with_connector(mut self, connector: Box<dyn StoreConnector>) -> Self {
        self.enricher = Some(KnowledgeEnricher::new(connector));
        self
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Load, check, extract, enrich and write
    pub fn run(&self) -> Result<RunSummary> {
        let project = Project::load(&self.config.project.dir)?;

        if self.config.plugins.check {
            check_required_plugins(project.afm.root(), &self.config.plugins.required)?;
        }

        let extraction = extract_control_structure(
            project.analysis_root(),
            project.aird.root(),
            &self.config.project.diagram,
        );

        let mut facts = extraction.control_flow.clone();
        match &self.enricher {
            Some(enricher) => facts.extend(enricher.facts_from_store(&extraction.protocols)),
            None => info!("no knowledge store configured, skipping enrichment"),
        }

        write_facts(&self.config.project.output, &facts)?;

        let summary = RunSummary::new(&self.config, &extraction, &facts);
        info!(
            output = %summary.output.display(),
            facts = summary.total(),
            "wrote fact file"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Document;

    const AIRD: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmi:version="2.0" xmlns:xmi="http://www.omg.org/XMI" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:diagram="http://www.eclipse.org/sirius/diagram/1.1.0" xmlns:viewpoint="http://www.eclipse.org/sirius/1.1.0">
  <viewpoint:DAnalysis uid="_a">
    <ownedViews uid="_v">
      <ownedRepresentationDescriptors uid="_r" name="HCS" repPath="#_d"/>
    </ownedViews>
  </viewpoint:DAnalysis>
  <diagram:DSemanticDiagram uid="_d">
    <ownedDiagramElements xsi:type="diagram:DNodeContainer" uid="n1" name="Sensor" outgoingEdges="e1"/>
    <ownedDiagramElements xsi:type="diagram:DNodeContainer" uid="n2" name="Controller"/>
    <ownedDiagramElements xsi:type="diagram:DEdge" uid="e1" name="[CAN] cmd" sourceNode="n1" targetNode="n2"/>
  </diagram:DSemanticDiagram>
</xmi:XMI>"##;

    #[test]
    fn test_end_to_end_extraction() {
        let doc = Document::parse(AIRD).unwrap();
        let root = doc.root();
        let extraction = extract_control_structure(&root.children()[0], root, "HCS");

        let facts: Vec<String> = extraction.control_flow.iter().map(Fact::to_string).collect();
        assert_eq!(facts, vec!["controlFlow(sensor, controller, can_cmd)."]);
        assert_eq!(extraction.protocols, vec!["CAN"]);

        let diagram = extraction.diagram.unwrap();
        assert_eq!(diagram.edges[0].protocol.as_deref(), Some("CAN"));
        assert_eq!(diagram.edges[0].source_name.as_deref(), Some("Sensor"));
    }

    #[test]
    fn test_unknown_diagram_is_empty() {
        let doc = Document::parse(AIRD).unwrap();
        let root = doc.root();
        let extraction = extract_control_structure(&root.children()[0], root, "Missing");

        assert!(extraction.diagram.is_none());
        assert!(extraction.control_flow.is_empty());
        assert!(extraction.protocols.is_empty());
        assert_eq!(extraction.analysis.views.len(), 1);
    }

    #[test]
    fn test_dangling_reference_is_empty() {
        let analysis = Element::new("DAnalysis").with_child(
            Element::new("ownedViews").with_child(
                Element::new("ownedRepresentationDescriptors")
                    .with_attr("name", "HCS")
                    .with_attr("repPath", "#_gone"),
            ),
        );
        let root = Element::new("XMI").with_child(analysis.clone());

        let extraction = extract_control_structure(&analysis, &root, "HCS");
        assert!(extraction.diagram.is_none());
        assert!(extraction.control_flow.is_empty());
    }
}
