//! STPA Fact Extraction
//!
//! Reads the hierarchical control structure diagram out of a Capella
//! project and writes it, together with protocol knowledge, as a flat
//! logic-program fact base for a downstream reasoner.
//!
//! ## Pipeline
//!
//! - **Model Reader**: `.aird` `DAnalysis` -> views -> representation descriptors
//! - **Diagram Locator**: descriptor name -> `repPath` -> `DSemanticDiagram`
//! - **Structural Extractor**: `ownedDiagramElements` -> nodes and edges
//! - **Edge Resolver**: endpoint uids -> node names
//! - **Fact Compiler**: edges -> `controlFlow/3`, labels -> `[PROTOCOL]` tags
//! - **Knowledge Enricher**: tags -> `physicalLayer/4`, `weaknessPhysicalLayer/3`, `attackGoal/1`
//!
//! ## Project layout
//!
//! ```text
//! GCAP_NTP241_UNINA/
//! ├── GCAP_NTP241_UNINA.afm     (plugin registrations)
//! └── GCAP_NTP241_UNINA.aird    (representations)
//! ```

pub mod config;
pub mod error;
pub mod facts;
pub mod model;
pub mod pipeline;
pub mod project;
pub mod xml;

pub use config::ExtractConfig;
pub use error::{ExtractError, Result};
pub use facts::{to_atom, Atom, Fact, FactKind, KnowledgeEnricher, StoreConnector};
pub use model::{Analysis, Edge, Node, SemanticDiagram};
pub use pipeline::{extract_control_structure, Extraction, Pipeline, RunSummary};
pub use project::{check_required_plugins, Project, ProjectFiles};
pub use xml::{Document, Element};
