//! Logic-Program Facts
//!
//! Typed predicates emitted for the downstream reasoner. Every argument is
//! an [`Atom`], so rendering a [`Fact`] cannot produce unquoted model text.
//!
//! ```text
//! controlFlow(<src>, <tgt>, <label>).
//! physicalLayer(<protocol>, <dest>, <source>, <layer>).
//! weaknessPhysicalLayer(<vulnerability>, <protocol>, <zone>).
//! attackGoal(<goal_type>(<target>)).
//! ```

pub mod atom;
pub mod compile;
pub mod enrich;
pub mod writer;

pub use atom::{to_atom, Atom};
pub use compile::{edges_to_control_flow_facts, extract_protocols};
pub use enrich::{
    AttackGoalRow, KnowledgeEnricher, KnowledgeStore, PhysicalLayerRow, SqliteConnector,
    StoreConnector, WeaknessRow,
};
pub use writer::{render_facts, write_facts};

use std::fmt;

use serde::Serialize;

/// Which family a fact belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    ControlFlow,
    PhysicalLayer,
    WeaknessPhysicalLayer,
    AttackGoal,
}

/// One ground predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fact {
    ControlFlow {
        source: Atom,
        target: Atom,
        label: Atom,
    },
    PhysicalLayer {
        protocol: Atom,
        dest: Atom,
        source: Atom,
        layer: Atom,
    },
    WeaknessPhysicalLayer {
        vulnerability: Atom,
        protocol: Atom,
        zone: Atom,
    },
    AttackGoal {
        goal_type: Atom,
        target: Atom,
    },
}

impl Fact {
    pub fn kind(&self) -> FactKind {
        match self {
            Fact::ControlFlow { .. } => FactKind::ControlFlow,
            Fact::PhysicalLayer { .. } => FactKind::PhysicalLayer,
            Fact::WeaknessPhysicalLayer { .. } => FactKind::WeaknessPhysicalLayer,
            Fact::AttackGoal { .. } => FactKind::AttackGoal,
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fact::ControlFlow {
                source,
                target,
                label,
            } => write!(f, "controlFlow({source}, {target}, {label})."),
            Fact::PhysicalLayer {
                protocol,
                dest,
                source,
                layer,
            } => write!(f, "physicalLayer({protocol}, {dest}, {source}, {layer})."),
            Fact::WeaknessPhysicalLayer {
                vulnerability,
                protocol,
                zone,
            } => write!(f, "weaknessPhysicalLayer({vulnerability}, {protocol}, {zone})."),
            Fact::AttackGoal { goal_type, target } => {
                write!(f, "attackGoal({goal_type}({target})).")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(s: &str) -> Atom {
        Atom::new(Some(s), "x")
    }

    #[test]
    fn test_render_each_family() {
        let facts = [
            Fact::ControlFlow {
                source: atom("a"),
                target: atom("b"),
                label: atom("c"),
            },
            Fact::PhysicalLayer {
                protocol: atom("can"),
                dest: atom("ecu"),
                source: atom("gateway"),
                layer: atom("l2"),
            },
            Fact::WeaknessPhysicalLayer {
                vulnerability: atom("spoofing"),
                protocol: atom("can"),
                zone: atom("vehicle"),
            },
            Fact::AttackGoal {
                goal_type: atom("dos"),
                target: atom("brakes"),
            },
        ];

        let rendered: Vec<String> = facts.iter().map(Fact::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "controlFlow(a, b, c).",
                "physicalLayer(can, ecu, gateway, l2).",
                "weaknessPhysicalLayer(spoofing, can, vehicle).",
                "attackGoal(dos(brakes)).",
            ]
        );
        assert_eq!(facts[3].kind(), FactKind::AttackGoal);
    }
}
