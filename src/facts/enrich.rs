//! Knowledge Enrichment
//!
//! Looks up physical-layer, weakness and attack-goal rows for the protocol
//! tags found on the diagram and turns them into facts.
//!
//! Enrichment never fails the run. Any store error is logged and the facts
//! compiled up to that point are returned as they are.

use std::path::PathBuf;
use std::time::Duration;

use rusqlite::{params_from_iter, Connection, OpenFlags};
use tracing::{info, warn};

use super::{Atom, Fact};
use crate::config::DatabaseConfig;
use crate::error::Result;

/// `(protocol, dest, source, layer)` joined from `physical_layer` and `protocols`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhysicalLayerRow {
    pub protocol: Option<String>,
    pub dest: Option<String>,
    pub source: Option<String>,
    pub layer: Option<String>,
}

/// `(vulnerability, protocol, zone)` from `weakness_physical_layer`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeaknessRow {
    pub vulnerability: Option<String>,
    pub protocol: Option<String>,
    pub zone: Option<String>,
}

/// `(goal_type, target)` from `attack_goals`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttackGoalRow {
    pub goal_type: Option<String>,
    pub target: Option<String>,
}

/// An open session against the knowledge store
pub trait KnowledgeStore {
    /// Rows for the given protocols, ordered by (protocol, dest, source)
    fn physical_layers(&mut self, protocols: &[String]) -> Result<Vec<PhysicalLayerRow>>;

    /// Rows for the given protocols, ordered by vulnerability
    fn weaknesses(&mut self, protocols: &[String]) -> Result<Vec<WeaknessRow>>;

    /// Every attack goal, ordered by row id
    fn attack_goals(&mut self) -> Result<Vec<AttackGoalRow>>;
}

/// Opens knowledge store sessions
pub trait StoreConnector {
    fn connect(&self) -> Result<Box<dyn KnowledgeStore>>;
}

/// Compiles enrichment facts from a store
pub struct KnowledgeEnricher {
    connector: Box<dyn StoreConnector>,
}

impl KnowledgeEnricher {
    pub fn new(connector: Box<dyn StoreConnector>) -> Self {
        Self { connector }
    }

    /// Physical-layer, weakness and attack-goal facts for `protocols`.
    ///
    /// Returns nothing without touching the store when `protocols` is empty.
    /// Attack goals are not filtered by protocol.
    pub fn facts_from_store(&self, protocols: &[String]) -> Vec<Fact> {
        let mut facts = Vec::new();

        if protocols.is_empty() {
            return facts;
        }

        if let Err(e) = self.compile_into(protocols, &mut facts) {
            warn!(error = %e, kept = facts.len(), "skipping knowledge store extraction");
        }

        facts
    }

    fn compile_into(&self, protocols: &[String], facts: &mut Vec<Fact>) -> Result<()> {
        // Session is dropped on every exit path from this scope
        let mut store = self.connector.connect()?;

        for row in store.physical_layers(protocols)? {
            facts.push(Fact::PhysicalLayer {
                protocol: Atom::from_value(row.protocol.as_deref()),
                dest: Atom::from_value(row.dest.as_deref()),
                source: Atom::from_value(row.source.as_deref()),
                layer: Atom::from_value(row.layer.as_deref()),
            });
        }

        for row in store.weaknesses(protocols)? {
            facts.push(Fact::WeaknessPhysicalLayer {
                vulnerability: Atom::from_value(row.vulnerability.as_deref()),
                protocol: Atom::from_value(row.protocol.as_deref()),
                zone: Atom::from_value(row.zone.as_deref()),
            });
        }

        for row in store.attack_goals()? {
            facts.push(Fact::AttackGoal {
                goal_type: Atom::from_value(row.goal_type.as_deref()),
                target: Atom::from_value(row.target.as_deref()),
            });
        }

        info!(facts = facts.len(), "compiled knowledge store facts");
        Ok(())
    }
}

// =============================================================================
// SQLite
// =============================================================================

/// Connects to a SQLite knowledge base, read-only
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: Duration::from_millis(5000),
        }
    }

    /// Build from the `[database]` section; `None` when no path is configured
    pub fn from_config(config: &DatabaseConfig) -> Option<Self> {
        config.path.as_ref().map(|path| Self {
            path: path.clone(),
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
        })
    }
}

impl StoreConnector for SqliteConnector {
    fn connect(&self) -> Result<Box<dyn KnowledgeStore>> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(Box::new(SqliteStore { conn }))
    }
}

struct SqliteStore {
    conn: Connection,
}

/// `?, ?, ?` for `n` parameters
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

impl KnowledgeStore for SqliteStore {
    fn physical_layers(&mut self, protocols: &[String]) -> Result<Vec<PhysicalLayerRow>> {
        let sql = format!(
            "SELECT p.protocol, pl.dest, pl.source, p.layer
             FROM physical_layer pl
             JOIN protocols p ON pl.protocol = p.protocol
             WHERE p.protocol IN ({})
             ORDER BY p.protocol, pl.dest, pl.source",
            placeholders(protocols.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(protocols.iter()), |row| {
                Ok(PhysicalLayerRow {
                    protocol: row.get(0)?,
                    dest: row.get(1)?,
                    source: row.get(2)?,
                    layer: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn weaknesses(&mut self, protocols: &[String]) -> Result<Vec<WeaknessRow>> {
        let sql = format!(
            "SELECT vulnerability, protocol, zone
             FROM weakness_physical_layer
             WHERE protocol IN ({})
             ORDER BY vulnerability",
            placeholders(protocols.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(protocols.iter()), |row| {
                Ok(WeaknessRow {
                    vulnerability: row.get(0)?,
                    protocol: row.get(1)?,
                    zone: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn attack_goals(&mut self) -> Result<Vec<AttackGoalRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT goal_type, target FROM attack_goals ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(AttackGoalRow {
                    goal_type: row.get(0)?,
                    target: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
