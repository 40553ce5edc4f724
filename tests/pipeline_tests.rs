//! End-to-end Pipeline Tests
//!
//! Runs the full pipeline against the fixture projects under
//! `tests/fixtures/` and checks the written fact file.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use stpa_facts::facts::{KnowledgeStore, StoreConnector};
use stpa_facts::{ExtractConfig, ExtractError, Pipeline, Project};

const CONTROL_FLOW: [&str; 4] = [
    "controlFlow(remote_pilot, flight_controller, rc_flight_commands).",
    "controlFlow(flight_controller, esc, uart_throttle_setpoint).",
    "controlFlow(n_gps, flight_controller, can_position).",
    "controlFlow(imu, flight_controller, e_fb).",
];

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn config_for(project: &str, output: &Path) -> ExtractConfig {
    let mut config = ExtractConfig::default();
    config.project.dir = fixture(project);
    config.project.output = output.to_path_buf();
    config
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

/// Refuses every connection
struct Unreachable;

impl StoreConnector for Unreachable {
    fn connect(&self) -> stpa_facts::Result<Box<dyn KnowledgeStore>> {
        Err(ExtractError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )))
    }
}

fn knowledge_base(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE protocols (protocol TEXT PRIMARY KEY, layer TEXT);
         CREATE TABLE physical_layer (protocol TEXT, dest TEXT, source TEXT);
         CREATE TABLE weakness_physical_layer (vulnerability TEXT, protocol TEXT, zone TEXT);
         CREATE TABLE attack_goals (id INTEGER PRIMARY KEY, goal_type TEXT, target TEXT);

         INSERT INTO protocols VALUES ('UART', 'Physical'), ('CAN', 'Data Link'), ('I2C', 'Physical');
         INSERT INTO physical_layer VALUES
            ('UART', 'ESC', 'Flight Controller'),
            ('CAN', 'Flight Controller', 'GPS'),
            ('I2C', 'IMU', 'Flight Controller');
         INSERT INTO weakness_physical_layer VALUES
            ('Baud Rate Manipulation', 'UART', 'Airframe'),
            ('Arbitration Abuse', 'CAN', 'Airframe');
         INSERT INTO attack_goals (id, goal_type, target) VALUES (1, 'loss_of_control', 'Drone');",
    )
    .unwrap();
}

#[test]
fn test_control_flow_only_without_database() {
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("interactions.pl");

    let summary = Pipeline::new(config_for("Drone", &output)).run().unwrap();

    assert!(summary.diagram_found);
    assert_eq!(summary.protocols, vec!["RC", "UART", "CAN"]);
    assert_eq!(summary.control_flow, 4);
    assert_eq!(summary.total(), 4);
    assert_eq!(lines(&output), CONTROL_FLOW);
}

#[test]
fn test_enriched_fact_file_order() {
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("interactions.pl");
    let db = out.path().join("kb.db");
    knowledge_base(&db);

    let mut config = config_for("Drone", &output);
    config.database.path = Some(db);

    let summary = Pipeline::new(config).run().unwrap();
    assert_eq!(summary.physical_layer, 2);
    assert_eq!(summary.weakness_physical_layer, 2);
    assert_eq!(summary.attack_goal, 1);

    let mut expected: Vec<String> = CONTROL_FLOW.iter().map(|s| s.to_string()).collect();
    expected.extend(
        [
            "physicalLayer(can, flight_controller, gps, data_link).",
            "physicalLayer(uart, esc, flight_controller, physical).",
            "weaknessPhysicalLayer(arbitration_abuse, can, airframe).",
            "weaknessPhysicalLayer(baud_rate_manipulation, uart, airframe).",
            "attackGoal(loss_of_control(drone)).",
        ]
        .map(String::from),
    );
    assert_eq!(lines(&output), expected);
}

#[test]
fn test_database_failure_keeps_control_flow() {
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("interactions.pl");

    let summary = Pipeline::new(config_for("Drone", &output))
        .with_connector(Box::new(Unreachable))
        .run()
        .unwrap();

    assert_eq!(summary.total(), 4);
    assert_eq!(lines(&output), CONTROL_FLOW);
}

#[test]
fn test_missing_plugins_write_nothing() {
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("interactions.pl");

    let err = Pipeline::new(config_for("NoPlugins", &output)).run().unwrap_err();

    match err {
        ExtractError::MissingPlugins(missing) => assert_eq!(
            missing,
            vec![
                "com.thalesgroup.mde.capella.stpa".to_string(),
                "org.polarsys.capella.cybersecurity".to_string(),
            ]
        ),
        other => panic!("Expected MissingPlugins, got {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn test_plugin_check_can_be_disabled() {
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("interactions.pl");

    let mut config = config_for("NoPlugins", &output);
    config.plugins.check = false;

    let summary = Pipeline::new(config).run().unwrap();
    assert_eq!(summary.control_flow, 4);
}

#[test]
fn test_unknown_diagram_writes_empty_file() {
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("interactions.pl");
    fs::write(&output, "old(fact).\n").unwrap();

    let mut config = config_for("Drone", &output);
    config.project.diagram = "[HCS] Some Other Diagram".to_string();

    let summary = Pipeline::new(config).run().unwrap();
    assert!(!summary.diagram_found);
    assert_eq!(summary.total(), 0);
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn test_missing_project_is_fatal() {
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("interactions.pl");

    let err = Pipeline::new(config_for("DoesNotExist", &output)).run().unwrap_err();
    assert!(matches!(err, ExtractError::InvalidProjectDir(_)));
    assert!(!output.exists());
}

#[test]
fn test_project_descriptors() {
    let project = Project::load(&fixture("Drone")).unwrap();
    let analysis = stpa_facts::model::parse_analysis(project.analysis_root());

    assert_eq!(analysis.uid.as_deref(), Some("_analysis"));
    assert_eq!(analysis.semantic_resources, vec!["Drone.capella", "Drone.afm"]);

    let names: Vec<_> = analysis.descriptors().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["[CSA] Drone Context", "[HCS] Hierarchical Control Structure Diagram"]
    );
    assert!(analysis.views[1]
        .viewpoint
        .as_deref()
        .unwrap()
        .contains("stpa.odesign"));
}
