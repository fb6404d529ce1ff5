//! Integration tests for the WireCheck library

use std::path::PathBuf;

use wirecheck::geometry::{instance_rect, port_normal, port_position};
use wirecheck::prelude::*;
use wirecheck::routing::render::build_wire_path;
use wirecheck::{suggest_power_connections, Connection, Rect};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> DiagramSnapshot {
    DiagramSnapshot::from_json_file(&fixture_path(name)).expect("Should load fixture")
}

fn device_rects(snapshot: &DiagramSnapshot) -> Vec<Rect> {
    let library = snapshot.library();
    snapshot
        .instances
        .iter()
        .map(|i| instance_rect(i, &library))
        .collect()
}

#[test]
fn test_check_snapshot_clean() {
    let result = WireCheckCore::default()
        .check_snapshot(&fixture_path("clean_page.json"))
        .expect("Clean page should load");

    assert!(!result.has_errors());
    assert!(!result.has_warnings());
    assert_eq!(result.stats.connections_checked, 4);
}

#[test]
fn test_check_snapshot_mismatched() {
    let result = WireCheckCore::default()
        .check_snapshot(&fixture_path("mismatched_page.json"))
        .expect("Mismatched page should load");

    assert!(result.has_errors());
    assert_eq!(result.stats.errors, 4);
    assert_eq!(result.stats.warnings, 1);
    assert_eq!(result.total_issues(), 5);
}

#[test]
fn test_check_missing_file() {
    let result = WireCheckCore::default().check_snapshot(&fixture_path("nope.json"));
    assert!(matches!(result, Err(WireCheckError::Io(_))));
}

#[test]
fn test_geometry_on_fixture() {
    let snapshot = load("clean_page.json");
    let library = snapshot.library();
    let instances = snapshot.instance_set();

    let plc = instances.get("plc1").unwrap();
    let template = library.template_for(plc).unwrap();

    assert_eq!(port_position(plc, template, "pwr"), Point::new(200.0, 20.0));
    assert_eq!(port_position(plc, template, "di0"), Point::new(260.0, 80.0));
    assert_eq!(port_normal(plc, template, "pwr"), Vector::LEFT);
    assert_eq!(port_normal(plc, template, "di0"), Vector::DOWN);
    assert_eq!(port_normal(plc, template, "eth"), Vector::RIGHT);
}

#[test]
fn test_route_clean_page() {
    let snapshot = load("clean_page.json");
    let wires = WireCheckCore::default().route(&snapshot);
    assert_eq!(wires.len(), 4);

    // Facing ports on one horizontal line need no elbows
    let w1 = wires.iter().find(|w| w.connection_id == "w1").unwrap();
    assert_eq!(w1.points, vec![Point::new(80.0, 20.0), Point::new(200.0, 20.0)]);

    let rects = device_rects(&snapshot);
    for wire in &wires {
        for segment in wire.points.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            assert!(
                a.x == b.x || a.y == b.y,
                "{} has a diagonal segment: {:?}",
                wire.connection_id,
                wire.points
            );
            assert!(
                !rects.iter().any(|r| r.blocks_segment(a, b)),
                "{} crosses a device: {:?}",
                wire.connection_id,
                wire.points
            );
        }
    }
}

#[test]
fn test_route_is_idempotent() {
    let snapshot = load("clean_page.json");
    let core = WireCheckCore::default();
    assert_eq!(core.route(&snapshot), core.route(&snapshot));
}

#[test]
fn test_sensor_wire_leaves_upward() {
    let snapshot = load("clean_page.json");
    let wires = WireCheckCore::default().route(&snapshot);
    let w3 = wires.iter().find(|w| w.connection_id == "w3").unwrap();

    // prox OUT has exitDirection "top"
    assert_eq!(w3.points[0], Point::new(240.0, 200.0));
    assert_eq!(w3.points[1].x, 240.0);
    assert!(w3.points[1].y <= 180.0);
}

#[test]
fn test_manual_control_points_are_kept() {
    let mut snapshot = load("clean_page.json");
    let manual = snapshot
        .connections
        .iter_mut()
        .find(|c| c.id == "w4")
        .unwrap();
    manual.control_points = vec![Point::new(380.0, 40.0), Point::new(380.0, 20.0)];

    let wires = WireCheckCore::default().route(&snapshot);
    let w4 = wires.iter().find(|w| w.connection_id == "w4").unwrap();
    assert_eq!(w4.elbows(), &[Point::new(380.0, 40.0), Point::new(380.0, 20.0)]);
}

#[test]
fn test_render_produces_svg_paths() {
    let snapshot = load("clean_page.json");
    let rendered = WireCheckCore::default().render(&snapshot);

    assert_eq!(rendered.len(), 4);
    for wire in &rendered {
        assert!(wire.path_data.starts_with('M'), "{}", wire.path_data);
    }
    let w1 = rendered.iter().find(|w| w.connection_id == "w1").unwrap();
    assert_eq!(w1.path_data, "M 80 20 L 200 20");
}

#[test]
fn test_wire_jump_over_crossing() {
    let horizontal = vec![Point::new(0.0, 50.0), Point::new(200.0, 50.0)];
    let vertical = vec![Point::new(100.0, 0.0), Point::new(100.0, 100.0)];

    let path = build_wire_path(&horizontal, &[vertical.clone()], &EngineConfig::default().render);
    assert_eq!(path.arc_count(), 1);

    // The crossing wire itself does not hop
    let path = build_wire_path(&vertical, &[horizontal], &EngineConfig::default().render);
    assert_eq!(path.arc_count(), 0);
}

#[test]
fn test_suggest_for_new_sensor() {
    let snapshot = load("new_device.json");
    let suggestions = WireCheckCore::default().suggest(&snapshot, "sen1");

    let summary: Vec<(&str, &str, &str, &str, u8)> = suggestions
        .iter()
        .map(|s| {
            (
                s.from_instance_id.as_str(),
                s.from_port_id.as_str(),
                s.to_instance_id.as_str(),
                s.to_port_id.as_str(),
                s.confidence,
            )
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            ("mcu1", "v5", "sen1", "vcc", 90),
            ("sen1", "sda", "mcu1", "sda", 85),
            ("sen1", "scl", "mcu1", "scl", 85),
            ("sen1", "gnd", "mcu1", "gnd", 85),
        ]
    );
}

#[test]
fn test_suggestions_skip_connected_ports() {
    let mut snapshot = load("new_device.json");
    snapshot
        .connections
        .push(Connection::new("w2", ("mcu1", "sda"), ("modem1", "rxd")));

    let suggestions = WireCheckCore::default().suggest(&snapshot, "sen1");
    for suggestion in &suggestions {
        for connection in &snapshot.connections {
            assert!(!connection.touches(&suggestion.from_instance_id, &suggestion.from_port_id));
            assert!(!connection.touches(&suggestion.to_instance_id, &suggestion.to_port_id));
        }
    }
    assert_eq!(suggestions.len(), 3);
}

#[test]
fn test_power_suggestion_without_label_group() {
    let snapshot = load("new_device.json");
    let power = suggest_power_connections(
        "mcu1",
        &snapshot.instance_set(),
        &snapshot.library(),
        &snapshot.connections,
    );

    assert_eq!(power.len(), 1);
    assert_eq!(power[0].to_port_id, "vcc");
    assert_eq!(power[0].confidence, 90);
}

#[test]
fn test_accepted_suggestion_becomes_clean_wire() {
    let mut snapshot = load("new_device.json");
    let suggestion = WireCheckCore::default()
        .suggest(&snapshot, "sen1")
        .into_iter()
        .next()
        .unwrap();
    snapshot.connections.push(suggestion.into_connection(Default::default()));

    let report = WireCheckCore::default().validate(&snapshot);
    assert!(report.is_clean());
    assert_eq!(report.connections_checked, 2);
}

#[test]
fn test_config_file_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wirecheck.json");
    std::fs::write(&path, r#"{ "matcher": { "labelConfidence": 60 } }"#).unwrap();

    let core = WireCheckCore::from_config_file(&path).unwrap();
    let suggestions = core.suggest(&load("new_device.json"), "sen1");
    assert_eq!(suggestions.last().unwrap().confidence, 60);
}
