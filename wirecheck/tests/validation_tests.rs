//! Tests for the compatibility rules

use std::path::PathBuf;
use std::sync::Arc;

use wirecheck::drc::{CompatibilityRule, PortIssue};
use wirecheck::model::PowerKind;
use wirecheck::prelude::*;
use wirecheck::{
    check_connection_validity, run_drc, validate_port_compatibility, ConnectorType, DrcEngine,
    FlowType, Port,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> DiagramSnapshot {
    DiagramSnapshot::from_json_file(&fixture_path(name)).expect("Should load fixture")
}

fn kinds(issues: &[PortIssue]) -> Vec<IssueKind> {
    issues.iter().map(|i| i.kind).collect()
}

#[test]
fn test_clean_page_has_no_issues() {
    let snapshot = load("clean_page.json");
    let report = run_drc(&snapshot.connections, &snapshot.instance_set(), &snapshot.library());

    assert!(
        report.is_clean(),
        "Clean page should have no issues: {:?}",
        report.issues().map(|i| &i.message).collect::<Vec<_>>()
    );
    assert_eq!(report.connections_checked, 4);
    assert_eq!(report.connections_skipped, 0);
}

#[test]
fn test_mismatched_page_classification() {
    let snapshot = load("mismatched_page.json");
    let report = run_drc(&snapshot.connections, &snapshot.instance_set(), &snapshot.library());

    let errors: Vec<(&str, IssueKind)> = report
        .errors
        .iter()
        .map(|i| (i.connection_id.as_str(), i.kind))
        .collect();
    assert_eq!(
        errors,
        vec![
            ("c-voltage", IssueKind::VoltageMismatch),
            ("c-ground", IssueKind::GroundMismatch),
            ("c-kind", IssueKind::PowerTypeMismatch),
            ("c-connector", IssueKind::ConnectorMismatch),
        ]
    );

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, IssueKind::InputToInput);
    assert_eq!(report.warnings[0].severity, Severity::Warning);

    // The wire to a deleted instance is skipped, not reported
    assert_eq!(report.connections_checked, 4);
    assert_eq!(report.connections_skipped, 1);
    assert!(report.issues().all(|i| i.connection_id != "c-dangling"));
}

#[test]
fn test_voltage_message_quotes_raw_strings() {
    let snapshot = load("mismatched_page.json");
    let report = run_drc(&snapshot.connections, &snapshot.instance_set(), &snapshot.library());

    let voltage = &report.errors[0];
    assert!(voltage.message.contains("24V"));
    assert!(voltage.message.contains("12V"));
    assert_eq!(voltage.from_port.instance_id, "psu1");
    assert_eq!(voltage.to_port.port_id, "vin");
}

#[test]
fn test_same_connector_opposite_flow_is_compatible() {
    for &connector in ConnectorType::ALL.iter().filter(|c| !c.is_generic()) {
        let out = Port::new("a", "A").with_flow(FlowType::Output).with_connector(connector);
        let inp = Port::new("b", "B").with_flow(FlowType::Input).with_connector(connector);

        let issues = validate_port_compatibility(&out, &inp);
        assert!(
            !kinds(&issues).iter().any(|k| matches!(
                k,
                IssueKind::ConnectorMismatch | IssueKind::InputToInput | IssueKind::OutputToOutput
            )),
            "{} should mate with itself: {:?}",
            connector,
            issues
        );
    }
}

#[test]
fn test_identical_power_ports_are_compatible() {
    for voltage in ["3.3V", "5V", "12 V", "24VDC", "230V"] {
        for kind in [PowerKind::Ac, PowerKind::Dc] {
            let a = Port::new("a", "A").with_power(voltage).with_power_kind(kind);
            let b = Port::new("b", "B").with_power(voltage).with_power_kind(kind);
            assert!(validate_port_compatibility(&a, &b).is_empty(), "{} {}", voltage, kind);
        }
    }
}

#[test]
fn test_12v_to_5v_is_one_voltage_mismatch() {
    let a = Port::new("a", "V+").with_power("12V");
    let b = Port::new("b", "VIN").with_power("5V");

    let issues = validate_port_compatibility(&a, &b);
    assert_eq!(kinds(&issues), vec![IssueKind::VoltageMismatch]);
}

#[test]
fn test_generic_connector_is_wildcard() {
    let generic = Port::new("a", "A");
    let m12 = Port::new("b", "B").with_connector(ConnectorType::M12D4Pin);

    let issues = validate_port_compatibility(&generic, &m12);
    assert!(!kinds(&issues).contains(&IssueKind::ConnectorMismatch));
}

#[test]
fn test_issue_order_is_rule_order() {
    let a = Port::new("a", "A")
        .with_flow(FlowType::Output)
        .with_connector(ConnectorType::Rj45)
        .with_power("24V");
    let b = Port::new("b", "B")
        .with_flow(FlowType::Output)
        .with_connector(ConnectorType::UsbC)
        .with_power("5V");

    assert_eq!(
        kinds(&validate_port_compatibility(&a, &b)),
        vec![
            IssueKind::OutputToOutput,
            IssueKind::ConnectorMismatch,
            IssueKind::VoltageMismatch,
        ]
    );
}

#[test]
fn test_preflight_validity() {
    let a = Port::new("a", "A").with_flow(FlowType::Input);
    let b = Port::new("b", "B").with_flow(FlowType::Input);
    let warning_only = check_connection_validity(&a, &b);
    assert!(warning_only.valid);
    assert_eq!(warning_only.issues.len(), 1);

    let c = Port::new("c", "C").with_connector(ConnectorType::Hdmi);
    let d = Port::new("d", "D").with_connector(ConnectorType::Rj45);
    let error = check_connection_validity(&c, &d);
    assert!(!error.valid);
}

struct AmperageRule;

impl CompatibilityRule for AmperageRule {
    fn id(&self) -> &str {
        "amperage"
    }

    fn name(&self) -> &str {
        "Amperage Declared"
    }

    fn description(&self) -> &str {
        "Power wires should declare a current rating"
    }

    fn check(&self, a: &Port, b: &Port) -> Vec<PortIssue> {
        if a.is_power && b.is_power && (a.amperage.is_none() || b.amperage.is_none()) {
            vec![PortIssue::new(IssueKind::PowerTypeMismatch, "Missing amperage")]
        } else {
            Vec::new()
        }
    }
}

#[test]
fn test_custom_rule_runs_after_defaults() {
    let mut engine = DrcEngine::with_default_rules();
    engine.add_rule(Arc::new(AmperageRule));

    let ids: Vec<&str> = engine.rules().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["direction", "connector", "power", "amperage"]);

    let a = Port::new("a", "A").with_power("12V").with_amperage("2A");
    let b = Port::new("b", "B").with_power("5V");
    let issues = engine.validate_pair(&a, &b);
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[1].message, "Missing amperage");
}
