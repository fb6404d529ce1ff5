//! Example: adding a project-specific rule to DrcEngine and checking
//! candidate wires before they are drawn.
//! Run with: cargo run --example custom_rules

use std::sync::Arc;

use wirecheck::drc::{CompatibilityRule, PortIssue};
use wirecheck::{ConnectorType, DrcEngine, FlowType, IssueKind, Port};

/// Power wires on this line must state how much current they carry
struct AmperageDeclared;

impl CompatibilityRule for AmperageDeclared {
    fn id(&self) -> &str {
        "amperage-declared"
    }

    fn name(&self) -> &str {
        "Amperage Declared"
    }

    fn description(&self) -> &str {
        "Both ends of a power wire carry an amperage rating"
    }

    fn check(&self, a: &Port, b: &Port) -> Vec<PortIssue> {
        if !(a.is_power && b.is_power) {
            return Vec::new();
        }
        [a, b]
            .iter()
            .filter(|p| p.amperage.is_none())
            .map(|p| {
                PortIssue::new(
                    IssueKind::PowerTypeMismatch,
                    format!("{} has no amperage rating", p.label),
                )
            })
            .collect()
    }
}

fn main() {
    let mut engine = DrcEngine::with_default_rules();
    engine.add_rule(Arc::new(AmperageDeclared));

    println!("Rules in evaluation order:");
    for rule in engine.rules() {
        println!("  {:<18} {}", rule.id(), rule.description());
    }

    let psu = Port::new("out", "24V OUT")
        .with_flow(FlowType::Output)
        .with_connector(ConnectorType::M12A4Pin)
        .with_power("24V")
        .with_amperage("2.5A");
    let plc = Port::new("pwr", "PWR")
        .with_flow(FlowType::Input)
        .with_connector(ConnectorType::M12A4Pin)
        .with_power("24V");
    let camera = Port::new("pwr", "PoE")
        .with_flow(FlowType::Input)
        .with_connector(ConnectorType::Rj45)
        .with_power("48V");

    for (name, target) in [("psu -> plc", &plc), ("psu -> camera", &camera)] {
        let validity = engine.check_connection_validity(&psu, target);
        println!("\n{}: {}", name, if validity.valid { "ok" } else { "blocked" });
        for issue in &validity.issues {
            println!("  [{:?}] {}", issue.kind.severity(), issue.message);
        }
    }
}
