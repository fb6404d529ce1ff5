//! Compatibility Validator (DRC)
//!
//! Decides whether two ports may be wired together. Three rules run in a
//! fixed order, so issue lists are reproducible:
//!
//! 1. **direction** - input-to-input / output-to-output (warnings)
//! 2. **connector** - connector families must mate (`Generic` is a wildcard)
//! 3. **power** - ground status, then voltage, then AC/DC kind (errors)
//!
//! Nothing here returns `Err`: unparsable voltages skip the voltage check and
//! connections with dangling endpoints are skipped by [`run_drc`].
//!
//! # Usage
//!
//! ```rust
//! use wirecheck::drc::{validate_port_compatibility, IssueKind};
//! use wirecheck::model::Port;
//!
//! let a = Port::new("a", "V+").with_power("12V");
//! let b = Port::new("b", "VIN").with_power("5V");
//!
//! let issues = validate_port_compatibility(&a, &b);
//! assert_eq!(issues[0].kind, IssueKind::VoltageMismatch);
//! ```

pub mod report;
pub mod rules;

pub use report::{DrcIssue, DrcReport, DrcStats, PortRef};
pub use rules::{
    parse_voltage, CompatibilityRule, ConnectionValidity, ConnectorRule, DirectionRule, DrcEngine,
    IssueKind, PortIssue, PowerRule, Severity,
};

use crate::model::{Connection, InstanceSet, Port, TemplateLibrary};

/// Check a pair of ports with the default rules
pub fn validate_port_compatibility(a: &Port, b: &Port) -> Vec<PortIssue> {
    DrcEngine::with_default_rules().validate_pair(a, b)
}

/// Pre-flight check before creating a wire between two ports
pub fn check_connection_validity(a: &Port, b: &Port) -> ConnectionValidity {
    DrcEngine::with_default_rules().check_connection_validity(a, b)
}

/// Check every connection with the default rules
pub fn run_drc(
    connections: &[Connection],
    instances: &InstanceSet,
    templates: &TemplateLibrary,
) -> DrcReport {
    DrcEngine::with_default_rules().run(connections, instances, templates)
}
