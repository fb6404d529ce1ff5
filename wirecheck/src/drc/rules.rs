use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::DrcConfig;
use crate::model::{FlowType, Port};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// What a compatibility rule found wrong with a pair of ports
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    InputToInput,
    OutputToOutput,
    ConnectorMismatch,
    GroundMismatch,
    VoltageMismatch,
    PowerTypeMismatch,
}

impl IssueKind {
    /// Direction conflicts are suspicious but legal (loop-back harnesses);
    /// everything else is an error.
    pub fn severity(self) -> Severity {
        match self {
            IssueKind::InputToInput | IssueKind::OutputToOutput => Severity::Warning,
            IssueKind::ConnectorMismatch
            | IssueKind::GroundMismatch
            | IssueKind::VoltageMismatch
            | IssueKind::PowerTypeMismatch => Severity::Error,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            IssueKind::InputToInput => "input-to-input",
            IssueKind::OutputToOutput => "output-to-output",
            IssueKind::ConnectorMismatch => "connector-mismatch",
            IssueKind::GroundMismatch => "ground-mismatch",
            IssueKind::VoltageMismatch => "voltage-mismatch",
            IssueKind::PowerTypeMismatch => "power-type-mismatch",
        }
    }
}

/// An issue between two ports, before it is attached to a connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortIssue {
    pub kind: IssueKind,
    pub message: String,
}

impl PortIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// Result of the pre-flight check run before a wire is created
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionValidity {
    /// False when any issue is an error
    pub valid: bool,
    pub issues: Vec<PortIssue>,
}

pub trait CompatibilityRule: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn check(&self, a: &Port, b: &Port) -> Vec<PortIssue>;
}

/// Ordered set of compatibility rules. Rules run in insertion order, and the
/// issue list keeps that order.
#[derive(Clone)]
pub struct DrcEngine {
    rules: Vec<Arc<dyn CompatibilityRule>>,
}

impl DrcEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_default_rules() -> Self {
        Self::with_config(&DrcConfig::default())
    }

    pub fn with_config(config: &DrcConfig) -> Self {
        let mut engine = Self::new();
        engine.add_rule(Arc::new(DirectionRule));
        engine.add_rule(Arc::new(ConnectorRule));
        engine.add_rule(Arc::new(PowerRule {
            voltage_tolerance: config.voltage_tolerance,
        }));
        engine
    }

    pub fn add_rule(&mut self, rule: Arc<dyn CompatibilityRule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn CompatibilityRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Run every rule against a pair of ports
    pub fn validate_pair(&self, a: &Port, b: &Port) -> Vec<PortIssue> {
        let mut issues = Vec::new();
        for rule in &self.rules {
            issues.extend(rule.check(a, b));
        }
        issues
    }

    pub fn check_connection_validity(&self, a: &Port, b: &Port) -> ConnectionValidity {
        let issues = self.validate_pair(a, b);
        let valid = !issues.iter().any(|i| i.severity() == Severity::Error);
        ConnectionValidity { valid, issues }
    }
}

impl Default for DrcEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Extract the first decimal number from a voltage string such as "12V",
/// "3.3 v" or "-5VDC". Returns `None` when no number is present.
pub fn parse_voltage(value: &str) -> Option<f64> {
    let chars: Vec<char> = value.trim().chars().collect();
    let start = chars.iter().position(|c| c.is_ascii_digit())?;

    let mut num_str = String::new();
    if start > 0 && (chars[start - 1] == '-' || chars[start - 1] == '+') {
        num_str.push(chars[start - 1]);
    }

    let mut seen_dot = false;
    for &ch in &chars[start..] {
        if ch.is_ascii_digit() {
            num_str.push(ch);
        } else if ch == '.' && !seen_dot {
            seen_dot = true;
            num_str.push(ch);
        } else {
            break;
        }
    }

    num_str.trim_end_matches('.').parse::<f64>().ok()
}

// Rule implementations

pub struct DirectionRule;

impl CompatibilityRule for DirectionRule {
    fn id(&self) -> &str {
        "direction"
    }

    fn name(&self) -> &str {
        "Signal Direction Check"
    }

    fn description(&self) -> &str {
        "Flags input-to-input and output-to-output wires (bidirectional ports mate with anything)"
    }

    fn check(&self, a: &Port, b: &Port) -> Vec<PortIssue> {
        match (a.flow_type, b.flow_type) {
            (FlowType::Input, FlowType::Input) => vec![PortIssue::new(
                IssueKind::InputToInput,
                format!(
                    "Input-to-input connection: '{}' and '{}' are both inputs",
                    a.label, b.label
                ),
            )],
            (FlowType::Output, FlowType::Output) => vec![PortIssue::new(
                IssueKind::OutputToOutput,
                format!(
                    "Output-to-output connection: '{}' and '{}' are both outputs",
                    a.label, b.label
                ),
            )],
            _ => Vec::new(),
        }
    }
}

pub struct ConnectorRule;

impl CompatibilityRule for ConnectorRule {
    fn id(&self) -> &str {
        "connector"
    }

    fn name(&self) -> &str {
        "Connector Family Check"
    }

    fn description(&self) -> &str {
        "Both ends must use the same connector family unless one side is Generic"
    }

    fn check(&self, a: &Port, b: &Port) -> Vec<PortIssue> {
        if a.connector_type.mates_with(b.connector_type) {
            return Vec::new();
        }

        vec![PortIssue::new(
            IssueKind::ConnectorMismatch,
            format!(
                "Connector mismatch: '{}' uses {} but '{}' uses {}",
                a.label,
                a.connector_type.label(),
                b.label,
                b.connector_type.label()
            ),
        )]
    }
}

pub struct PowerRule {
    pub voltage_tolerance: f64,
}

impl CompatibilityRule for PowerRule {
    fn id(&self) -> &str {
        "power"
    }

    fn name(&self) -> &str {
        "Power Compatibility Check"
    }

    fn description(&self) -> &str {
        "Between two power ports: ground status must match, then voltage (±tolerance), then AC/DC kind"
    }

    fn check(&self, a: &Port, b: &Port) -> Vec<PortIssue> {
        if !a.is_power || !b.is_power {
            return Vec::new();
        }

        if a.is_ground != b.is_ground {
            let (ground, supply) = if a.is_ground { (a, b) } else { (b, a) };
            return vec![PortIssue::new(
                IssueKind::GroundMismatch,
                format!(
                    "Ground mismatch: '{}' is a ground return but '{}' is a supply",
                    ground.label, supply.label
                ),
            )];
        }

        // Ground-to-ground wires carry no voltage or kind to compare
        if a.is_ground {
            return Vec::new();
        }

        let volts_a = a.voltage.as_deref().and_then(parse_voltage);
        let volts_b = b.voltage.as_deref().and_then(parse_voltage);
        if let (Some(va), Some(vb)) = (volts_a, volts_b) {
            if (va - vb).abs() > self.voltage_tolerance {
                return vec![PortIssue::new(
                    IssueKind::VoltageMismatch,
                    format!(
                        "Voltage mismatch: '{}' is {} but '{}' is {}",
                        a.label,
                        a.voltage.as_deref().unwrap_or_default(),
                        b.label,
                        b.voltage.as_deref().unwrap_or_default()
                    ),
                )];
            }
        }

        if let (Some(kind_a), Some(kind_b)) = (a.power_kind, b.power_kind) {
            if kind_a != kind_b {
                return vec![PortIssue::new(
                    IssueKind::PowerTypeMismatch,
                    format!(
                        "Power type mismatch: '{}' is {} but '{}' is {}",
                        a.label, kind_a, b.label, kind_b
                    ),
                )];
            }
        }

        Vec::new()
    }
}
